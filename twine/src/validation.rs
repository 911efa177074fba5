//! Consistency checks over a strings file.

use std::collections::HashSet;

use tracing::debug;

use crate::{error::Error, types::StringsFile};

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Keys in first-seen order, without repeats.
#[derive(Default)]
struct KeyList<'a> {
    seen: HashSet<&'a str>,
    keys: Vec<&'a str>,
}

impl<'a> KeyList<'a> {
    fn push(&mut self, key: &'a str) {
        if self.seen.insert(key) {
            self.keys.push(key);
        }
    }

    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn render(&self, title: &str) -> String {
        let lines: Vec<String> = self.keys.iter().map(|key| format!("  {key}")).collect();
        format!("{title}\n{}", lines.join("\n"))
    }
}

/// Checks `strings` for duplicate keys, keys with characters outside
/// `[A-Za-z0-9_]` and, when `pedantic`, rows without tags.
///
/// All problems are reported together in one [`Error::Validation`].
pub fn validate_strings_file(strings: &StringsFile, pedantic: bool) -> Result<(), Error> {
    let mut all_keys = HashSet::new();
    let mut duplicates = KeyList::default();
    let mut untagged = KeyList::default();
    let mut invalid = KeyList::default();
    let mut total_rows = 0;
    let mut tagged_rows = 0;

    for section in strings.sections() {
        for &id in section.rows() {
            let row = strings.row(id);
            total_rows += 1;
            if !all_keys.insert(row.key.as_str()) {
                duplicates.push(&row.key);
            }
            if row.tags.as_ref().is_some_and(|tags| !tags.is_empty()) {
                tagged_rows += 1;
            } else {
                untagged.push(&row.key);
            }
            if !is_valid_key(&row.key) {
                invalid.push(&row.key);
            }
        }
    }
    debug!(total_rows, tagged_rows, "validated strings file");

    let mut errors = Vec::new();
    if !duplicates.is_empty() {
        errors.push(duplicates.render("Found duplicate string key(s):"));
    }
    if pedantic && total_rows > 0 {
        if tagged_rows == 0 {
            errors.push("None of your strings have tags.".to_string());
        } else if !untagged.is_empty() {
            errors.push(untagged.render("Found strings without tags:"));
        }
    }
    if !invalid.is_empty() {
        errors.push(invalid.render("Found key(s) with invalid characters:"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::validation_error(errors.join("\n\n")))
    }
}
