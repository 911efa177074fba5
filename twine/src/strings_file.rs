//! Reading and writing the canonical strings file.
//!
//! ```text
//! [[General]]
//! 	[yes]
//! 		en = Yes
//! 		tags = app,web
//! 		comment = Affirmative answer
//! 		fr = Oui
//! 	[okay]
//! 		ref = yes
//! ```

use std::{fmt::Write as _, fs, path::Path, str::FromStr};

use crate::{
    diagnostics::{DiagnosticSink, TracingSink},
    encoding,
    error::Error,
    types::{Row, StringsFile},
};

impl StringsFile {
    /// Reads and parses the strings file at `path`.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = encoding::read_to_string(path, None)?;
        Self::parse(&content, path)
    }

    /// Parses `content`; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let mut file = StringsFile::new();
        let mut current_section: Option<usize> = None;
        let mut current_row = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let parse_error = || Error::parse_error(path, index + 1, line);

            if line.starts_with("[[") {
                let name = line
                    .strip_prefix("[[")
                    .and_then(|rest| rest.strip_suffix("]]"))
                    .ok_or_else(parse_error)?;
                current_section = Some(file.add_section(name));
            } else if line.starts_with('[') {
                let key = line
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .filter(|key| !key.is_empty())
                    .ok_or_else(parse_error)?;
                let section = *current_section.get_or_insert_with(|| file.add_headerless_section());
                current_row = Some(file.push_row(section, Row::new(key)));
            } else {
                let (name, value) = line.split_once('=').ok_or_else(parse_error)?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(parse_error());
                }
                let row = current_row.ok_or_else(parse_error)?;
                let value = unwrap_backticks(value.trim());

                match name {
                    "comment" => file.row_mut(row).comment = Some(value.to_string()),
                    "tags" => {
                        file.row_mut(row).tags = Some(if value.is_empty() {
                            Vec::new()
                        } else {
                            value.split(',').map(str::to_string).collect()
                        })
                    }
                    "ref" => file.row_mut(row).reference_key = Some(value.to_string()),
                    lang => {
                        file.add_language_code(lang);
                        file.row_mut(row).set_translation(lang, value);
                    }
                }
            }
        }

        file.resolve_references();
        Ok(file)
    }

    /// Serializes the file, reporting rows without a developer-language value
    /// to `sink`.
    pub fn serialize(&self, sink: &mut dyn DiagnosticSink) -> String {
        let mut out = String::new();
        let developer_language = self.developer_language();

        for (position, section) in self.sections().iter().enumerate() {
            if position > 0 {
                out.push('\n');
            }
            if position > 0 || !section.is_headerless() {
                let _ = writeln!(out, "[[{}]]", section.name);
            }

            for &id in section.rows() {
                let row = self.row(id);
                let _ = writeln!(out, "\t[{}]", row.key);

                let has_developer_value = match developer_language {
                    Some(lang) => write_value(&mut out, row, lang),
                    None => false,
                };
                if !has_developer_value && row.reference_key.is_none() {
                    if let Some(lang) = developer_language {
                        sink.warning(&format!(
                            "{} does not exist in developer language '{}'",
                            row.key, lang
                        ));
                    }
                }

                if let Some(reference) = &row.reference_key {
                    let _ = writeln!(out, "\t\tref = {reference}");
                }
                if let Some(tags) = row.tags.as_ref().filter(|tags| !tags.is_empty()) {
                    let _ = writeln!(out, "\t\ttags = {}", tags.join(","));
                }
                if let Some(comment) = row.comment.as_ref().filter(|c| !c.is_empty()) {
                    let _ = writeln!(out, "\t\tcomment = {comment}");
                }
                for lang in self.language_codes().iter().skip(1) {
                    write_value(&mut out, row, lang);
                }
            }
        }

        out
    }

    /// Writes the file to `path`.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, sink: &mut dyn DiagnosticSink) -> Result<(), Error> {
        fs::write(path, self.serialize(sink))?;
        Ok(())
    }
}

impl FromStr for StringsFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StringsFile::parse(s, Path::new("<string>"))
    }
}

impl std::fmt::Display for StringsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize(&mut TracingSink))
    }
}

fn is_backtick_wrapped(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('`') && value.ends_with('`')
}

fn unwrap_backticks(value: &str) -> &str {
    if is_backtick_wrapped(value) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn write_value(out: &mut String, row: &Row, lang: &str) -> bool {
    let Some(value) = row.translation(lang) else {
        return false;
    };
    let needs_backticks = value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || is_backtick_wrapped(value);
    if needs_backticks {
        let _ = writeln!(out, "\t\t{lang} = `{value}`");
    } else {
        let _ = writeln!(out, "\t\t{lang} = {value}");
    }
    true
}
