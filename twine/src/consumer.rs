//! Store mutations performed while reading localization files back in.

use crate::{
    diagnostics::DiagnosticSink,
    options::Options,
    types::{Row, StringsFile},
};

/// Name of the section that receives keys unknown to the strings file.
pub const UNCATEGORIZED_SECTION: &str = "Uncategorized";

/// Applies translations and comments found in a localization file to the
/// strings database.
pub struct Consumer<'a> {
    strings: &'a mut StringsFile,
    options: &'a Options,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Consumer<'a> {
    pub fn new(
        strings: &'a mut StringsFile,
        options: &'a Options,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Consumer {
            strings,
            options,
            sink,
        }
    }

    pub fn strings(&self) -> &StringsFile {
        self.strings
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn sink(&mut self) -> &mut dyn DiagnosticSink {
        &mut *self.sink
    }

    /// Stores `value` as the `lang` translation of `key`.
    ///
    /// A row without its own `lang` value does not store a value equal to the
    /// one it inherits from its reference. Unknown keys are added to the [`UNCATEGORIZED_SECTION`] when
    /// `consume_all` is set and dropped with a warning otherwise.
    pub fn set_translation(&mut self, key: &str, lang: &str, value: &str) {
        let value = value.replace('\n', "\\n");

        if let Some(id) = self.strings.id_of(key) {
            let row = self.strings.row(id);
            let inherited = row
                .reference()
                .map(|reference| self.strings.translated(reference, lang));
            let redundant =
                row.translation(lang).is_none() && inherited == Some(Some(value.as_str()));
            if !redundant {
                self.strings.row_mut(id).set_translation(lang, value);
            }
        } else if self.options.consume_all {
            self.sink
                .info(&format!("Adding new string '{key}' to strings data file."));
            let section = match self.strings.section_position(UNCATEGORIZED_SECTION) {
                Some(position) => position,
                None => {
                    self.strings.insert_section(0, UNCATEGORIZED_SECTION);
                    0
                }
            };
            let mut row = Row::new(key).with_translation(lang, &value);
            if !self.options.tags.is_empty() {
                row.tags = Some(self.options.tags.clone());
            }
            self.strings.push_row(section, row);
        } else {
            self.sink
                .warning(&format!("'{key}' not found in strings data file."));
        }

        self.strings.add_language_code(lang);
    }

    /// Stores `comment` for `key` when `consume_comments` is set and the
    /// comment differs from the one inherited through the row's reference.
    pub fn set_comment(&mut self, key: &str, comment: &str) {
        if !self.options.consume_comments {
            return;
        }
        let Some(id) = self.strings.id_of(key) else {
            return;
        };
        let inherited = self
            .strings
            .row(id)
            .reference()
            .map(|reference| self.strings.effective_comment(reference));
        if inherited != Some(Some(comment)) {
            self.strings.row_mut(id).comment = Some(comment.to_string());
        }
    }
}
