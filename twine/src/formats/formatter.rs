//! The [`Formatter`] trait and the shared output skeleton.

use std::path::Path;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{FormatType, directory_entries, language_from_file_stem},
    options::Options,
    processor::OutputProcessor,
    types::{Row, RowId, Section, StringsFile},
};

/// Codec between the strings database and one localization file format.
///
/// Generating a file goes through [`Formatter::format_file`], whose default
/// implementation renders
///
/// ```text
/// [header\n]
/// (\n[section header]) (\n[comment][key/value])*   for every non-empty section,
///                                                 sections joined by \n
/// ```
///
/// Formats customize the pieces (header, section header, comment, key/value
/// rendering, escaping) and override the larger steps only where their layout
/// differs.
pub trait Formatter {
    fn format_type(&self) -> FormatType;

    fn format_name(&self) -> &'static str {
        self.format_type().name()
    }

    /// File extension including the leading dot.
    fn extension(&self) -> &'static str;

    fn default_file_name(&self) -> &'static str;

    /// Whether `path` looks like a directory holding files of this format.
    fn can_handle_directory(&self, path: &Path) -> bool {
        let extension = self.extension();
        directory_entries(path)
            .iter()
            .any(|name| name.len() > extension.len() && name.ends_with(extension))
    }

    /// Infers the language of the file at `path`.
    fn determine_language(&self, path: &Path, strings: &StringsFile) -> Option<String> {
        let _ = strings;
        language_from_file_stem(path)
    }

    /// Relative directory holding the file for `lang`.
    fn output_path_for_language(&self, lang: &str, strings: &StringsFile) -> String {
        let _ = strings;
        lang.to_string()
    }

    /// Parses `content` as `lang` and feeds every key into `consumer`.
    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error>;

    /// Renders the file for `lang`, or `None` when no row would be written.
    fn format_file(
        &self,
        strings: &StringsFile,
        lang: &str,
        options: &Options,
    ) -> Result<Option<String>, Error> {
        let processed = OutputProcessor::new(strings, options).process(lang);
        if processed.is_empty() {
            return Ok(None);
        }

        let mut result = String::new();
        if let Some(header) = self.format_header(lang) {
            result.push_str(&header);
            result.push('\n');
        }
        result.push_str(&self.format_sections(&processed, lang)?);
        Ok(Some(result))
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        let _ = lang;
        None
    }

    fn format_sections(&self, strings: &StringsFile, lang: &str) -> Result<String, Error> {
        join_sections(self, strings, lang, "\n")
    }

    fn format_section_header(&self, section: &Section) -> Option<String> {
        let _ = section;
        None
    }

    fn should_include_row(&self, strings: &StringsFile, id: RowId, lang: &str) -> bool {
        strings.translated(id, lang).is_some()
    }

    fn format_section(
        &self,
        strings: &StringsFile,
        section: &Section,
        lang: &str,
    ) -> Result<Option<String>, Error> {
        let rows: Vec<RowId> = section
            .rows()
            .iter()
            .copied()
            .filter(|&id| self.should_include_row(strings, id, lang))
            .collect();
        if rows.is_empty() {
            return Ok(None);
        }

        let mut result = String::new();
        if !section.name.is_empty() {
            if let Some(header) = self.format_section_header(section) {
                result.push('\n');
                result.push_str(&header);
            }
        }
        for id in rows {
            result.push('\n');
            result.push_str(&self.format_row(strings, id, lang)?);
        }
        Ok(Some(result))
    }

    fn format_row(&self, strings: &StringsFile, id: RowId, lang: &str) -> Result<String, Error> {
        let mut result = self.format_comment(strings.row(id)).unwrap_or_default();
        result.push_str(&self.format_key_value(strings, id, lang)?);
        Ok(result)
    }

    fn format_comment(&self, row: &Row) -> Option<String> {
        let _ = row;
        None
    }

    fn format_key_value(&self, strings: &StringsFile, id: RowId, lang: &str) -> Result<String, Error> {
        let row = strings.row(id);
        let value = strings.translated(id, lang).unwrap_or_default();
        Ok(self.render_key_value(&self.format_key(&row.key), &self.format_value(value)?))
    }

    /// Lays out an already escaped key and value.
    fn render_key_value(&self, key: &str, value: &str) -> String;

    fn format_key(&self, key: &str) -> String {
        key.to_string()
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        Ok(value.to_string())
    }
}

/// Formats every non-empty section of `strings` and joins them with
/// `separator`.
pub fn join_sections<F: Formatter + ?Sized>(
    formatter: &F,
    strings: &StringsFile,
    lang: &str,
    separator: &str,
) -> Result<String, Error> {
    let mut sections = Vec::new();
    for section in strings.sections() {
        if let Some(formatted) = formatter.format_section(strings, section, lang)? {
            sections.push(formatted);
        }
    }
    Ok(sections.join(separator))
}
