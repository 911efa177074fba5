//! Support for gettext `.po` catalogs keyed by `msgctxt`.
//!
//! Every entry carries the row key as `msgctxt`, the developer language value
//! as `msgid` and the translation as `msgstr`, so rows without a developer
//! language value are never written.

use std::path::Path;

use indoc::formatdoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{FormatType, Formatter, directory_entries, escape_quotes, unescape_quotes},
    types::{Row, RowId, Section, StringsFile},
};

lazy_static! {
    static ref COMMENT_REGEX: Regex = Regex::new(r#"(?m)#.? *"(.*)"$"#).unwrap();
    static ref KEY_REGEX: Regex = Regex::new(r#"(?m)msgctxt *"(.*)"$"#).unwrap();
    static ref VALUE_REGEX: Regex = Regex::new(r#"(?ms)msgstr *"(.*)"$"#).unwrap();
    static ref DIRECTORY_REGEX: Regex = Regex::new(r"^[a-z][a-z](_[A-Z][A-Z])?$").unwrap();
    static ref FILE_LANGUAGE_REGEX: Regex = Regex::new(r"(..)\.po$").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GettextFormatter;

/// Language named by a `.po` file: the whole stem when it is a language code,
/// else the two characters before the extension.
pub(crate) fn po_file_language(path: &Path) -> Option<String> {
    if let Some(lang) = crate::formats::language_from_file_stem(path) {
        return Some(lang);
    }
    let name = path.file_name()?.to_str()?;
    FILE_LANGUAGE_REGEX
        .captures(name)
        .map(|captures| captures[1].to_string())
}

impl Formatter for GettextFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::Gettext
    }

    fn extension(&self) -> &'static str {
        ".po"
    }

    fn default_file_name(&self) -> &'static str {
        "strings.po"
    }

    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path)
            .iter()
            .any(|name| DIRECTORY_REGEX.is_match(name))
    }

    fn determine_language(&self, path: &Path, _strings: &StringsFile) -> Option<String> {
        po_file_language(path)
    }

    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error> {
        let content = content.replace("\r\n", "\n");
        for item in content.split("\n\n") {
            let Some(key) = KEY_REGEX.captures(item).map(|c| unescape_quotes(&c[1])) else {
                continue;
            };
            let Some(value) = VALUE_REGEX
                .captures(item)
                .map(|c| unescape_quotes(&c[1].replace("\"\n\"", "")))
            else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            consumer.set_translation(&key, lang, &value);

            if let Some(comment) = COMMENT_REGEX.captures(item).map(|c| c[1].to_string()) {
                if !comment.is_empty() && !comment.starts_with("SECTION:") {
                    consumer.set_comment(&key, &unescape_quotes(&comment));
                }
            }
        }
        Ok(())
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(formatdoc!(
            r#"
            msgid ""
            msgstr ""
            "Language: {}\n"
            "X-Generator: Twine\n"
            "#,
            lang
        ))
    }

    fn format_section_header(&self, section: &Section) -> Option<String> {
        Some(format!("# SECTION: {}", section.name))
    }

    fn should_include_row(&self, strings: &StringsFile, id: RowId, _lang: &str) -> bool {
        strings
            .developer_language()
            .and_then(|dev| strings.translated(id, dev))
            .is_some()
    }

    fn format_comment(&self, row: &Row) -> Option<String> {
        row.comment
            .as_deref()
            .map(|comment| format!("#. \"{}\"\n", escape_quotes(comment)))
    }

    fn format_key_value(&self, strings: &StringsFile, id: RowId, lang: &str) -> Result<String, Error> {
        let row = strings.row(id);
        let base = strings
            .developer_language()
            .and_then(|dev| strings.translated(id, dev))
            .unwrap_or_default();
        let value = strings.translated(id, lang).unwrap_or_default();
        Ok(format!(
            "msgctxt \"{}\"\nmsgid \"{}\"\n{}",
            escape_quotes(&row.key),
            escape_quotes(base),
            self.render_key_value("", &escape_quotes(value))
        ))
    }

    fn render_key_value(&self, _key: &str, value: &str) -> String {
        format!("msgstr \"{value}\"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagnostics::CollectingSink, formats::test_support::*, options::Options};
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        msgid ""
        msgstr ""
        "Language: en\n"
        "X-Generator: Twine\n"


        # SECTION: Section 1
        #. "comment key1"
        msgctxt "key1"
        msgid "value1-english"
        msgstr "value1-english"

        msgctxt "key2"
        msgid "value2-english"
        msgstr "value2-english"


        # SECTION: Section 2
        msgctxt "key3"
        msgid "value3-english"
        msgstr "value3-english"

        #. "comment key4"
        msgctxt "key4"
        msgid "value4-english"
        msgstr "value4-english"
    "#};

    fn read(content: &str) -> StringsFile {
        let mut strings = empty_strings();
        let options = Options::new().with_consume_all(true).with_consume_comments(true);
        let mut sink = CollectingSink::new();
        let mut consumer = Consumer::new(&mut strings, &options, &mut sink);
        GettextFormatter.read(content, "en", &mut consumer).unwrap();
        strings
    }

    #[test]
    fn test_format_file() {
        let output = GettextFormatter
            .format_file(&sample_strings(), "en", &Options::new())
            .unwrap()
            .unwrap();
        assert_eq!(output, SAMPLE);
    }

    #[test]
    fn test_read_generated_file() {
        let strings = read(SAMPLE);
        assert_sample_translations(&strings);
        assert_sample_comments(&strings);
    }

    #[test]
    fn test_read_multiline_msgstr() {
        let strings = read(indoc! {r#"
            msgctxt "key1"
            msgid "base"
            msgstr ""
            "multiline\n"
            "string"
        "#});
        assert_eq!(
            strings.get("key1").unwrap().translation("en"),
            Some(r"multiline\nstring")
        );
    }

    #[test]
    fn test_skips_empty_translations() {
        let strings = read(indoc! {r#"
            msgctxt "key1"
            msgid "base"
            msgstr ""
        "#});
        assert!(strings.get("key1").is_none());
    }

    #[test]
    fn test_rows_without_developer_value_are_skipped() {
        let mut strings = StringsFile::new();
        strings.add_language_code("en");
        strings.add_language_code("fr");
        let section = strings.add_section("");
        strings.push_row(section, Row::new("only_fr").with_translation("fr", "seulement"));
        strings.push_row(
            section,
            Row::new("both")
                .with_translation("en", "both")
                .with_translation("fr", "les deux"),
        );
        let output = GettextFormatter
            .format_file(&strings, "fr", &Options::new())
            .unwrap()
            .unwrap();
        assert!(!output.contains("only_fr"));
        assert!(output.contains("msgctxt \"both\"\nmsgid \"both\"\nmsgstr \"les deux\"\n"));
    }

    #[test]
    fn test_language_from_file_name() {
        let strings = StringsFile::new();
        let lang = |path: &str| GettextFormatter.determine_language(Path::new(path), &strings);
        assert_eq!(lang("locale/fr.po").as_deref(), Some("fr"));
        assert_eq!(lang("locale/de_DE.po").as_deref(), Some("de_DE"));
        assert_eq!(lang("locale/strings-es.po").as_deref(), Some("es"));
    }
}
