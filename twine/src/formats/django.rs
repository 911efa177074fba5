//! Support for Django `.po` catalogs, keyed by `msgid`.

use std::path::Path;

use indoc::formatdoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{FormatType, Formatter, escape_quotes, gettext::po_file_language, unescape_quotes},
    types::{Row, RowId, Section, StringsFile},
};

lazy_static! {
    static ref COMMENT_REGEX: Regex = Regex::new(r#"^#\. *"?(.*?)"?$"#).unwrap();
    static ref KEY_REGEX: Regex = Regex::new(r#"^msgid *"(.*)"$"#).unwrap();
    static ref VALUE_REGEX: Regex = Regex::new(r#"^msgstr *"(.*)"$"#).unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DjangoFormatter;

impl Formatter for DjangoFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::Django
    }

    fn extension(&self) -> &'static str {
        ".po"
    }

    fn default_file_name(&self) -> &'static str {
        "strings.po"
    }

    fn determine_language(&self, path: &Path, _strings: &StringsFile) -> Option<String> {
        po_file_language(path)
    }

    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error> {
        let mut comment: Option<String> = None;
        let mut key: Option<String> = None;
        let mut value: Option<String> = None;

        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(captures) = COMMENT_REGEX.captures(line) {
                comment = Some(unescape_quotes(&captures[1]));
            }
            if let Some(captures) = KEY_REGEX.captures(line) {
                key = Some(unescape_quotes(&captures[1]));
            }
            if let Some(captures) = VALUE_REGEX.captures(line) {
                value = Some(unescape_quotes(&captures[1]));
            }

            if let (Some(k), Some(v)) = (&key, &value) {
                if !k.is_empty() && !v.is_empty() {
                    consumer.set_translation(k, lang, v);
                    if let Some(comment) = comment.as_deref().filter(|c| !c.is_empty()) {
                        consumer.set_comment(k, comment);
                    }
                    key = None;
                    value = None;
                    comment = None;
                }
            }
        }
        Ok(())
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(formatdoc!(
            r#"
            ##
             # Django Strings File
             # Generated by Twine
             # Language: {}
            msgid ""
            msgstr ""
            "Content-Type: text/plain; charset=UTF-8\n"
            "#,
            lang
        ))
    }

    fn format_section_header(&self, section: &Section) -> Option<String> {
        Some(format!("#--------- {} ---------#\n", section.name))
    }

    fn should_include_row(&self, strings: &StringsFile, id: RowId, _lang: &str) -> bool {
        strings
            .developer_language()
            .and_then(|dev| strings.translated(id, dev))
            .is_some()
    }

    fn format_row(&self, strings: &StringsFile, id: RowId, lang: &str) -> Result<String, Error> {
        let mut result = self.format_comment(strings.row(id)).unwrap_or_default();
        if let Some(base) = strings
            .developer_language()
            .and_then(|dev| strings.translated(id, dev))
        {
            result.push_str(&format!("# base translation: \"{}\"\n", escape_quotes(base)));
        }
        result.push_str(&self.format_key_value(strings, id, lang)?);
        Ok(result)
    }

    fn format_comment(&self, row: &Row) -> Option<String> {
        row.comment
            .as_deref()
            .map(|comment| format!("#. {}\n", escape_quotes(comment)))
    }

    fn render_key_value(&self, key: &str, value: &str) -> String {
        format!("msgid \"{key}\"\nmsgstr \"{value}\"\n")
    }

    fn format_key(&self, key: &str) -> String {
        escape_quotes(key)
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        Ok(escape_quotes(value))
    }
}
