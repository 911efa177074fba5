//! Tizen string table XML. Generation only.

use std::path::Path;

use indoc::formatdoc;
use quick_xml::escape::partial_escape;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{
        FormatType, Formatter, directory_entries, join_sections, path_segments, xml_comment_text,
    },
    types::{Row, Section, StringsFile},
};

/// Tizen locale folder names and the language codes they stand for.
pub const LANG_CODES: &[(&str, &str)] = &[
    ("eng-GB", "en"),
    ("rus-RU", "ru"),
    ("fra-FR", "fr"),
    ("dut-NL", "nl"),
    ("tur-TR", "tr"),
    ("deu-DE", "de"),
    ("pol-PL", "pl"),
    ("hun-HU", "hu"),
    ("ita-IT", "it"),
    ("kor-KR", "ko"),
    ("ukr-UA", "uk"),
    ("spa-ES", "es"),
    ("por-PT", "pt"),
    ("ces-CZ", "cs"),
    ("jpn-JP", "ja"),
    ("zho-CN", "zh-Hans"),
    ("zho-TW", "zh-Hant"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TizenFormatter;

fn language_for_locale(locale: &str) -> Option<&'static str> {
    LANG_CODES
        .iter()
        .find(|(tizen, _)| *tizen == locale)
        .map(|(_, lang)| *lang)
}

fn is_locale_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 6
        && bytes[..3].iter().all(u8::is_ascii_lowercase)
        && bytes[3] == b'-'
        && bytes[4..].iter().all(u8::is_ascii_uppercase)
}

impl Formatter for TizenFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::Tizen
    }

    fn extension(&self) -> &'static str {
        ".xml"
    }

    fn default_file_name(&self) -> &'static str {
        "strings.xml"
    }

    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path).iter().any(|name| is_locale_name(name))
    }

    fn determine_language(&self, path: &Path, _strings: &StringsFile) -> Option<String> {
        path_segments(path)
            .into_iter()
            .rev()
            .find_map(language_for_locale)
            .map(str::to_string)
    }

    fn output_path_for_language(&self, lang: &str, _strings: &StringsFile) -> String {
        let locale = LANG_CODES
            .iter()
            .find(|(_, code)| *code == lang)
            .map_or(lang, |(tizen, _)| *tizen);
        format!("res/{locale}")
    }

    fn read(&self, _content: &str, _lang: &str, _consumer: &mut Consumer<'_>) -> Result<(), Error> {
        Err(Error::Unsupported("reading Tizen string tables".to_string()))
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(formatdoc!(
            r#"
            <?xml version="1.0" encoding="utf-8"?>
            <!-- Tizen Strings File -->
            <!-- Generated by Twine -->
            <!-- Language: {} -->"#,
            lang
        ))
    }

    fn format_sections(&self, strings: &StringsFile, lang: &str) -> Result<String, Error> {
        let sections = join_sections(self, strings, lang, "\n")?;
        Ok(format!(
            "<string_table Bversion=\"2.0.0.201311071819\" Dversion=\"20120315\">{sections}\n</string_table>\n"
        ))
    }

    fn format_section_header(&self, section: &Section) -> Option<String> {
        Some(format!("\t<!-- SECTION: {} -->", section.name))
    }

    fn format_comment(&self, row: &Row) -> Option<String> {
        row.comment
            .as_deref()
            .map(|comment| format!("\t<!-- {} -->\n", xml_comment_text(comment)))
    }

    fn render_key_value(&self, key: &str, value: &str) -> String {
        format!("\t<text id=\"IDS_{key}\">{value}</text>")
    }

    fn format_key(&self, key: &str) -> String {
        key.to_uppercase()
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        let value = value.replace('"', "\\\"").replace('\'', "\\'");
        Ok(partial_escape(value.as_str()).into_owned())
    }
}
