//! Support for Android `strings.xml` resources.
//!
//! Only `<string>` elements are read; `<plurals>` and `<string-array>` are
//! skipped. Values are written with the escaping aapt expects: quotes and
//! apostrophes behind a backslash, markup characters as entities, `@` escaped
//! unless it starts a resource reference, and edge spaces as ` `.

use std::path::Path;

use indoc::formatdoc;
use lazy_static::lazy_static;
use quick_xml::{
    Reader,
    escape::{partial_escape, unescape},
    events::{BytesStart, Event},
};
use regex::Regex;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{
        FormatType, Formatter, directory_entries, join_sections, path_segments, xml_comment_text,
    },
    placeholder::{convert_from_android, convert_to_android},
    types::{Row, Section, StringsFile},
};

/// Android resource qualifiers that do not follow the `xx-rYY` pattern, and
/// the language code they stand for.
pub const LANG_CODES: &[(&str, &str)] = &[
    ("zh-rCN", "zh-Hans"),
    ("zh-rHK", "zh-Hant"),
    ("en-rGB", "en-UK"),
    ("in", "id"),
    ("nb", "no"),
];

const ESCAPED_SPACE: &str = "\\u0020";

lazy_static! {
    static ref VALUES_REGEX: Regex = Regex::new(r"(?i)^values-([a-z]{2}(-r[a-z]{2})?)$").unwrap();
    static ref REGION_REGEX: Regex = Regex::new(r"^([a-z]{2})-([A-Z]{2})$").unwrap();
    static ref RESOURCE_IDENTIFIER_REGEX: Regex =
        Regex::new(r"^([a-z.]+:)?[a-z+]+/[a-zA-Z_]+").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidFormatter;

impl AndroidFormatter {
    /// Turns an Android resource value into a strings file value.
    pub fn decode_value(&self, raw: &str) -> String {
        let value = unescape(raw).map(|v| v.into_owned()).unwrap_or_else(|_| raw.to_string());
        let value = value.replace("\\'", "'").replace("\\\"", "\"");
        let value = convert_from_android(&value).replace("\\@", "@");
        decode_edge_spaces(&value)
    }

    fn language_for_qualifier(qualifier: &str) -> String {
        let lang = LANG_CODES
            .iter()
            .find(|(android, _)| *android == qualifier)
            .map(|(_, lang)| (*lang).to_string())
            .unwrap_or_else(|| qualifier.to_string());
        lang.replacen("-r", "-", 1)
    }

    fn qualifier_for_language(lang: &str) -> String {
        if let Some((android, _)) = LANG_CODES.iter().find(|(_, code)| *code == lang) {
            return (*android).to_string();
        }
        match REGION_REGEX.captures(lang) {
            Some(captures) => format!("{}-r{}", &captures[1], &captures[2]),
            None => lang.to_string(),
        }
    }

    fn read_string(
        &self,
        reader: &mut Reader<&[u8]>,
        start: &BytesStart<'_>,
        is_empty: bool,
    ) -> Result<Option<(String, String)>, Error> {
        let mut name = None;
        for attr in start.attributes().with_checks(false) {
            let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
            if attr.key.as_ref() == b"name" {
                name = Some(attr.unescape_value()?.into_owned());
            }
        }

        let raw = if is_empty {
            String::new()
        } else {
            reader.read_text(start.name())?.into_owned()
        };
        Ok(name.map(|name| (name, self.decode_value(&raw))))
    }
}

fn decode_edge_spaces(value: &str) -> String {
    let mut rest = value;
    let mut leading = 0;
    while let Some(stripped) = rest.strip_prefix(ESCAPED_SPACE) {
        leading += 1;
        rest = stripped;
    }
    let mut trailing = 0;
    while let Some(stripped) = rest.strip_suffix(ESCAPED_SPACE) {
        trailing += 1;
        rest = stripped;
    }
    format!("{}{rest}{}", " ".repeat(leading), " ".repeat(trailing))
}

fn encode_edge_spaces(value: &str) -> String {
    let trimmed = value.trim_start_matches(' ');
    let leading = value.len() - trimmed.len();
    let inner = trimmed.trim_end_matches(' ');
    let trailing = trimmed.len() - inner.len();
    format!(
        "{}{inner}{}",
        ESCAPED_SPACE.repeat(leading),
        ESCAPED_SPACE.repeat(trailing)
    )
}

fn escape_at_signs(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(position) = rest.find('@') {
        result.push_str(&rest[..position]);
        let after = &rest[position + 1..];
        if RESOURCE_IDENTIFIER_REGEX.is_match(after) {
            result.push('@');
        } else {
            result.push_str("\\@");
        }
        rest = after;
    }
    result.push_str(rest);
    result
}

impl Formatter for AndroidFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::Android
    }

    fn extension(&self) -> &'static str {
        ".xml"
    }

    fn default_file_name(&self) -> &'static str {
        "strings.xml"
    }

    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path)
            .iter()
            .any(|name| name.starts_with("values"))
    }

    fn determine_language(&self, path: &Path, strings: &StringsFile) -> Option<String> {
        for segment in path_segments(path).into_iter().rev() {
            if segment == "values" {
                return strings.developer_language().map(str::to_string);
            }
            if let Some(captures) = VALUES_REGEX.captures(segment) {
                return Some(Self::language_for_qualifier(&captures[1]));
            }
        }
        None
    }

    fn output_path_for_language(&self, lang: &str, strings: &StringsFile) -> String {
        if strings.developer_language() == Some(lang) {
            "values".to_string()
        } else {
            format!("values-{}", Self::qualifier_for_language(lang))
        }
    }

    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error> {
        let mut reader = Reader::from_str(content);
        let mut comment: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) if e.name().as_ref() == b"resources" => comment = None,
                Event::Comment(ref text) => {
                    let text = String::from_utf8_lossy(text).trim().to_string();
                    comment = (!text.starts_with("SECTION:")).then_some(text);
                }
                Event::Start(ref e) if e.name().as_ref() == b"string" => {
                    if let Some((key, value)) = self.read_string(&mut reader, e, false)? {
                        consumer.set_translation(&key, lang, &value);
                        if let Some(comment) = &comment {
                            consumer.set_comment(&key, comment);
                        }
                    }
                    comment = None;
                }
                Event::Empty(ref e) if e.name().as_ref() == b"string" => {
                    if let Some((key, value)) = self.read_string(&mut reader, e, true)? {
                        consumer.set_translation(&key, lang, &value);
                    }
                    comment = None;
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(formatdoc!(
            r#"
            <?xml version="1.0" encoding="utf-8"?>
            <!-- Android Strings File -->
            <!-- Generated by Twine -->
            <!-- Language: {} -->"#,
            lang
        ))
    }

    fn format_sections(&self, strings: &StringsFile, lang: &str) -> Result<String, Error> {
        let sections = join_sections(self, strings, lang, "\n")?;
        Ok(format!("<resources>{sections}\n</resources>\n"))
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
        format!("\t<string name=\"{key}\">{value}</string>")
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        let value = value.replace('"', "\\\"").replace('\'', "\\'");
        let value = partial_escape(value.as_str()).into_owned();
        let value = convert_to_android(&value)?;
        let value = escape_at_signs(&value);
        Ok(encode_edge_spaces(&value))
    }
}
