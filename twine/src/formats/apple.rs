//! Support for Apple `.strings` localization files.
//!
//! Files live in `<lang>.lproj` directories; `Base.lproj` never names a
//! language.

use std::path::Path;

use indoc::formatdoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{
        FormatType, Formatter, directory_entries, escape_quotes, language_from_file_stem,
        path_segments, unescape_quotes,
    },
    types::{Row, Section, StringsFile},
};

lazy_static! {
    static ref KEY_VALUE_REGEX: Regex = Regex::new(
        r#"^\s*((?:"(?:[^"\\]|\\.)+")|(?:[^"\s=]+))\s*=\s*"((?:[^"\\]|\\.)*)""#
    )
    .unwrap();
    static ref COMMENT_REGEX: Regex = Regex::new(r"/\* (.*) \*/").unwrap();
    static ref LPROJ_REGEX: Regex = Regex::new(r"^(.+)\.lproj$").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppleFormatter;

impl AppleFormatter {
    /// Joins values spanning several lines into one line, turning the line
    /// breaks into `\n` escapes and dropping the indentation of continuation
    /// lines.
    pub fn multiline_values_to_one_line(content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();
        let mut inside_value = false;
        let mut value_buf = String::new();

        while let Some(c) = chars.next() {
            if !inside_value {
                result.push(c);
                if c == '=' {
                    // Seek the opening quote of the value
                    while let Some(&d) = chars.peek() {
                        if d == '\n' {
                            break;
                        }
                        result.push(d);
                        chars.next();
                        if d == '"' {
                            inside_value = true;
                            value_buf.clear();
                            break;
                        }
                    }
                }
            } else if c == '"' {
                let prev_backslashes = value_buf.chars().rev().take_while(|&x| x == '\\').count();
                if prev_backslashes % 2 == 0 {
                    inside_value = false;
                    let one_line = value_buf
                        .split('\n')
                        .enumerate()
                        .map(|(i, line)| if i == 0 { line } else { line.trim_start() })
                        .collect::<Vec<_>>()
                        .join(r"\n");
                    result.push_str(&one_line);
                    result.push('"');
                    value_buf.clear();
                } else {
                    value_buf.push('"');
                }
            } else {
                value_buf.push(c);
            }
        }
        // Unterminated value: keep it as it was
        result.push_str(&value_buf);
        result
    }
}

impl Formatter for AppleFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::Apple
    }

    fn extension(&self) -> &'static str {
        ".strings"
    }

    fn default_file_name(&self) -> &'static str {
        "Localizable.strings"
    }

    fn can_handle_directory(&self, path: &Path) -> bool {
        directory_entries(path)
            .iter()
            .any(|name| LPROJ_REGEX.is_match(name))
    }

    fn determine_language(&self, path: &Path, _strings: &StringsFile) -> Option<String> {
        path_segments(path)
            .into_iter()
            .rev()
            .filter_map(|segment| LPROJ_REGEX.captures(segment))
            .map(|captures| captures[1].to_string())
            .find(|lang| lang != "Base")
            .or_else(|| language_from_file_stem(path))
    }

    fn output_path_for_language(&self, lang: &str, _strings: &StringsFile) -> String {
        format!("{lang}.lproj")
    }

    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error> {
        let content = Self::multiline_values_to_one_line(&content.replace("\r\n", "\n"));
        let mut last_comment: Option<String> = None;

        for line in content.lines() {
            if let Some(captures) = KEY_VALUE_REGEX.captures(line) {
                let raw_key = &captures[1];
                let key = raw_key
                    .strip_prefix('"')
                    .and_then(|key| key.strip_suffix('"'))
                    .unwrap_or(raw_key);
                let key = unescape_quotes(key);
                let value = unescape_quotes(&captures[2]);
                consumer.set_translation(&key, lang, &value);
                if let Some(comment) = &last_comment {
                    consumer.set_comment(&key, comment);
                }
            }
            last_comment = COMMENT_REGEX
                .captures(line)
                .map(|captures| captures[1].to_string());
        }
        Ok(())
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(formatdoc!(
            "
            /**
             * Apple Strings File
             * Generated by Twine
             * Language: {}
             */",
            lang
        ))
    }

    fn format_section_header(&self, section: &Section) -> Option<String> {
        Some(format!("/********** {} **********/\n", section.name))
    }

    fn format_comment(&self, row: &Row) -> Option<String> {
        row.comment
            .as_deref()
            .map(|comment| format!("/* {} */\n", comment.replace("*/", "* /")))
    }

    fn render_key_value(&self, key: &str, value: &str) -> String {
        format!("\"{key}\" = \"{value}\";\n")
    }

    fn format_key(&self, key: &str) -> String {
        escape_quotes(key)
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        Ok(escape_quotes(value))
    }
}
