//! Support for Flash `.properties` resource bundles.

use std::path::Path;

use indoc::formatdoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    consumer::Consumer,
    error::Error,
    formats::{FormatType, Formatter, join_sections},
    placeholder::{convert_from_flash, convert_to_flash},
    types::{Row, Section, StringsFile},
};

lazy_static! {
    static ref COMMENT_REGEX: Regex = Regex::new(r"^# *(.*)").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlashFormatter;

impl Formatter for FlashFormatter {
    fn format_type(&self) -> FormatType {
        FormatType::Flash
    }

    fn extension(&self) -> &'static str {
        ".properties"
    }

    fn default_file_name(&self) -> &'static str {
        "resources.properties"
    }

    /// Flash bundles have no directory convention to recognize.
    fn can_handle_directory(&self, _path: &Path) -> bool {
        false
    }

    fn read(&self, content: &str, lang: &str, consumer: &mut Consumer<'_>) -> Result<(), Error> {
        let mut last_comment: Option<String> = None;

        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(captures) = COMMENT_REGEX.captures(line) {
                last_comment = Some(captures[1].to_string());
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if !key.is_empty() {
                    consumer.set_translation(key, lang, &convert_from_flash(value.trim()));
                    if let Some(comment) = &last_comment {
                        consumer.set_comment(key, comment);
                    }
                }
            }
            last_comment = None;
        }
        Ok(())
    }

    fn format_header(&self, lang: &str) -> Option<String> {
        Some(formatdoc!(
            "
            ## Flash Strings File
            ## Generated by Twine
            ## Language: {}",
            lang
        ))
    }

    fn format_sections(&self, strings: &StringsFile, lang: &str) -> Result<String, Error> {
        Ok(join_sections(self, strings, lang, "\n")? + "\n")
    }

    fn format_section_header(&self, section: &Section) -> Option<String> {
        Some(format!("## {} ##\n", section.name))
    }

    fn format_comment(&self, row: &Row) -> Option<String> {
        row.comment.as_deref().map(|comment| format!("# {comment}\n"))
    }

    fn render_key_value(&self, key: &str, value: &str) -> String {
        format!("{key}={value}")
    }

    fn format_value(&self, value: &str) -> Result<String, Error> {
        Ok(convert_to_flash(value))
    }
}
