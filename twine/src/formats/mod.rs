//! All supported localization file formats for twine.
//!
//! This module provides the [`FormatType`] enum naming every format, the
//! [`Formatter`] trait they implement, and the [`Registry`] used to pick a
//! formatter by name, file extension or directory layout.

pub mod android;
pub mod apple;
pub mod django;
pub mod flash;
mod formatter;
pub mod gettext;
pub mod jquery;
pub mod tizen;

use std::{
    fmt::{Display, Formatter as FmtFormatter},
    fs,
    path::Path,
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;
use unic_langid::LanguageIdentifier;

pub use android::AndroidFormatter;
pub use apple::AppleFormatter;
pub use django::DjangoFormatter;
pub use flash::FlashFormatter;
pub use formatter::{Formatter, join_sections};
pub use gettext::GettextFormatter;
pub use jquery::JQueryFormatter;
pub use tizen::TizenFormatter;

use crate::Error;

lazy_static! {
    static ref LANGUAGE_CODE_REGEX: Regex =
        Regex::new(r"^[a-zA-Z]{2,3}([-_][a-zA-Z]{2,4})?$").unwrap();
}

/// Represents all supported localization file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Apple `.strings`.
    Apple,
    /// Android `strings.xml`.
    Android,
    /// gettext `.po`, keyed by `msgctxt`.
    Gettext,
    /// jQuery localize flat JSON object.
    JQuery,
    /// Django `.po`, keyed by `msgid`.
    Django,
    /// Flash `.properties`.
    Flash,
    /// Tizen string table XML (write only).
    Tizen,
}

impl FormatType {
    /// Every format, in lookup priority order.
    pub const ALL: [FormatType; 7] = [
        FormatType::Apple,
        FormatType::Android,
        FormatType::Gettext,
        FormatType::JQuery,
        FormatType::Django,
        FormatType::Flash,
        FormatType::Tizen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormatType::Apple => "apple",
            FormatType::Android => "android",
            FormatType::Gettext => "gettext",
            FormatType::JQuery => "jquery",
            FormatType::Django => "django",
            FormatType::Flash => "flash",
            FormatType::Tizen => "tizen",
        }
    }

    /// Creates the formatter implementing this format.
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            FormatType::Apple => Box::new(AppleFormatter),
            FormatType::Android => Box::new(AndroidFormatter),
            FormatType::Gettext => Box::new(GettextFormatter),
            FormatType::JQuery => Box::new(JQueryFormatter),
            FormatType::Django => Box::new(DjangoFormatter),
            FormatType::Flash => Box::new(FlashFormatter),
            FormatType::Tizen => Box::new(TizenFormatter),
        }
    }
}

impl Display for FormatType {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the format names case-insensitively. Returns
/// [`crate::error::Error::UnknownFormat`] for anything else.
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        FormatType::ALL
            .into_iter()
            .find(|format| format.name() == normalized)
            .ok_or(Error::UnknownFormat(normalized))
    }
}

/// Ordered table of the formatters available to a run.
pub struct Registry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Registry holding every built-in format.
    pub fn builtin() -> Self {
        Self::new(FormatType::ALL)
    }

    pub fn new(formats: impl IntoIterator<Item = FormatType>) -> Self {
        Registry {
            formatters: formats.into_iter().map(FormatType::formatter).collect(),
        }
    }

    pub fn formatters(&self) -> impl Iterator<Item = &dyn Formatter> {
        self.formatters.iter().map(|f| f.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.formatters().map(|f| f.format_name()).collect()
    }

    pub fn by_format(&self, format: FormatType) -> Option<&dyn Formatter> {
        self.formatters().find(|f| f.format_type() == format)
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters()
            .find(|f| f.format_name().eq_ignore_ascii_case(name.trim()))
    }

    /// First formatter whose extension matches the one of `path`.
    pub fn for_path(&self, path: &Path) -> Option<&dyn Formatter> {
        let extension = path.extension()?.to_str()?;
        self.formatters()
            .find(|f| f.extension().trim_start_matches('.') == extension)
    }

    /// First formatter recognizing the layout of `directory`.
    pub fn for_directory(&self, directory: &Path) -> Option<&dyn Formatter> {
        self.formatters().find(|f| f.can_handle_directory(directory))
    }
}

/// Names of the entries directly inside `path`; empty if it cannot be read.
pub(crate) fn directory_entries(path: &Path) -> Vec<String> {
    fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Path components as strings, skipping non UTF-8 components.
pub(crate) fn path_segments(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|component| component.as_os_str().to_str())
        .collect()
}

/// Whether `code` has the shape of a language code such as `fr`, `pt-BR`,
/// `zh_Hans`.
pub fn looks_like_language_code(code: &str) -> bool {
    LANGUAGE_CODE_REGEX.is_match(code)
        && code.replace('_', "-").parse::<LanguageIdentifier>().is_ok()
}

/// The file stem of `path` when it is a language code (`fr.po`, `de-AT.json`).
pub(crate) fn language_from_file_stem(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    looks_like_language_code(stem).then(|| stem.to_string())
}

pub(crate) fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

pub(crate) fn unescape_quotes(text: &str) -> String {
    text.replace("\\\"", "\"")
}

/// Text safe inside an XML comment, which must not contain `--`.
pub(crate) fn xml_comment_text(text: &str) -> String {
    let mut text = text.to_string();
    while text.contains("--") {
        text = text.replace("--", "- -");
    }
    text
}
