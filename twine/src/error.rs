//! All error types for the twine crate.
//!
//! These are returned from all fallible operations (parsing the strings file,
//! reading and formatting localization files, validation, encoding).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to parse line {line} of {}: {content}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("Unable to determine format of {}", .0.display())]
    FormatResolution(PathBuf),

    #[error("Unable to determine language for {}", .0.display())]
    LanguageResolution(PathBuf),

    #[error("{0}")]
    Validation(String),

    #[error("The value \"{0}\" contains numbered and non-numbered placeholders")]
    PlaceholderMix(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("unknown encoding `{0}`")]
    Encoding(String),
}

impl Error {
    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn parse_error(path: impl Into<PathBuf>, line: usize, content: &str) -> Self {
        Error::Parse {
            path: path.into(),
            line,
            content: content.to_string(),
        }
    }
}
