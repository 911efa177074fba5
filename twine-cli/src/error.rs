//! Errors surfaced by the command line front end.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Twine(#[from] twine::Error),

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Operation(String),

    #[error("loc drop archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unable to read config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    pub fn operation(message: impl Into<String>) -> Self {
        CliError::Operation(message.into())
    }
}
