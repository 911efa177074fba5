//! Options shared by the output processor, the formatters and the consumer.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which rows end up in a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeMode {
    /// Translated rows plus untranslated rows filled from the fallback chain.
    #[default]
    All,
    /// Only rows with a translation in the requested language.
    Translated,
    /// Only rows without any translation in the fallback chain.
    Untranslated,
}

impl Display for IncludeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeMode::All => write!(f, "all"),
            IncludeMode::Translated => write!(f, "translated"),
            IncludeMode::Untranslated => write!(f, "untranslated"),
        }
    }
}

impl FromStr for IncludeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(IncludeMode::All),
            "translated" => Ok(IncludeMode::Translated),
            "untranslated" => Ok(IncludeMode::Untranslated),
            other => Err(Error::DataMismatch(format!(
                "unknown include mode '{other}', expected all, translated or untranslated"
            ))),
        }
    }
}

/// Behavior switches for generating and consuming localization files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    /// Only rows carrying one of these tags are generated. New rows added while
    /// consuming receive these tags.
    pub tags: Vec<String>,
    /// With `tags`, also select rows that have no tags.
    pub untagged: bool,
    pub include: IncludeMode,
    /// Overrides the file's developer language as fallback when generating.
    pub developer_language: Option<String>,
    /// Add keys that are unknown to the strings file while consuming.
    pub consume_all: bool,
    /// Take over comments found while consuming.
    pub consume_comments: bool,
}

impl Options {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_untagged(mut self, untagged: bool) -> Self {
        self.untagged = untagged;
        self
    }

    pub fn with_include(mut self, include: IncludeMode) -> Self {
        self.include = include;
        self
    }

    pub fn with_developer_language(mut self, developer_language: Option<String>) -> Self {
        self.developer_language = developer_language;
        self
    }

    pub fn with_consume_all(mut self, consume_all: bool) -> Self {
        self.consume_all = consume_all;
        self
    }

    pub fn with_consume_comments(mut self, consume_comments: bool) -> Self {
        self.consume_comments = consume_comments;
        self
    }
}
