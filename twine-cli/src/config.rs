//! Optional `twine.toml` holding defaults for the command line flags.
//!
//! ```toml
//! developer_language = "en"
//! format = "android"
//! tags = ["app", "web"]
//! include = "translated"
//! validate = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use twine::IncludeMode;

use crate::error::CliError;

/// File name looked up next to the strings file when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "twine.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub developer_language: Option<String>,
    pub format: Option<String>,
    pub tags: Option<Vec<String>>,
    pub untagged: Option<bool>,
    pub consume_all: Option<bool>,
    pub consume_comments: Option<bool>,
    pub include: Option<IncludeMode>,
    pub encoding: Option<String>,
    pub validate: Option<bool>,
    pub pedantic: Option<bool>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` when given, else `twine.toml` beside `strings_file`
    /// if there is one.
    pub fn discover(strings_file: &Path, explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = sibling_config(strings_file);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            Self::load(&candidate)
        } else {
            Ok(Config::default())
        }
    }
}

fn sibling_config(strings_file: &Path) -> PathBuf {
    strings_file
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_keys() {
        let config: Config = toml::from_str(
            r#"
            developer_language = "de"
            format = "gettext"
            tags = ["app"]
            untagged = true
            consume_all = true
            consume_comments = false
            include = "untranslated"
            encoding = "UTF-16"
            validate = true
            pedantic = true
            "#,
        )
        .unwrap();
        assert_eq!(config.developer_language.as_deref(), Some("de"));
        assert_eq!(config.format.as_deref(), Some("gettext"));
        assert_eq!(config.tags, Some(vec!["app".to_string()]));
        assert_eq!(config.include, Some(IncludeMode::Untranslated));
        assert_eq!(config.consume_comments, Some(false));
        assert_eq!(config.pedantic, Some(true));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twine.toml");
        fs::write(&path, "colour = \"blue\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_discover_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let strings = dir.path().join("strings.txt");
        assert_eq!(Config::discover(&strings, None).unwrap(), Config::default());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "format = \"apple\"\n").unwrap();
        let config = Config::discover(&strings, None).unwrap();
        assert_eq!(config.format.as_deref(), Some("apple"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "format = \"apple\"\n").unwrap();
        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "format = \"flash\"\n").unwrap();

        let config = Config::discover(&dir.path().join("strings.txt"), Some(&explicit)).unwrap();
        assert_eq!(config.format.as_deref(), Some("flash"));
    }
}
