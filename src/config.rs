//! Runtime configuration
//!
//! Read from an optional YAML file. Every field has a default, so an empty
//! file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database file; falls back to [`default_db_path`]
    pub db_path: Option<PathBuf>,
    /// Log filter used when `WORDWEAVE_LOG` is unset (e.g. "info", "wordweave=debug")
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Database path: explicit override, then config, then the default
    pub fn resolve_db_path(&self, override_path: Option<PathBuf>) -> PathBuf {
        override_path
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(default_db_path)
    }
}

/// Get the default database path (~/.local/share/wordweave/wordweave.db)
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("wordweave").join("wordweave.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str("db_path: /tmp/words.db\n").unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/words.db")));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(Config::from_yaml_str("dbpath: x\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn db_path_precedence() {
        let config = Config {
            db_path: Some(PathBuf::from("from-config.db")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_db_path(Some(PathBuf::from("flag.db"))),
            PathBuf::from("flag.db")
        );
        assert_eq!(config.resolve_db_path(None), PathBuf::from("from-config.db"));
        assert!(Config::default().resolve_db_path(None).ends_with("wordweave/wordweave.db"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordweave.yaml");
        std::fs::write(&path, "log_level: debug\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(matches!(Config::load(dir.path().join("missing.yaml")), Err(ConfigError::Io(_))));
    }
}
