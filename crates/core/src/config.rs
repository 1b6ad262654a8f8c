//! Configuration file layout and TOML helpers.

use crate::Error;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for chatlens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatlensConfig {
    /// Directory that per-author report files are written to.
    pub reports_dir: PathBuf,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given.
    pub level: LogLevel,

    /// Include the event target in log lines.
    pub show_target: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level.
    Error,

    /// Warning level.
    Warn,

    /// Info level.
    Info,

    /// Debug level.
    Debug,

    /// Trace level.
    Trace,
}

impl ChatlensConfig {
    /// Create a configuration rooted in the platform data directory.
    pub fn default_paths() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("Cannot find data directory".to_string()))?
            .join("chatlens");

        Ok(Self {
            reports_dir: data_dir.join("reports"),
            logging: LoggingConfig::default(),
        })
    }

    /// Platform default location of the configuration file.
    pub fn default_file() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("chatlens")
            .join("config.toml"))
    }
}

/// Read any TOML-backed settings type from `path`.
///
/// Types with `#[serde(default)]` accept partial or empty files.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::FileSystem(format!("Failed to read config file: {}", e)))?;

    toml::from_str(&content).map_err(|e| {
        Error::Parse(format!(
            "Failed to parse config {}: {}",
            path.display(),
            e
        ))
    })
}

/// Write `value` as pretty TOML to `path`, creating parent directories.
pub fn save_toml<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(value)
        .map_err(|e| Error::Parse(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .map_err(|e| Error::FileSystem(format!("Failed to write config file: {}", e)))
}

impl Default for ChatlensConfig {
    fn default() -> Self {
        Self::default_paths().unwrap_or_else(|_| Self {
            reports_dir: PathBuf::from("chat_reports"),
            logging: LoggingConfig::default(),
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            show_target: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ChatlensConfig {
            reports_dir: PathBuf::from("/tmp/reports"),
            logging: LoggingConfig {
                level: LogLevel::Debug,
                show_target: true,
            },
        };
        save_toml(&config, &path).unwrap();

        let loaded: ChatlensConfig = load_toml(&path).unwrap();
        assert_eq!(loaded.reports_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(loaded.logging.level, LogLevel::Debug);
        assert!(loaded.logging.show_target);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();

        let loaded: ChatlensConfig = load_toml(&path).unwrap();
        assert_eq!(loaded.logging.level, LogLevel::Info);
        assert!(!loaded.logging.show_target);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reports_dir = [").unwrap();

        assert!(matches!(
            load_toml::<ChatlensConfig>(&path),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "  \n").unwrap();

        let loaded: ChatlensConfig = load_toml(&path).unwrap();
        assert_eq!(loaded.logging.level, LogLevel::Warn);
    }

    #[test]
    fn missing_file_is_a_file_system_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_toml::<ChatlensConfig>(&dir.path().join("absent.toml")),
            Err(Error::FileSystem(_))
        ));
    }
}
