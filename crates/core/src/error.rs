//! Error types for chatlens core functionality.

use thiserror::Error;

/// Main error type for chatlens.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Reading or writing a file failed.
    #[error("File system error: {0}")]
    FileSystem(String),
    /// TOML could not be parsed or serialized.
    #[error("Data parsing error: {0}")]
    Parse(String),
}

/// Result type for chatlens operations.
pub type Result<T> = std::result::Result<T, Error>;
