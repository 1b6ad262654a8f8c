//! Error types for CLI operations.

use chatlens_analysis::parsers::ParseError;
use chatlens_analysis::AnalysisError;
use thiserror::Error;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error.
    #[error("File system error: {0}")]
    FileSystem(String),

    /// Analysis error.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(e) => CliError::Io(e),
            other => CliError::Parse(other.to_string()),
        }
    }
}

impl From<AnalysisError> for CliError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Parse(e) => e.into(),
            AnalysisError::Config(msg) => CliError::Config(msg),
            other => CliError::Analysis(other.to_string()),
        }
    }
}

impl From<chatlens_core::Error> for CliError {
    fn from(err: chatlens_core::Error) -> Self {
        match err {
            chatlens_core::Error::Config(msg) => CliError::Config(msg),
            chatlens_core::Error::Io(e) => CliError::Io(e),
            chatlens_core::Error::FileSystem(msg) => CliError::FileSystem(msg),
            chatlens_core::Error::Parse(msg) => CliError::Config(msg),
        }
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
