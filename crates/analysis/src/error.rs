use crate::parsers::ParseError;
use thiserror::Error;

/// Errors that can occur during analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Transcript parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// Polarity scorer or part-of-speech tagger failure.
    #[error("Analysis service error: {0}")]
    AnalysisService(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
    /// I/O operation error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A concurrent aggregator task did not complete.
    #[error("Aggregator task failed: {0}")]
    Task(String),
}

impl AnalysisError {
    /// Create an analysis service error.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::AnalysisService(msg.into())
    }
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
