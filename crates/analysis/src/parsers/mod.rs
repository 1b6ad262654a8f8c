use chatlens_core::Transcript;
use std::path::Path;
use thiserror::Error;

mod whatsapp;

pub use whatsapp::{ParseSummary, WhatsAppParser};

/// Errors that can occur during chat parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO operation error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A header-shaped line whose date or time cannot be interpreted.
    #[error("Malformed timestamp on line {line_number} ({reason}): {line}")]
    MalformedTimestamp {
        /// One-based line number in the transcript.
        line_number: usize,
        /// The offending line.
        line: String,
        /// Why the timestamp was rejected.
        reason: String,
    },
    /// Input exceeds the import size limit.
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    FileTooLarge {
        /// Size of the rejected file.
        size: u64,
        /// Configured maximum.
        limit: u64,
    },
}

/// Trait for platform-specific transcript parsers.
pub trait ChatParser: Send + Sync {
    /// Returns the name of the parser.
    fn name(&self) -> &str;
    /// Check if this parser can handle the given file.
    fn can_parse(&self, path: &Path) -> bool;
    /// Parse the transcript file into messages in file order.
    fn parse(&self, path: &Path) -> Result<Transcript, ParseError>;
}
