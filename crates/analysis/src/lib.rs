//! Transcript parsing and per-author statistics for chatlens.
//!
//! This crate turns an exported chat transcript into messages and derives
//! activity, timing, lexical and sentiment statistics for every author.

#![deny(missing_docs, unsafe_code)]

/// Chat transcript parsers.
pub mod parsers;

/// Global and per-author message orderings.
pub mod partition;

/// Message counts, timing and streak metrics.
pub mod stats;

/// Per-day message counts.
pub mod activity;

/// Tokenization and stopword filtering.
pub mod nlp;

/// Word frequency and part-of-speech statistics.
pub mod lexical;

/// Polarity-derived statistics.
pub mod sentiment;

/// Polarity scorer and part-of-speech tagger capabilities.
pub mod services;

/// Built-in lexicon scorer and rule-based tagger.
pub mod lexicon;

/// Runs every aggregator and merges per-author reports.
pub mod pipeline;

/// Latest-day extraction and author renaming.
pub mod extract;

/// Error types for analysis operations.
pub mod error;

/// Configuration for analysis modules.
pub mod config;

pub use error::{AnalysisError, AnalysisResult};
pub use pipeline::Analyzer;
