//! Core types, errors, and configuration for chatlens
//!
//! This crate provides the data model shared by the transcript parser, the
//! per-author aggregators, and the command-line front-end.

#![deny(missing_docs, unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::ChatlensConfig;
pub use error::{Error, Result};
pub use types::*;
