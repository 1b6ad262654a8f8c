//! Command-line interface for chatlens.
//!
//! This crate provides commands for analysing exported chat transcripts,
//! extracting the latest day of a conversation, and managing configuration.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
