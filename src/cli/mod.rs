//! CLI support for simchange
//!
//! Provides programmatic access to the `simchange` commands so other tools
//! can run a compilation unit without going through the binary.

mod compile;
mod show;

pub use compile::{CompileOptions, CompileOutcome, execute_compile};
pub use show::render_sources;

use std::io;

use thiserror::Error;

use crate::error::ChangeError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Building, finalizing or emitting a change failed
    #[error("Error: {0}")]
    Change(#[from] ChangeError),
    /// The unit is not valid JSON or does not match the unit layout
    #[error("Invalid compilation unit: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("No input provided. Use --input or pipe a compilation unit to stdin.")]
    NoInput,
}
