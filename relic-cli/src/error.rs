//! Error types emitted by the relic CLI.
//!
//! Keep this error type reasonably small, as the command helpers all return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use relic_core::{QueryError, SqliteMarkerStoreError};
use thiserror::Error;

/// Errors emitted by the relic CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing CLI flag.
        field: &'static str,
        /// Environment variable that can supply it instead.
        env: &'static str,
    },
    /// Opening the catalogue database failed.
    #[error(transparent)]
    OpenCatalogue(#[from] SqliteMarkerStoreError),
    /// The request was invalid or the catalogue store failed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Serializing results to JSON failed.
    #[error("failed to serialize results: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing results to stdout failed.
    #[error("failed to write results: {0}")]
    WriteOutput(#[source] std::io::Error),
}
