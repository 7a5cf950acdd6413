//! CLI error types.

use thiserror::Error;

use nebula_api::{ApiError, Phase};

/// CLI-specific errors. Every error terminates the process with exit
/// code 1 after being printed on stderr.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error from the Nebula API client.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A command was invoked against a namespace in the wrong state.
    #[error("command error: {0}")]
    Command(String),

    /// A `--wait` loop exceeded its deadline.
    #[error("timed out waiting for namespace '{alias}' (last phase {phase})")]
    WaitTimeout {
        /// Alias of the namespace being waited on.
        alias: String,
        /// Last phase observed before giving up.
        phase: Phase,
    },

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// Tunnel setup or transport failure.
    #[error("tunnel error: {0}")]
    Tunnel(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
