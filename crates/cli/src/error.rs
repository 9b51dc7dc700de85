//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Flush barrier expired before every destination confirmed
    #[error("Flush did not complete within {timeout_secs}s, pending: {}", pending.join(", "))]
    FlushIncomplete {
        pending: Vec<String>,
        timeout_secs: u64,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn flush_incomplete(pending: Vec<String>, timeout_secs: u64) -> Self {
        Self::FlushIncomplete {
            pending,
            timeout_secs,
        }
    }
}
