//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Destination creation error
    #[error("failed to create destination '{name}': {message}")]
    DestinationCreation { name: String, message: String },

    /// Invalid destination parameter
    #[error("invalid parameter '{param}' for destination '{name}': {message}")]
    InvalidParam {
        name: String,
        param: String,
        message: String,
    },

    /// Destination error (from contract)
    #[error("destination error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a destination creation error
    pub fn destination_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(
        name: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParam {
            name: name.into(),
            param: param.into(),
            message: message.into(),
        }
    }
}
