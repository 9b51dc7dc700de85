//! Layered error definitions
//!
//! Categorized by source: config / destination / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Destination Errors =====
    /// Destination write error
    #[error("destination '{destination}' write error: {message}")]
    DestinationWrite {
        destination: String,
        message: String,
    },

    /// Destination flush error
    #[error("destination '{destination}' flush error: {message}")]
    DestinationFlush {
        destination: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create destination write error
    pub fn destination_write(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationWrite {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create destination flush error
    pub fn destination_flush(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationFlush {
            destination: destination.into(),
            message: message.into(),
        }
    }
}
