//! Level - log severity
//!
//! Five severities, integer comparable, lowest first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Log severity.
///
/// Ordered `Verbose < Debug < Info < Warning < Error`; a destination accepts a
/// record when `record.level >= destination.min_level()`.
///
/// # Examples
/// ```
/// use contracts::Level;
///
/// assert!(Level::Warning > Level::Info);
/// assert_eq!("warn".parse::<Level>().unwrap(), Level::Warning);
/// assert_eq!(Level::Error.to_string(), "ERROR");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// Generally unimportant output (lowest priority)
    #[default]
    Verbose = 0,
    /// Output that helps during debugging
    Debug = 1,
    /// Interesting events that are not a problem
    Info = 2,
    /// Events that may cause trouble soon
    Warning = 3,
    /// Failures (highest priority)
    Error = 4,
}

impl Level {
    /// All levels in ascending order
    pub const ALL: [Level; 5] = [
        Level::Verbose,
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
    ];

    /// Integer representation
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the integer representation
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Level::Verbose),
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warning),
            4 => Some(Level::Error),
            _ => None,
        }
    }

    /// Upper-case label used by text formatters
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "VERBOSE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verbose" | "trace" => Ok(Level::Verbose),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            other => Err(ContractError::Other(format!("unknown log level: '{other}'"))),
        }
    }
}
