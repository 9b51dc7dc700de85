//! LogRecord - dispatch output handed to destinations

use serde::Serialize;
use std::time::SystemTime;

use crate::Level;

/// Call-site metadata of a log call.
///
/// Defaults to the location of the logging macro; wrappers that log on behalf
/// of someone else build their own to report the original call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Source file path
    pub path: &'a str,
    /// Function label, possibly with a parameter list
    pub function: &'a str,
    /// Source line
    pub line: u32,
}

impl<'a> CallSite<'a> {
    pub const fn new(path: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            path,
            function,
            line,
        }
    }
}

/// One log event, built once per dispatch call and shared by every
/// destination that accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Severity
    pub level: Level,

    /// Evaluated message
    pub message: String,

    /// Thread tag of the calling thread ("" for the main thread)
    pub thread: String,

    /// Source file path
    pub path: String,

    /// Function name with its parameter list stripped, e.g. `run()`
    pub function: String,

    /// Source line
    pub line: u32,

    /// Capture time (rendered by formatters)
    #[serde(skip)]
    pub timestamp: SystemTime,
}
