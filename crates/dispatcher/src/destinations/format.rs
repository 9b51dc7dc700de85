//! Line formatting for the bundled destinations

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

use contracts::{ContractError, LogRecord};

/// Output line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// `HH:MM:SS.mmm LEVEL [thread] file.function:line - message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LineFormat {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ContractError::Other(format!("unknown line format: '{other}'"))),
        }
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    #[serde(flatten)]
    record: &'a LogRecord,
}

/// Render one record without a trailing newline
pub fn render(record: &LogRecord, format: LineFormat) -> Result<String, ContractError> {
    match format {
        LineFormat::Text => Ok(render_text(record)),
        LineFormat::Json => render_json(record),
    }
}

fn render_text(record: &LogRecord) -> String {
    let time: DateTime<Local> = record.timestamp.into();
    let file = Path::new(&record.path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&record.path);

    let mut line = format!("{} {:<7} ", time.format("%H:%M:%S%.3f"), record.level);
    if !record.thread.is_empty() {
        line.push_str(&format!("[{}] ", record.thread));
    }
    line.push_str(&format!(
        "{}.{}:{} - {}",
        file, record.function, record.line, record.message
    ));
    line
}

fn render_json(record: &LogRecord) -> Result<String, ContractError> {
    let time: DateTime<Utc> = record.timestamp.into();
    let line = JsonLine {
        timestamp: time.to_rfc3339_opts(SecondsFormat::Millis, true),
        record,
    };
    serde_json::to_string(&line).map_err(|e| ContractError::Other(format!("json encode error: {e}")))
}
