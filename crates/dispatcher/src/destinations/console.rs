//! ConsoleDestination - writes formatted lines to stdout or stderr

use std::io::{self, Write};
use std::str::FromStr;
use tracing::instrument;

use contracts::{ContractError, Destination, ExecutionQueue, Level, LogRecord};

use super::format::{render, LineFormat};
use super::settings::DestinationSettings;

/// Standard stream to write to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for ConsoleStream {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            other => Err(ContractError::Other(format!("unknown console stream: '{other}'"))),
        }
    }
}

/// Destination printing one line per record
#[derive(Debug)]
pub struct ConsoleDestination {
    settings: DestinationSettings,
    stream: ConsoleStream,
    format: LineFormat,
}

impl ConsoleDestination {
    /// Create a ConsoleDestination on stdout with its own serial queue
    pub fn new(name: impl Into<String>) -> io::Result<Self> {
        Ok(Self::with_settings(DestinationSettings::serial(name)?))
    }

    /// Create from prepared settings
    pub fn with_settings(settings: DestinationSettings) -> Self {
        Self {
            settings,
            stream: ConsoleStream::default(),
            format: LineFormat::default(),
        }
    }

    pub fn with_stream(mut self, stream: ConsoleStream) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    pub fn settings(&self) -> &DestinationSettings {
        &self.settings
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            ConsoleStream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        }
    }
}

impl Destination for ConsoleDestination {
    fn id(&self) -> &str {
        self.settings.id()
    }

    fn min_level(&self) -> Level {
        self.settings.min_level()
    }

    fn queue(&self) -> Option<&dyn ExecutionQueue> {
        self.settings.queue()
    }

    fn is_async(&self) -> bool {
        self.settings.is_async()
    }

    fn should_accept(&self, level: Level, path: &str, function: &str) -> bool {
        self.settings.accepts(level, path, function)
    }

    fn send(&self, record: &LogRecord) -> Result<(), ContractError> {
        let line = render(record, self.format)?;
        self.write_line(&line)
            .map_err(|e| ContractError::destination_write(self.id(), e.to_string()))
    }

    #[instrument(name = "console_destination_flush", skip(self), fields(destination = %self.id()))]
    fn flush(&self) -> Result<(), ContractError> {
        let result = match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        };
        result.map_err(|e| ContractError::destination_flush(self.id(), e.to_string()))
    }
}
