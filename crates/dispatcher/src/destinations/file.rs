//! FileDestination - appends formatted lines to a file

use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, instrument};

use contracts::{ContractError, Destination, ExecutionQueue, Level, LogRecord};

use super::format::{render, LineFormat};
use super::settings::DestinationSettings;

/// Destination writing to a log file through a buffered writer
#[derive(Debug)]
pub struct FileDestination {
    settings: DestinationSettings,
    path: PathBuf,
    format: LineFormat,
    writer: Mutex<BufWriter<File>>,
}

impl FileDestination {
    /// Create a FileDestination with its own serial queue
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_settings(DestinationSettings::serial(name)?, path)
    }

    /// Create from prepared settings, opening `path` in append mode
    pub fn with_settings(settings: DestinationSettings, path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(destination = %settings.id(), path = %path.display(), "FileDestination opened");

        Ok(Self {
            settings,
            path,
            format: LineFormat::default(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &DestinationSettings {
        &self.settings
    }

    fn append_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")
    }

    fn persist(&self) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.flush()?;
        writer.get_ref().sync_data()
    }
}

impl Destination for FileDestination {
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
        self.append_line(&line).map_err(|e| {
            error!(destination = %self.id(), path = %self.path.display(), error = %e, "Write failed");
            ContractError::destination_write(self.id(), e.to_string())
        })
    }

    #[instrument(name = "file_destination_flush", skip(self), fields(destination = %self.id()))]
    fn flush(&self) -> Result<(), ContractError> {
        self.persist()
            .map_err(|e| ContractError::destination_flush(self.id(), e.to_string()))
    }
}
