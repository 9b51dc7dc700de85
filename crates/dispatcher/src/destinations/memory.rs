//! MemoryDestination - keeps records in memory for inspection

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;

use contracts::{ContractError, Destination, ExecutionQueue, Level, LogRecord};

use super::settings::DestinationSettings;

/// Destination that stores every accepted record.
///
/// With a capacity the oldest records are evicted first.
#[derive(Debug)]
pub struct MemoryDestination {
    settings: DestinationSettings,
    capacity: Option<usize>,
    records: Mutex<VecDeque<LogRecord>>,
}

impl MemoryDestination {
    /// Create an unbounded MemoryDestination with its own serial queue
    pub fn new(name: impl Into<String>) -> io::Result<Self> {
        Ok(Self::with_settings(DestinationSettings::serial(name)?))
    }

    /// Create from prepared settings
    pub fn with_settings(settings: DestinationSettings) -> Self {
        Self {
            settings,
            capacity: None,
            records: Mutex::new(VecDeque::new()),
        }
    }

    /// Keep at most `capacity` records (0 keeps nothing)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn settings(&self) -> &DestinationSettings {
        &self.settings
    }

    /// Copy of the stored records, oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Stored messages, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return every stored record
    pub fn take(&self) -> Vec<LogRecord> {
        self.records.lock().drain(..).collect()
    }
}

impl Destination for MemoryDestination {
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
        let mut records = self.records.lock();
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Ok(());
            }
            while records.len() >= capacity {
                records.pop_front();
            }
        }
        records.push_back(record.clone());
        Ok(())
    }
}
