//! DestinationSettings - state shared by the bundled destinations

use std::io;

use contracts::{DestinationConfig, ExecutionQueue, FilterRule, Level, QueueKind};

use crate::filter::LevelFilter;
use crate::queue::DispatchQueue;

/// Identity, filter, delivery mode and queue of one destination
#[derive(Debug)]
pub struct DestinationSettings {
    id: String,
    filter: LevelFilter,
    asynchronous: bool,
    queue: Option<DispatchQueue>,
}

impl DestinationSettings {
    /// Settings with an explicit queue (`None` = inactive)
    pub fn new(id: impl Into<String>, queue: Option<DispatchQueue>) -> Self {
        Self {
            id: id.into(),
            filter: LevelFilter::default(),
            asynchronous: true,
            queue,
        }
    }

    /// Settings with a fresh serial queue labelled after the destination
    pub fn serial(id: impl Into<String>) -> io::Result<Self> {
        let id = id.into();
        let queue = DispatchQueue::serial(queue_label(&id))?;
        Ok(Self::new(id, Some(queue)))
    }

    /// Settings built from configuration
    pub fn from_config(config: &DestinationConfig) -> io::Result<Self> {
        let queue = if !config.enabled {
            None
        } else {
            let label = queue_label(&config.name);
            Some(match config.queue {
                QueueKind::Serial => DispatchQueue::serial(label)?,
                QueueKind::Concurrent => DispatchQueue::concurrent(label, config.workers)?,
            })
        };

        Ok(Self::new(config.name.clone(), queue)
            .with_min_level(config.min_level)
            .with_asynchronous(config.asynchronous)
            .with_rules(config.filters.iter().cloned()))
    }

    pub fn with_min_level(self, level: Level) -> Self {
        self.filter.set_min_level(level);
        self
    }

    pub fn with_asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = FilterRule>) -> Self {
        self.filter = self.filter.with_rules(rules);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn min_level(&self) -> Level {
        self.filter.min_level()
    }

    pub fn set_min_level(&self, level: Level) {
        self.filter.set_min_level(level);
    }

    pub fn is_async(&self) -> bool {
        self.asynchronous
    }

    pub fn queue(&self) -> Option<&dyn ExecutionQueue> {
        self.queue.as_ref().map(|q| q as &dyn ExecutionQueue)
    }

    pub fn accepts(&self, level: Level, path: &str, function: &str) -> bool {
        self.filter.accepts(level, path, function)
    }
}

fn queue_label(id: &str) -> String {
    format!("fanlog.{id}")
}
