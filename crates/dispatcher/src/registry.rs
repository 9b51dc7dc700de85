//! DestinationRegistry - deduplicated set of active destinations
//!
//! Writers swap in a new map under a write lock; readers clone the current
//! `Arc` and iterate it without holding any lock, so one dispatch pass always
//! sees a consistent set even while destinations are added or removed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use contracts::Destination;

use crate::metrics::DestinationMetrics;

/// A destination together with the metrics the dispatcher keeps for it
#[derive(Clone)]
pub struct RegisteredDestination {
    destination: Arc<dyn Destination>,
    metrics: Arc<DestinationMetrics>,
}

impl RegisteredDestination {
    fn new(destination: Arc<dyn Destination>) -> Self {
        Self {
            destination,
            metrics: Arc::new(DestinationMetrics::new()),
        }
    }

    pub fn destination(&self) -> &Arc<dyn Destination> {
        &self.destination
    }

    pub fn metrics(&self) -> &Arc<DestinationMetrics> {
        &self.metrics
    }

    pub fn id(&self) -> &str {
        self.destination.id()
    }
}

type Entries = HashMap<String, RegisteredDestination>;

/// Immutable view of the registry taken at one point in time
#[derive(Clone)]
pub struct RegistrySnapshot(Arc<Entries>);

impl RegistrySnapshot {
    /// Iterate entries (order is unspecified)
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredDestination> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Set of destinations keyed by identity
#[derive(Default)]
pub struct DestinationRegistry {
    entries: RwLock<Arc<Entries>>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a destination.
    ///
    /// Returns false and leaves the registry untouched if a destination with
    /// the same identity is already registered.
    pub fn add(&self, destination: Arc<dyn Destination>) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(destination.id()) {
            return false;
        }

        let id = destination.id().to_owned();
        debug!(destination = %id, "Destination added");
        Arc::make_mut(&mut *entries).insert(id, RegisteredDestination::new(destination));
        true
    }

    /// Remove the destination with the given identity; false if absent
    pub fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.write();
        if !entries.contains_key(id) {
            return false;
        }

        debug!(destination = %id, "Destination removed");
        Arc::make_mut(&mut *entries).remove(id).is_some()
    }

    /// Remove every destination
    pub fn clear(&self) {
        *self.entries.write() = Arc::new(HashMap::new());
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Registered identities, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Consistent view for one dispatch or flush pass
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot(Arc::clone(&*self.entries.read()))
    }
}
