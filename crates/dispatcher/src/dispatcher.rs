//! Dispatcher - routes leveled log calls to every accepting destination

use once_cell::sync::OnceCell;
use once_cell::unsync::OnceCell as LocalCell;
use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, instrument, warn};

use contracts::{CallSite, Destination, ExecutionQueue, Job, Level, LogRecord};

use crate::callsite::strip_params;
use crate::filter::should_accept;
use crate::latch::CountdownLatch;
use crate::metrics::{DestinationMetrics, MetricsSnapshot};
use crate::registry::{DestinationRegistry, RegisteredDestination};
use crate::thread::{CurrentThread, ThreadDescriber};

static GLOBAL: OnceCell<Dispatcher> = OnceCell::new();

/// Logging facade over a dynamic set of destinations.
///
/// Intended to live once per process (see [`Dispatcher::global`]) but can be
/// constructed freely, e.g. one per test.
pub struct Dispatcher {
    registry: DestinationRegistry,
    thread_describer: Box<dyn ThreadDescriber>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::with_thread_describer(CurrentThread)
    }

    /// Create an empty dispatcher with a custom thread tag source
    pub fn with_thread_describer(describer: impl ThreadDescriber + 'static) -> Self {
        Self {
            registry: DestinationRegistry::new(),
            thread_describer: Box::new(describer),
        }
    }

    /// The process-wide instance, created on first use
    pub fn global() -> &'static Dispatcher {
        GLOBAL.get_or_init(Dispatcher::new)
    }

    // ===== Destination handling =====

    /// Register a destination; false if one with the same identity exists
    pub fn add_destination(&self, destination: Arc<dyn Destination>) -> bool {
        self.registry.add(destination)
    }

    /// Unregister a destination by identity; false if it was not registered
    pub fn remove_destination(&self, destination: &dyn Destination) -> bool {
        self.registry.remove(destination.id())
    }

    /// Unregister every destination
    pub fn remove_all_destinations(&self) {
        self.registry.clear();
    }

    /// Number of registered destinations
    pub fn count_destinations(&self) -> usize {
        self.registry.len()
    }

    /// Whether a destination with this identity is registered
    pub fn has_destination(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    /// Registered identities, sorted
    pub fn destination_ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    /// Delivery metrics for all registered destinations, sorted by identity
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        let mut metrics: Vec<_> = self
            .registry
            .snapshot()
            .iter()
            .map(|entry| (entry.id().to_owned(), entry.metrics().snapshot()))
            .collect();
        metrics.sort_by(|a, b| a.0.cmp(&b.0));
        metrics
    }

    // ===== Levels =====

    /// Log something generally unimportant (lowest priority)
    pub fn verbose<F, M>(&self, message: F, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.log(Level::Verbose, message, site);
    }

    /// Log something which helps during debugging
    pub fn debug<F, M>(&self, message: F, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.log(Level::Debug, message, site);
    }

    /// Log something interesting that is not an issue
    pub fn info<F, M>(&self, message: F, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.log(Level::Info, message, site);
    }

    /// Log something which may cause trouble soon
    pub fn warning<F, M>(&self, message: F, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.log(Level::Warning, message, site);
    }

    /// Log a failure (highest priority)
    pub fn error<F, M>(&self, message: F, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        self.log(Level::Error, message, site);
    }

    /// Log at `level`, tagging the record with the calling thread
    pub fn log<F, M>(&self, level: Level, message: F, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        let thread = self.thread_describer.describe();
        self.dispatch(level, message, &thread, site);
    }

    /// Route one log call to every destination that accepts it.
    ///
    /// `message` runs at most once, and only if some destination accepts the
    /// call. Async destinations get the send enqueued; sync destinations are
    /// waited on one after another.
    pub fn dispatch<F, M>(&self, level: Level, message: F, thread: &str, site: CallSite<'_>)
    where
        F: FnOnce() -> M,
        M: Display,
    {
        let snapshot = self.registry.snapshot();
        let mut message = Some(message);
        let shared: LocalCell<Arc<LogRecord>> = LocalCell::new();

        for entry in snapshot.iter() {
            let destination = entry.destination();
            let Some(queue) = destination.queue() else {
                continue;
            };

            if !should_accept(destination.as_ref(), level, site.path, site.function) {
                entry.metrics().inc_filtered_count();
                continue;
            }

            let record = shared.get_or_init(|| {
                let text = message
                    .take()
                    .map(|produce| produce().to_string())
                    .unwrap_or_default();
                Arc::new(LogRecord {
                    level,
                    message: text,
                    thread: thread.to_owned(),
                    path: site.path.to_owned(),
                    function: strip_params(site.function),
                    line: site.line,
                    timestamp: SystemTime::now(),
                })
            });

            submit_send(entry, queue, Arc::clone(record));
        }
    }

    // ===== Flush =====

    /// Flush every active destination, waiting at most `timeout_secs`.
    ///
    /// Returns true only if all destinations confirmed before the deadline.
    pub fn flush(&self, timeout_secs: u64) -> bool {
        self.flush_timeout(Duration::from_secs(timeout_secs))
    }

    /// [`flush`](Self::flush) with sub-second precision
    pub fn flush_timeout(&self, timeout: Duration) -> bool {
        self.flush_report(timeout).is_complete()
    }

    /// Flush every active destination and report which ones confirmed
    #[instrument(name = "dispatcher_flush", skip(self), fields(timeout_ms = timeout.as_millis() as u64))]
    pub fn flush_report(&self, timeout: Duration) -> FlushReport {
        let started = Instant::now();
        let snapshot = self.registry.snapshot();
        let active: Vec<&RegisteredDestination> = snapshot
            .iter()
            .filter(|entry| entry.destination().queue().is_some())
            .collect();

        if active.is_empty() {
            return FlushReport::default();
        }

        let latch = Arc::new(CountdownLatch::new(active.len()));
        let confirmed = Arc::new(Mutex::new(Vec::with_capacity(active.len())));

        for entry in &active {
            let Some(queue) = entry.destination().queue() else {
                continue;
            };
            let guard = latch.guard();
            let destination = Arc::clone(entry.destination());
            let metrics = Arc::clone(entry.metrics());
            let confirmed = Arc::clone(&confirmed);

            let job = move || {
                let _guard = guard;
                if let Err(e) = destination.flush() {
                    warn!(destination = %destination.id(), error = %e, "Flush failed");
                }
                metrics.inc_flush_count();
                confirmed.lock().push(destination.id().to_owned());
            };

            if queue.is_current() {
                job();
            } else {
                // A rejected job is dropped unrun and stays pending
                queue.submit(Box::new(job));
            }
        }

        let drained = latch.wait_timeout(timeout);
        let mut completed: Vec<String> = confirmed.lock().clone();
        completed.sort();
        let mut pending: Vec<String> = active
            .iter()
            .map(|entry| entry.id().to_owned())
            .filter(|id| !completed.contains(id))
            .collect();
        pending.sort();

        let report = FlushReport {
            completed,
            pending,
            elapsed: started.elapsed(),
        };

        if !report.is_complete() {
            warn!(
                drained,
                pending = ?report.pending,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Flush did not complete"
            );
        } else {
            debug!(
                destinations = report.completed.len(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Flush complete"
            );
        }
        report
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a flush barrier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Destinations whose flush returned before the deadline, sorted
    pub completed: Vec<String>,
    /// Destinations that did not confirm in time (or whose flush never ran), sorted
    pub pending: Vec<String>,
    /// Time spent waiting
    pub elapsed: Duration,
}

impl FlushReport {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Hand one record to a destination's queue
fn submit_send(entry: &RegisteredDestination, queue: &dyn ExecutionQueue, record: Arc<LogRecord>) {
    let destination = Arc::clone(entry.destination());
    let metrics = Arc::clone(entry.metrics());

    if destination.is_async() {
        let job: Job = Box::new(move || deliver(destination.as_ref(), &record, &metrics));
        if !queue.submit(job) {
            entry.metrics().inc_dropped_count();
        }
        return;
    }

    if queue.is_current() {
        // Already on this destination's worker: waiting on ourselves would deadlock
        deliver(destination.as_ref(), &record, &metrics);
        return;
    }

    let latch = Arc::new(CountdownLatch::new(1));
    let guard = latch.guard();
    let job: Job = Box::new(move || {
        let _guard = guard;
        deliver(destination.as_ref(), &record, &metrics);
    });

    if queue.submit(job) {
        latch.wait();
    } else {
        entry.metrics().inc_dropped_count();
    }
}

/// Run one send; the status only feeds metrics
fn deliver(destination: &dyn Destination, record: &LogRecord, metrics: &DestinationMetrics) {
    match destination.send(record) {
        Ok(()) => metrics.inc_sent_count(),
        Err(e) => {
            metrics.inc_failure_count();
            debug!(destination = %destination.id(), error = %e, "Send failed");
        }
    }
}
