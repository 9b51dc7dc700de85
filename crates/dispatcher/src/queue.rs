//! DispatchQueue - isolated execution queue with dedicated worker threads

use parking_lot::Mutex;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use contracts::{ExecutionQueue, Job};

/// Execution queue backed by one (serial) or more (concurrent) worker threads.
///
/// Jobs are taken from the channel in submission order. With a single worker
/// they also complete in that order; a worker pool only preserves the order in
/// which jobs start.
///
/// Dropping the queue closes it and joins the workers once everything already
/// submitted has run.
pub struct DispatchQueue {
    /// Queue label, also the worker thread name prefix
    label: String,
    /// Channel to send jobs to workers, taken on drop
    tx: Option<mpsc::UnboundedSender<Job>>,
    /// Worker thread handles
    workers: Vec<JoinHandle<()>>,
}

impl DispatchQueue {
    /// Create a queue with a single worker
    pub fn serial(label: impl Into<String>) -> io::Result<Self> {
        Self::spawn(label.into(), 1)
    }

    /// Create a queue with a pool of `workers` threads (at least one)
    pub fn concurrent(label: impl Into<String>, workers: usize) -> io::Result<Self> {
        Self::spawn(label.into(), workers.max(1))
    }

    fn spawn(label: String, worker_count: usize) -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let thread_name = if worker_count == 1 {
                label.clone()
            } else {
                format!("{label}-{index}")
            };
            let worker_rx = Arc::clone(&rx);
            let worker_label = label.clone();

            let handle = thread::Builder::new()
                .name(thread_name)
                .spawn(move || queue_worker(worker_label, worker_rx))?;
            workers.push(handle);
        }

        debug!(queue = %label, workers = worker_count, "DispatchQueue started");

        Ok(Self {
            label,
            tx: Some(tx),
            workers,
        })
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn worker_ids(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.workers.iter().map(|w| w.thread().id())
    }
}

impl ExecutionQueue for DispatchQueue {
    fn label(&self) -> &str {
        &self.label
    }

    fn submit(&self, job: Job) -> bool {
        let sent = self.tx.as_ref().is_some_and(|tx| tx.send(job).is_ok());
        if !sent {
            warn!(queue = %self.label, "Queue closed, job rejected");
        }
        sent
    }

    fn is_current(&self) -> bool {
        let current = thread::current().id();
        self.worker_ids().any(|id| id == current)
    }
}

impl std::fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("label", &self.label)
            .field("workers", &self.workers.len())
            .field("closed", &self.tx.is_none())
            .finish()
    }
}

impl Drop for DispatchQueue {
    fn drop(&mut self) {
        // Workers exit once the closed channel is drained
        self.tx.take();

        // The last owner may be a job running on one of our own workers
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                error!(queue = %self.label, "Queue worker panicked");
            }
        }
        debug!(queue = %self.label, "DispatchQueue closed");
    }
}

/// Worker loop that takes jobs off the shared channel and runs them
fn queue_worker(label: String, rx: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>) {
    debug!(queue = %label, "Queue worker started");

    loop {
        let job = rx.lock().blocking_recv();
        let Some(job) = job else {
            break;
        };

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            // Continue processing - don't lose the worker on a single panic
            error!(queue = %label, "Queued job panicked");
        }
    }

    debug!(queue = %label, "Queue worker stopped");
}
