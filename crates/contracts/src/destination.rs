//! Destination trait - Dispatcher output interface
//!
//! Defines the abstract interface for log destinations and their execution queues.

use crate::{ContractError, Level, LogRecord};

/// Unit of work submitted to an [`ExecutionQueue`]
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Execution queue owned by a destination.
///
/// Serial queues run one job at a time in submission order; concurrent queues
/// run jobs on a worker pool. The dispatcher does not care which.
pub trait ExecutionQueue: Send + Sync {
    /// Queue label (used for thread names and diagnostics)
    fn label(&self) -> &str;

    /// Enqueue a job without waiting for it.
    ///
    /// Returns false when the queue no longer accepts work; the job is
    /// dropped without running in that case.
    fn submit(&self, job: Job) -> bool;

    /// Whether the calling thread is one of this queue's workers
    fn is_current(&self) -> bool {
        false
    }
}

/// Log output trait
///
/// All destination implementations must implement this trait. Two
/// destinations are the same destination iff their [`id`](Destination::id)
/// matches.
pub trait Destination: Send + Sync + 'static {
    /// Stable identity (used for deduplication, logging and metrics)
    fn id(&self) -> &str;

    /// Minimum accepted level
    fn min_level(&self) -> Level;

    /// Execution queue; `None` disables the destination without removing it
    fn queue(&self) -> Option<&dyn ExecutionQueue>;

    /// Whether sends are fire-and-forget (true) or block the caller (false)
    fn is_async(&self) -> bool {
        true
    }

    /// Accept decision for one call site.
    ///
    /// The default compares against [`min_level`](Destination::min_level)
    /// only; destinations may veto further based on path or function.
    fn should_accept(&self, level: Level, _path: &str, _function: &str) -> bool {
        level >= self.min_level()
    }

    /// Deliver one record
    ///
    /// # Errors
    /// Returns write error (should include context); the dispatcher records
    /// it and moves on.
    fn send(&self, record: &LogRecord) -> Result<(), ContractError>;

    /// Block until buffered output is written
    fn flush(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Threshold(Level);

    impl Destination for Threshold {
        fn id(&self) -> &str {
            "threshold"
        }

        fn min_level(&self) -> Level {
            self.0
        }

        fn queue(&self) -> Option<&dyn ExecutionQueue> {
            None
        }

        fn send(&self, _record: &LogRecord) -> Result<(), ContractError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_should_accept_compares_level() {
        let dest = Threshold(Level::Warning);
        assert!(!dest.should_accept(Level::Verbose, "a.rs", "f"));
        assert!(!dest.should_accept(Level::Debug, "a.rs", "f"));
        assert!(!dest.should_accept(Level::Info, "a.rs", "f"));
        assert!(dest.should_accept(Level::Warning, "a.rs", "f"));
        assert!(dest.should_accept(Level::Error, "a.rs", "f"));
    }

    #[test]
    fn test_defaults_are_async_and_flush_ok() {
        let dest = Threshold(Level::Info);
        assert!(dest.is_async());
        assert!(dest.flush().is_ok());
    }
}
