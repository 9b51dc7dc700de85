//! CountdownLatch - counting barrier with bounded wait

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counting barrier: waiters block until the count reaches zero.
///
/// Used for synchronous sends (count 1) and the flush barrier (one count per
/// submitted flush unit).
#[derive(Debug)]
pub struct CountdownLatch {
    count: Mutex<usize>,
    zero: Condvar,
}

impl CountdownLatch {
    /// Create a latch expecting `count` arrivals
    pub fn new(count: usize) -> Self {
        Self {
            count: Mutex::new(count),
            zero: Condvar::new(),
        }
    }

    /// Outstanding arrivals
    pub fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Record one arrival; extra arrivals past zero are ignored
    pub fn count_down(&self) {
        let mut count = self.count.lock();
        if *count > 0 {
            *count -= 1;
            if *count == 0 {
                self.zero.notify_all();
            }
        }
    }

    /// Guard that counts down when dropped, whether or not its job ran
    pub fn guard(self: &Arc<Self>) -> LatchGuard {
        LatchGuard {
            latch: Arc::clone(self),
        }
    }

    /// Block until the count reaches zero
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.zero.wait(&mut count);
        }
    }

    /// Block until the count reaches zero or `timeout` elapses.
    ///
    /// Returns true iff the count reached zero in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };

        let mut count = self.count.lock();
        while *count > 0 {
            if self.zero.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }
}

/// Counts its latch down on drop
#[derive(Debug)]
pub struct LatchGuard {
    latch: Arc<CountdownLatch>,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.latch.count_down();
    }
}
