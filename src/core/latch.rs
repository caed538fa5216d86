//! One-shot countdown synchronization latch.

use std::sync::atomic::{AtomicIsize, Ordering};

use parking_lot::{Condvar, Mutex};

/// A one-use thread synchronization point.
///
/// The latch is initialized with a count. Each call to [`Latch::count_down`]
/// or [`Latch::count_down_and_wait`] decrements the count; once it reaches
/// zero the latch becomes ready, every waiting thread wakes, and the latch
/// stays ready forever (one-shot).
///
/// The decrement itself is a single atomic operation; the internal mutex is
/// touched only by threads that actually block and, briefly, by the
/// decrementer that makes the latch ready. Taking the mutex before the final
/// notification means a waiter that observed a positive count under the lock
/// cannot sleep through that notification.
///
/// # Example
///
/// ```rust
/// use taskpool::core::Latch;
///
/// let latch = Latch::new(2);
/// latch.count_down(1);
/// assert!(!latch.is_ready());
/// latch.count_down(1);
/// assert!(latch.is_ready());
/// latch.wait(); // returns immediately
/// ```
#[derive(Debug)]
pub struct Latch {
    /// Present count. The latch is ready once this is <= 0.
    count: AtomicIsize,
    /// Mutex paired with `ready`; guards no data of its own.
    lock: Mutex<()>,
    /// Notified when the count is decremented to zero.
    ready: Condvar,
}

impl Latch {
    /// Create a latch with the given initial count.
    ///
    /// A count of zero produces a latch that is immediately ready.
    #[must_use]
    pub fn new(count: isize) -> Self {
        debug_assert!(count >= 0, "latch created with negative count");
        Self {
            count: AtomicIsize::new(count),
            lock: Mutex::new(()),
            ready: Condvar::new(),
        }
    }

    /// Decrement the count by `n` and block until the latch is ready.
    ///
    /// The caller whose decrement brings the count to zero wakes all waiters
    /// and returns without blocking. `n` must not exceed the current count;
    /// this is a caller obligation checked only by a debug assertion.
    pub fn count_down_and_wait(&self, n: isize) {
        if self.decrement(n) <= 0 {
            self.release();
            return;
        }
        let mut guard = self.lock.lock();
        self.ready.wait_while(&mut guard, |_| !self.is_ready());
    }

    /// Decrement the count by `n` without blocking.
    ///
    /// `n` must not exceed the current count (debug assertion only).
    pub fn count_down(&self, n: isize) {
        if self.decrement(n) <= 0 {
            self.release();
        }
    }

    /// Non-blocking check whether the count has reached zero.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.count.load(Ordering::Acquire) <= 0
    }

    /// Block until the latch is ready; returns immediately if it already is.
    pub fn wait(&self) {
        if self.is_ready() {
            return;
        }
        let mut guard = self.lock.lock();
        self.ready.wait_while(&mut guard, |_| !self.is_ready());
    }

    /// Atomically subtract `n` from the count and return the new value.
    fn decrement(&self, n: isize) -> isize {
        let old = self.count.fetch_sub(n, Ordering::AcqRel);
        debug_assert!(n <= old, "latch decremented below zero");
        old - n
    }

    /// Wake all waiters. Acquiring the mutex first ensures no waiter is
    /// between its readiness check and its sleep when the notification fires.
    fn release(&self) {
        let _guard = self.lock.lock();
        self.ready.notify_all();
    }
}
