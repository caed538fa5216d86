//! Resizable thread pool executing submitted closures from a shared queue.
//!
//! Producers call [`ThreadPool::submit`] from any thread; an idle worker
//! dequeues the closure and runs it. The pool can be resized at runtime:
//! growing spawns new named workers, shrinking signals the excess workers to
//! stop and joins them. Teardown closes the pool for submission, drains the
//! queue, waits for in-flight executions, and joins every thread.
//!
//! # Example
//!
//! ```rust
//! use taskpool::core::ThreadPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = ThreadPool::new("workers", 2);
//! let hits = Arc::new(AtomicUsize::new(0));
//! let h = Arc::clone(&hits);
//! pool.submit(move || { h.fetch_add(1, Ordering::Relaxed); }).unwrap();
//! pool.wait_idle();
//! assert_eq!(hits.load(Ordering::Relaxed), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use super::error::PoolError;
use super::queue::ConcurrentQueue;
use super::worker::WorkerThread;

/// A unit of deferred execution submitted to a pool.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Pool statistics counters (lock-free atomics).
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    /// Work items accepted by `submit`.
    pub submitted: AtomicU64,
    /// Work items that ran to completion.
    pub completed: AtomicU64,
    /// Work items that panicked during execution.
    pub panicked: AtomicU64,
}

/// Admission gate and gauge of accepted work items not yet finished.
///
/// Acceptance is atomic: the closed check, the gauge increment, and the
/// enqueue all happen under one lock, so once `close` returns every
/// accepted item is both counted and queued. The count is decremented when
/// an item finishes executing (panics included) or is discarded during
/// teardown; `wait_idle` blocks on it reaching zero, which covers both
/// queued and in-flight work.
#[derive(Debug, Default)]
pub(crate) struct PendingWork {
    /// Admission state: pending count plus the closed flag.
    state: Mutex<AdmissionState>,
    /// Signalled when the pending count drops to zero.
    idle: Condvar,
}

#[derive(Debug, Default)]
struct AdmissionState {
    /// Accepted-but-unfinished item count.
    pending: usize,
    /// Once set, `admit` rejects new work.
    closed: bool,
}

impl PendingWork {
    /// Count one item and run `enqueue` under the admission lock, unless
    /// the gate is closed. Returns whether the item was accepted.
    fn admit(&self, enqueue: impl FnOnce()) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.pending += 1;
        enqueue();
        true
    }

    /// Close the gate for new admissions; already-accepted work is
    /// unaffected. Idempotent.
    fn close(&self) {
        self.state.lock().closed = true;
    }

    /// Record one finished or discarded item, waking idle-waiters at zero.
    pub(crate) fn finish(&self) {
        let mut state = self.state.lock();
        state.pending -= 1;
        if state.pending == 0 {
            self.idle.notify_all();
        }
    }

    /// Block until the pending count reaches zero.
    fn wait_idle(&self) {
        let mut state = self.state.lock();
        self.idle.wait_while(&mut state, |state| state.pending != 0);
    }

    /// Instantaneous pending count.
    fn current(&self) -> usize {
        self.state.lock().pending
    }
}

/// Snapshot of pool utilization and lifetime counters.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Current number of worker threads.
    pub workers: usize,
    /// Work items currently waiting in the queue.
    pub queued: usize,
    /// Accepted work items not yet finished executing (queued + in-flight).
    pub pending: usize,
    /// Total work items accepted by `submit`.
    pub submitted: u64,
    /// Total work items that ran to completion.
    pub completed: u64,
    /// Total work items that panicked during execution.
    pub panicked: u64,
}

/// A task scheduler with a dynamically sized pool of worker threads.
///
/// All workers share one [`ConcurrentQueue`] of boxed closures. Work items
/// are executed in enqueue order, each by exactly one worker; no guarantee
/// is made about *which* worker runs which item. Cancellation is cooperative:
/// a worker cannot be preempted mid-task, so shrinking the pool can block
/// for as long as the currently executing items take to finish.
///
/// The queue's mutex and the thread-list mutex are never held together by
/// one operation, so submissions and dequeues proceed independently of
/// resizing.
///
/// Dropping the pool runs [`ThreadPool::shutdown`].
pub struct ThreadPool {
    /// Name of the pool. Used to name worker threads.
    name: String,
    /// The threads in the pool, guarded by their own mutex (not the queue's).
    threads: Mutex<Vec<WorkerThread>>,
    /// The queue of work items waiting to be executed.
    shared: Arc<ConcurrentQueue<Work>>,
    /// Admission gate and gauge of accepted-but-unfinished work.
    pending: Arc<PendingWork>,
    /// Lifetime statistics counters.
    counters: Arc<PoolCounters>,
    /// Optional stack size for spawned worker threads, in bytes.
    stack_size: Option<usize>,
}

impl ThreadPool {
    /// Create a pool with `initial_size` worker threads.
    ///
    /// A pool with zero threads still accepts submissions; queued items run
    /// once the pool is resized up.
    #[must_use]
    pub fn new(name: impl Into<String>, initial_size: usize) -> Self {
        Self::build(name.into(), initial_size, None)
    }

    /// Create a pool whose worker threads use the given stack size in bytes.
    #[must_use]
    pub fn with_stack_size(name: impl Into<String>, initial_size: usize, stack_size: usize) -> Self {
        Self::build(name.into(), initial_size, Some(stack_size))
    }

    fn build(name: String, initial_size: usize, stack_size: Option<usize>) -> Self {
        let pool = Self {
            name,
            threads: Mutex::new(Vec::new()),
            shared: Arc::new(ConcurrentQueue::new()),
            pending: Arc::new(PendingWork::default()),
            counters: Arc::new(PoolCounters::default()),
            stack_size,
        };
        pool.resize(initial_size);
        info!(pool = %pool.name, workers = initial_size, "thread pool created");
        pool
    }

    /// Submit a closure to be executed by the pool.
    ///
    /// The queue is unbounded, so acceptance never blocks on consumers.
    /// Acceptance is atomic with respect to [`ThreadPool::close`]: an item
    /// accepted here is already queued and counted by the time a concurrent
    /// `close` returns, so teardown cannot strand it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] once [`ThreadPool::close`] or
    /// [`ThreadPool::shutdown`] has been called.
    pub fn submit<F>(&self, work: F) -> Result<(), PoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        let accepted = self.pending.admit(|| self.shared.enqueue(Box::new(work)));
        if !accepted {
            return Err(PoolError::Closed(self.name.clone()));
        }
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Block until all remaining work items have been assigned to a thread.
    ///
    /// This only waits for queue emptiness: an item that has been dequeued
    /// but is still executing does not hold this call back. Use
    /// [`ThreadPool::wait_idle`] to also wait for in-flight executions.
    pub fn wait_for_finish(&self) {
        self.shared.block_until_empty();
    }

    /// Block until the queue is empty and no dequeued item is still
    /// executing.
    pub fn wait_idle(&self) {
        self.pending.wait_idle();
    }

    /// Alter the size of the pool, spawning or joining threads as necessary.
    ///
    /// Shrinking signals every excess worker to stop before joining any of
    /// them, so they wind down in parallel. The workers removed are those
    /// with the highest indices, not necessarily the least busy ones.
    /// Concurrent calls are serialized by the thread-list mutex, which is
    /// independent of the work queue.
    pub fn resize(&self, new_size: usize) {
        let mut threads = self.threads.lock();
        let cur_size = threads.len();
        if new_size < cur_size {
            debug!(pool = %self.name, from = cur_size, to = new_size, "shrinking pool");
            for worker in &threads[new_size..] {
                worker.request_stop();
            }
            // Dropping the handles joins each thread.
            threads.truncate(new_size);
        } else if new_size > cur_size {
            debug!(pool = %self.name, from = cur_size, to = new_size, "growing pool");
            threads.reserve(new_size - cur_size);
            for i in cur_size..new_size {
                threads.push(WorkerThread::spawn(
                    format!("{}:{i}", self.name),
                    Arc::clone(&self.shared),
                    Arc::clone(&self.pending),
                    Arc::clone(&self.counters),
                    self.stack_size,
                ));
            }
        }
    }

    /// Block until all threads have been stopped and joined.
    pub fn join_all(&self) {
        self.resize(0);
    }

    /// Current number of threads in the pool.
    #[must_use]
    pub fn size(&self) -> usize {
        self.threads.lock().len()
    }

    /// Whether there are no threads in the pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Mark the pool closed for submission. Idempotent, non-blocking;
    /// already-accepted work still runs. Once this returns, every accepted
    /// item is already queued or executing.
    pub fn close(&self) {
        self.pending.close();
    }

    /// Gracefully tear the pool down: close it, drain accepted work, then
    /// stop and join all threads.
    ///
    /// A pool with zero workers cannot drain its queue, so in that case the
    /// queued items are discarded with a warning instead of blocking
    /// forever.
    pub fn shutdown(&self) {
        self.close();
        if self.size() == 0 {
            let discarded = self.shared.clear_with(|_| self.pending.finish());
            if discarded > 0 {
                warn!(
                    pool = %self.name,
                    discarded,
                    "discarding queued work: pool has no workers to drain it"
                );
            }
        }
        self.wait_idle();
        self.join_all();
        info!(pool = %self.name, "thread pool shut down");
    }

    /// Snapshot of the pool's counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.size(),
            queued: self.shared.len(),
            pending: self.pending.current(),
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            panicked: self.counters.panicked.load(Ordering::Relaxed),
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_submit_and_wait_idle() {
        let pool = ThreadPool::new("unit", 2);
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let hits = Arc::clone(&hits);
            pool.submit(move || {
                hits.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
        }
        pool.wait_idle();
        assert_eq!(hits.load(Ordering::Relaxed), 8);

        let stats = pool.stats();
        assert_eq!(stats.submitted, 8);
        assert_eq!(stats.completed, 8);
        assert_eq!(stats.panicked, 0);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_empty_pool_reports_empty() {
        let pool = ThreadPool::new("unit", 0);
        assert!(pool.is_empty());
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn test_submit_after_close_is_rejected() {
        let pool = ThreadPool::new("unit", 1);
        pool.close();
        let err = pool.submit(|| {}).unwrap_err();
        assert!(matches!(err, PoolError::Closed(name) if name == "unit"));
    }

    #[test]
    fn test_pending_work_gauge() {
        let pending = PendingWork::default();
        assert!(pending.admit(|| {}));
        assert!(pending.admit(|| {}));
        assert_eq!(pending.current(), 2);
        pending.finish();
        pending.finish();
        assert_eq!(pending.current(), 0);
        pending.wait_idle();
    }

    #[test]
    fn test_admission_gate_rejects_after_close() {
        let pending = PendingWork::default();
        assert!(pending.admit(|| {}));
        pending.close();

        let mut enqueued = false;
        assert!(!pending.admit(|| enqueued = true));
        assert!(!enqueued, "rejected admission must not enqueue");
        assert_eq!(pending.current(), 1);
        pending.finish();
    }
}
