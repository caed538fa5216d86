//! Worker thread driving the shared work queue.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use super::pool::{PendingWork, PoolCounters, Work};
use super::queue::ConcurrentQueue;

/// One logical thread of a pool.
///
/// A worker repeatedly pulls work from the shared queue until its stop flag
/// is set. It holds only a reference-counted handle to the queue, never a
/// back-pointer to the owning pool.
pub(crate) struct WorkerThread {
    /// Thread name, also used in log events.
    name: String,
    /// Stop flag checked by the run loop's cancellation predicate.
    stop: Arc<AtomicBool>,
    /// Shared work queue, woken when the stop flag is raised.
    queue: Arc<ConcurrentQueue<Work>>,
    /// Join handle, taken exactly once by `stop`.
    handle: Option<JoinHandle<()>>,
}

impl WorkerThread {
    /// Start a named OS thread running the dequeue-execute loop.
    pub(crate) fn spawn(
        name: String,
        queue: Arc<ConcurrentQueue<Work>>,
        pending: Arc<PendingWork>,
        counters: Arc<PoolCounters>,
        stack_size: Option<usize>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let mut builder = thread::Builder::new().name(name.clone());
        if let Some(bytes) = stack_size {
            builder = builder.stack_size(bytes);
        }
        let handle = {
            let stop = Arc::clone(&stop);
            let queue = Arc::clone(&queue);
            let thread_name = name.clone();
            builder
                .spawn(move || run(&thread_name, &stop, &queue, &pending, &counters))
                .expect("Failed to spawn worker thread")
        };
        Self {
            name,
            stop,
            queue,
            handle: Some(handle),
        }
    }

    /// Signal the thread to stop and wake the queue's consumers; returns
    /// without waiting for the thread to exit.
    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        self.queue.wake();
    }

    /// Request stop and block until the underlying thread has terminated.
    pub(crate) fn stop(&mut self) {
        self.request_stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(worker = %self.name, "worker thread terminated abnormally");
            }
        }
    }
}

impl Drop for WorkerThread {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Process work items until the stop flag is raised.
///
/// Panics escaping a work item are caught here, logged, and counted; a
/// panicking item never takes the worker down with it.
fn run(
    name: &str,
    stop: &AtomicBool,
    queue: &ConcurrentQueue<Work>,
    pending: &PendingWork,
    counters: &PoolCounters,
) {
    debug!(worker = %name, "worker thread started");
    while !stop.load(Ordering::Acquire) {
        // A `None` here means we were woken to re-check the stop flag.
        let Some(work) = queue.dequeue_until(|| stop.load(Ordering::Acquire)) else {
            continue;
        };
        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(()) => {
                counters.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(payload) => {
                counters.panicked.fetch_add(1, Ordering::Relaxed);
                error!(
                    worker = %name,
                    panic = panic_message(payload.as_ref()),
                    "work item panicked"
                );
            }
        }
        pending.finish();
    }
    debug!(worker = %name, "worker thread exiting");
}

/// Best-effort extraction of a printable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
