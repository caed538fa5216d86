//! # Taskpool
//!
//! A thread-pool task scheduler with a one-shot countdown latch and a
//! thread-safe work queue.
//!
//! This library provides the concurrency core for applications that need to
//! fan work out from arbitrary producer threads across a dynamically
//! resizable pool of dedicated OS worker threads, with ordered, at-most-once
//! execution per submitted item and graceful or forced shutdown.
//!
//! ## Core Problem Solved
//!
//! Long-lived services accumulate deferred work from many threads at once:
//!
//! - **Cross-thread submission**: any thread may hand off a closure without
//!   coordinating with the threads that will run it
//! - **Elastic capacity**: the worker count can grow or shrink at runtime
//!   without dropping or duplicating queued work
//! - **Cooperative cancellation**: workers cannot be preempted mid-task, so
//!   stopping them requires a flag plus an explicit wake of blocked consumers
//! - **Clean teardown**: shutdown must drain pending work, wait for in-flight
//!   executions, and join every thread
//!
//! ## Key Features
//!
//! - **`ConcurrentQueue<T>`**: FIFO queue with blocking and non-blocking
//!   dequeue, predicate-based early wake, conditional removal, and
//!   duplicate-combining insertion
//! - **`Latch`**: one-shot countdown barrier with a lock-free decrement path
//! - **`ThreadPool`**: resizable pool of named worker threads sharing one
//!   work queue; per-task panic isolation keeps workers alive
//! - **Drain-aware shutdown**: `wait_idle` waits for queued *and* in-flight
//!   work, closing the gap left by queue-emptiness checks alone
//!
//! ## ThreadPool - Submitting Work
//!
//! ```rust
//! use taskpool::core::ThreadPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = ThreadPool::new("sim", 4);
//! let done = Arc::new(AtomicUsize::new(0));
//!
//! for _ in 0..16 {
//!     let done = Arc::clone(&done);
//!     pool.submit(move || {
//!         done.fetch_add(1, Ordering::Relaxed);
//!     }).unwrap();
//! }
//!
//! pool.wait_idle();
//! assert_eq!(done.load(Ordering::Relaxed), 16);
//! ```
//!
//! ## Latch - One-Shot Synchronization
//!
//! ```rust
//! use taskpool::core::Latch;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let latch = Arc::new(Latch::new(3));
//! let handles: Vec<_> = (0..3)
//!     .map(|_| {
//!         let latch = Arc::clone(&latch);
//!         thread::spawn(move || latch.count_down_and_wait(1))
//!     })
//!     .collect();
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert!(latch.is_ready());
//! ```
//!
//! For complete examples, see:
//! - `tests/thread_pool_test.rs` - Full pool integration tests
//! - `tests/queue_test.rs` - Cross-thread queue scenarios

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling primitives: latch, queue, worker pool.
pub mod core;
/// Configuration models for pools and worker counts.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;
