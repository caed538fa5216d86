//! Core scheduling primitives: latch, queue, worker pool.

pub mod error;
pub mod latch;
pub mod pool;
pub mod queue;

mod worker;

pub use error::{AppResult, PoolError};
pub use latch::Latch;
pub use pool::{PoolStats, ThreadPool, Work};
pub use queue::ConcurrentQueue;
