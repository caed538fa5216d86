//! Configuration models for pools and worker counts.

pub mod pool;

pub use pool::{PoolConfig, SchedulerConfig};
