//! Builders to construct thread pools from configuration.

use std::collections::HashMap;

use crate::config::{PoolConfig, SchedulerConfig};
use crate::core::{PoolError, ThreadPool};

/// Build a single thread pool from a validated configuration.
///
/// # Errors
///
/// Returns [`PoolError::InvalidConfig`] if the configuration fails
/// validation.
pub fn build_pool(name: &str, cfg: &PoolConfig) -> Result<ThreadPool, PoolError> {
    cfg.validate().map_err(PoolError::InvalidConfig)?;
    let pool = match cfg.worker_stack_size {
        Some(stack) => ThreadPool::with_stack_size(name, cfg.workers, stack),
        None => ThreadPool::new(name, cfg.workers),
    };
    Ok(pool)
}

/// Build every pool named in the scheduler configuration.
///
/// # Errors
///
/// Returns [`PoolError::InvalidConfig`] if the configuration fails
/// validation.
pub fn build_pools(cfg: &SchedulerConfig) -> Result<HashMap<String, ThreadPool>, PoolError> {
    cfg.validate()
        .map_err(|e| PoolError::InvalidConfig(format!("config invalid: {e}")))?;

    let mut pools = HashMap::new();
    for (name, pool_cfg) in &cfg.pools {
        pools.insert(name.clone(), build_pool(name, pool_cfg)?);
    }
    Ok(pools)
}
