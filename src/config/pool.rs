//! Pool and scheduler configuration structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration for one thread pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads. Zero is allowed: the pool queues work until
    /// it is resized up. Defaults to one worker per CPU core.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Optional stack size for worker threads, in bytes.
    #[serde(default)]
    pub worker_stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            worker_stack_size: None,
        }
    }
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Root scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of pool name to configuration.
    pub pools: HashMap<String, PoolConfig>,
}

impl PoolConfig {
    /// Validate pool configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(stack) = self.worker_stack_size {
            if stack == 0 {
                return Err("worker_stack_size must be greater than 0".into());
            }
        }
        Ok(())
    }
}

impl SchedulerConfig {
    /// Validate all pools and ensure at least one pool exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.pools.is_empty() {
            return Err("at least one pool must be defined".into());
        }
        for (name, pool) in &self.pools {
            pool.validate()
                .map_err(|e| format!("pool `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
