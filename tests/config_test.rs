//! Tests for configuration validation and pool construction.

use std::collections::HashMap;

use taskpool::builders::{build_pool, build_pools};
use taskpool::config::{PoolConfig, SchedulerConfig};
use taskpool::core::PoolError;

#[test]
fn test_pool_config_validation() {
    let valid = PoolConfig {
        workers: 4,
        worker_stack_size: Some(256 * 1024),
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_stack_size() {
    let invalid = PoolConfig {
        workers: 4,
        worker_stack_size: Some(0),
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_empty_pools() {
    let config = SchedulerConfig {
        pools: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "pools": {
            "simulation": {
                "workers": 2
            },
            "io": {
                "workers": 1,
                "worker_stack_size": 131072
            }
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.pools.len(), 2);
    assert_eq!(config.pools["simulation"].workers, 2);
    assert_eq!(config.pools["io"].worker_stack_size, Some(131_072));
}

#[test]
fn test_scheduler_config_json_rejects_invalid_pool() {
    let json = r#"{
        "pools": {
            "bad": {
                "workers": 1,
                "worker_stack_size": 0
            }
        }
    }"#;
    assert!(SchedulerConfig::from_json_str(json).is_err());
}

#[test]
fn test_config_json_round_trip() {
    let mut pools = HashMap::new();
    pools.insert(
        "sim".to_string(),
        PoolConfig {
            workers: 3,
            worker_stack_size: None,
        },
    );
    let config = SchedulerConfig { pools };

    let json = serde_json::to_string(&config).unwrap();
    let parsed = SchedulerConfig::from_json_str(&json).unwrap();
    assert_eq!(parsed.pools["sim"].workers, 3);
    assert_eq!(parsed.pools["sim"].worker_stack_size, None);
}

#[test]
fn test_build_pool_from_config() {
    let cfg = PoolConfig {
        workers: 2,
        worker_stack_size: None,
    };
    let pool = build_pool("built", &cfg).unwrap();
    assert_eq!(pool.size(), 2);
}

#[test]
fn test_build_pool_rejects_invalid_config() {
    let cfg = PoolConfig {
        workers: 2,
        worker_stack_size: Some(0),
    };
    assert!(matches!(
        build_pool("broken", &cfg),
        Err(PoolError::InvalidConfig(_))
    ));
}

#[test]
fn test_build_pools_by_name() {
    let json = r#"{
        "pools": {
            "alpha": { "workers": 1 },
            "beta": { "workers": 2 }
        }
    }"#;
    let config = SchedulerConfig::from_json_str(json).unwrap();
    let pools = build_pools(&config).unwrap();

    assert_eq!(pools.len(), 2);
    assert_eq!(pools["alpha"].size(), 1);
    assert_eq!(pools["beta"].size(), 2);

    // Built pools are live: they execute submitted work.
    let (tx, rx) = crossbeam_channel::unbounded();
    pools["beta"].submit(move || tx.send(()).unwrap()).unwrap();
    rx.recv_timeout(std::time::Duration::from_secs(2)).unwrap();
}
