//! Configuration Module
//!
//! Handles loading the demo configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Demo configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Number of operations the synthetic workload performs
    pub workload_operations: usize,
    /// Number of distinct keys the synthetic workload draws from
    pub workload_key_space: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unparseable values fall back to the default.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `WORKLOAD_OPERATIONS` - Workload length (default: 10000)
    /// - `WORKLOAD_KEY_SPACE` - Distinct workload keys (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            workload_operations: env_or("WORKLOAD_OPERATIONS", defaults.workload_operations),
            workload_key_space: env_or("WORKLOAD_KEY_SPACE", defaults.workload_key_space),
        }
    }

    // == Validate ==
    /// Checks that the configuration describes a usable cache and workload.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        if self.workload_key_space == 0 {
            return Err(CacheError::InvalidConfig(
                "WORKLOAD_KEY_SPACE must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            workload_operations: 10_000,
            workload_key_space: 2000,
        }
    }
}

fn env_or(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.workload_operations, 10_000);
        assert_eq!(config.workload_key_space, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("WORKLOAD_OPERATIONS");
        env::remove_var("WORKLOAD_KEY_SPACE");

        assert_eq!(Config::from_env(), Config::default());
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let config = Config {
            capacity: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(CacheError::InvalidCapacity(0)));
    }

    #[test]
    fn test_config_rejects_empty_key_space() {
        let config = Config {
            workload_key_space: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
