//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Values are not validated here; the cache and limiter constructors reject
/// unusable ones.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached range sums
    pub cache_capacity: usize,
    /// Length of the served array
    pub array_len: usize,
    /// Sliding window length in milliseconds
    pub window_ms: u64,
    /// Admissions allowed per entity per window
    pub max_events: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Idle-entity sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached ranges (default: 1000)
    /// - `ARRAY_LEN` - Array length (default: 100000)
    /// - `WINDOW_MS` - Sliding window in milliseconds (default: 10000)
    /// - `MAX_EVENTS` - Admissions per window (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: env_or("CACHE_CAPACITY", defaults.cache_capacity),
            array_len: env_or("ARRAY_LEN", defaults.array_len),
            window_ms: env_or("WINDOW_MS", defaults.window_ms),
            max_events: env_or("MAX_EVENTS", defaults.max_events),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }

    /// Sliding window as a `Duration`.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            array_len: 100_000,
            window_ms: 10_000,
            max_events: 1,
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.array_len, 100_000);
        assert_eq!(config.window_ms, 10_000);
        assert_eq!(config.max_events, 1);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 1);
        assert_eq!(config.window(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("ARRAY_LEN");
        env::remove_var("WINDOW_MS");
        env::remove_var("MAX_EVENTS");
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.array_len, 100_000);
        assert_eq!(config.window_ms, 10_000);
        assert_eq!(config.max_events, 1);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 1);
    }
}
