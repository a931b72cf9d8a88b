//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::Ttl;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL for writes that do not give one (0 = never expire)
    pub default_ttl: Ttl,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between purges of expired transients
    pub purge_interval: u64,
    /// Serve pools that suppress store errors
    pub silent_pools: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Seconds or ISO-8601 duration such as `P1D` (default: 0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PURGE_INTERVAL` - Purge frequency in seconds (default: 60)
    /// - `SILENT_POOLS` - `true` or `1` to suppress store errors (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            purge_interval: env::var("PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval),
            silent_pools: env::var("SILENT_POOLS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.silent_pools),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: Ttl::Seconds(0),
            server_port: 3000,
            purge_interval: 60,
            silent_pools: false,
        }
    }
}
