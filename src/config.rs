//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::TtlPolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database file
    pub database_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for single-product cache entries
    pub item_ttl: u64,
    /// TTL in seconds for the product listing cache entry
    pub list_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Apply pending migrations before serving
    pub migrate_on_startup: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_PATH` - SQLite file (default: products.db)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ITEM_TTL` - Product entry TTL in seconds (default: 1800)
    /// - `LIST_TTL` - Listing entry TTL in seconds (default: 900)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `MIGRATE_ON_STARTUP` - Run pending migrations at boot (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            item_ttl: parse_var("ITEM_TTL").unwrap_or(defaults.item_ttl),
            list_ttl: parse_var("LIST_TTL").unwrap_or(defaults.list_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            migrate_on_startup: parse_var("MIGRATE_ON_STARTUP")
                .unwrap_or(defaults.migrate_on_startup),
        }
    }

    /// TTLs for item and listing entries.
    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy::new(
            Duration::from_secs(self.item_ttl),
            Duration::from_secs(self.list_ttl),
        )
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("products.db"),
            server_port: 3000,
            item_ttl: 1800,
            list_ttl: 900,
            cleanup_interval: 60,
            migrate_on_startup: true,
        }
    }
}
