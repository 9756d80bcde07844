//! Configuration management for PaperClub
//!
//! Supports loading configuration from:
//! - A `.env` file (via dotenvy)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Environment variables (prefixed with APP__)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Feed and ranking configuration
    #[serde(default)]
    pub feed: FeedConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Primary database URL (for writes), e.g. `postgres://...` or `sqlite::memory:`
    pub url: String,

    /// Read replica URL (optional, falls back to primary)
    pub read_url: Option<String>,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Log every statement through sqlx
    #[serde(default)]
    pub statement_logging: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Result size used when the caller does not pass a limit
    #[serde(default = "default_feed_limit")]
    pub default_limit: u64,

    /// Upper bound applied to every requested limit
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,

    /// Number of similar users consulted by the recommender
    #[serde(default = "default_cohort_size")]
    pub cohort_size: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error), overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name attached to log lines
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_max_connections() -> u32 { 50 }
fn default_min_connections() -> u32 { 5 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_feed_limit() -> u64 { crate::DEFAULT_FEED_LIMIT }
fn default_max_limit() -> u64 { 1000 }
fn default_cohort_size() -> u64 { crate::DEFAULT_COHORT_SIZE }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "paperclub".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("database.url", "postgres://localhost/paperclub")?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // e.g., APP__DATABASE__URL=postgres://db/paperclub
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific config file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory SQLite store.
    ///
    /// Every connection to `sqlite::memory:` opens a fresh database, so the pool
    /// is pinned to a single connection.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            read_url: None,
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            statement_logging: false,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl FeedConfig {
    /// Resolve a caller-supplied limit against the defaults and the upper bound
    pub fn resolve_limit(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_feed_limit(),
            max_limit: default_max_limit(),
            cohort_size: default_cohort_size(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/paperclub".to_string(),
                read_url: None,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
                statement_logging: false,
            },
            feed: FeedConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}
