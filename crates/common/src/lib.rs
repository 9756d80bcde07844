//! PaperClub Common Library
//!
//! Shared code for the PaperClub engine:
//! - Configuration management
//! - Error taxonomy and status outcomes
//! - Store access (connection pool, schema bootstrap, entity models)
//! - Metrics and tracing setup

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, PaperView};
pub use errors::{AppError, ErrorCode, ErrorKind, Outcome, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of results a feed returns when the caller gives no limit
pub const DEFAULT_FEED_LIMIT: u64 = 10;

/// Maximum number of cohort members used for recommendations
pub const DEFAULT_COHORT_SIZE: u64 = 20;
