//! Database layer for PaperClub
//!
//! Provides:
//! - SeaORM entity models for the five tables
//! - Row types returned by ranking queries
//! - Schema bootstrap for PostgreSQL and SQLite
//! - Connection pool management

pub mod models;
pub mod schema;
mod views;

pub use views::{CohortMember, PaperView, TagCount, TagPair, UserActivity, UserSummary};

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend};
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    /// Primary connection (for writes)
    pub primary: DatabaseConnection,

    /// Read replica connection (optional)
    pub replica: Option<DatabaseConnection>,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to primary database...");

        let primary = Self::connect(&config.url, config)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect to primary: {}", e),
            })?;

        // Connect to replica if configured
        let replica = if let Some(ref read_url) = config.read_url {
            info!("Connecting to read replica...");

            let replica_conn = Self::connect(read_url, config)
                .await
                .map_err(|e| AppError::DatabaseConnection {
                    message: format!("Failed to connect to replica: {}", e),
                })?;

            Some(replica_conn)
        } else {
            None
        };

        info!(backend = ?primary.get_database_backend(), "Database connections established");

        Ok(Self { primary, replica })
    }

    /// Wrap a connection the caller already manages
    pub fn from_connection(primary: DatabaseConnection) -> Self {
        Self { primary, replica: None }
    }

    async fn connect(
        url: &str,
        config: &DatabaseConfig,
    ) -> std::result::Result<DatabaseConnection, sea_orm::DbErr> {
        let mut opts = ConnectOptions::new(url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .sqlx_logging(config.statement_logging);

        Database::connect(opts).await
    }

    /// Get the connection for reads (replica if available, otherwise primary)
    pub fn read(&self) -> &DatabaseConnection {
        self.replica.as_ref().unwrap_or(&self.primary)
    }

    /// Get the connection for writes (always primary)
    pub fn write(&self) -> &DatabaseConnection {
        &self.primary
    }

    /// Backend of the primary store
    pub fn backend(&self) -> DbBackend {
        self.primary.get_database_backend()
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.primary
            .execute_unprepared("SELECT 1")
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Primary ping failed: {}", e),
            })?;

        if let Some(ref replica) = self.replica {
            replica
                .execute_unprepared("SELECT 1")
                .await
                .map_err(|e| AppError::DatabaseConnection {
                    message: format!("Replica ping failed: {}", e),
                })?;
        }

        Ok(())
    }
}

/// Current time at the precision the store keeps (microseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
