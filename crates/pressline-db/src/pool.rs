//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.services() / db.orders() / db.payments()                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases run in WAL (Write-Ahead Logging) mode: readers don't
//! block the counter while an order is being written. In-memory databases
//! (tests) keep SQLite's default journal and a single connection that
//! never expires, since the data lives only as long as that connection.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::OrderRepository;
use crate::repository::payment::PaymentRepository;
use crate::repository::service::ServiceRepository;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/pressline.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (plenty for a shop counter and a back office)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Returns true when this config points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                .foreign_keys(true);
            return Ok(options);
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            // WAL mode: readers don't block writers, writers don't block readers
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose the last
            // transaction on power loss
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has foreign keys disabled by default
            .foreign_keys(true)
            // Writers queue on the database lock for up to this long
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: it holds the pool, and every repository it hands out
/// holds a clone of the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL, NORMAL synchronous, foreign keys on)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;

        debug!(in_memory = config.is_in_memory(), "Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);

        pool_options = if config.is_in_memory() {
            // Dropping the only connection would drop the database with it.
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Idempotent: already-applied migrations are skipped. Called by
    /// [`Database::new`] unless `run_migrations` is false.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the service catalog repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let shirts = db.services().search_by_name("shirt", 20).await?;
    /// ```
    pub fn services(&self) -> ServiceRepository {
        ServiceRepository::new(self.pool.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the payment repository.
    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
