//! # pressline-db: Database Layer for Pressline
//!
//! This crate provides database access for Pressline.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pressline Data Flow                              │
//! │                                                                         │
//! │  Counter: "2 shirts, 1 suit, 10% off the shirts"                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pressline-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ServiceRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo ────┼──► pressline-core │  │   │
//! │  │   │ Connection    │    │ PaymentRepo   │    │  pricing     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   $PRESSLINE_DB_PATH (default ./pressline.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - Environment-driven application configuration
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (service, order, payment)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pressline_db::{AppConfig, Database};
//!
//! let config = AppConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let order = db
//!     .orders()
//!     .create_order(&draft, Some(&submitted_totals), config.shop.totals_tolerance)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::payment::{PaymentRepository, Takings};
pub use repository::service::ServiceRepository;
