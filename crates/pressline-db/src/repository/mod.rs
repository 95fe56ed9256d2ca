//! # Repository Module
//!
//! Database repository implementations for Pressline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Counter screen                                                        │
//! │       │                                                                 │
//! │       │  db.orders().create_order(&draft, Some(&totals), tolerance)    │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create_order(&self, draft, submitted, tolerance)                  │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── get_items(&self, order_id)                                        │
//! │  └── update_status(&self, id, next)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives here and only here; pricing lives in pressline-core.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ServiceRepository`](service::ServiceRepository) - Service catalog
//! - [`OrderRepository`](order::OrderRepository) - Orders, lines, status
//! - [`PaymentRepository`](payment::PaymentRepository) - Payments and takings

pub mod order;
pub mod payment;
pub mod service;

use pressline_core::{CoreError, Money, ValidationError};

use crate::error::DbResult;

/// Rounds `amount` to the INTEGER cents stored in a `*_cents` column.
///
/// ## Errors
/// `DbError::Core(InvalidInput(TooLarge))` when the cents do not fit in an i64.
pub(crate) fn stored_cents(field: &str, amount: Money) -> DbResult<i64> {
    amount.checked_to_cents().ok_or_else(|| {
        CoreError::InvalidInput(ValidationError::TooLarge {
            field: field.to_string(),
        })
        .into()
    })
}
