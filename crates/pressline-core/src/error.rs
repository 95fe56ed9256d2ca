//! # Error Types
//!
//! Domain-specific error types for pressline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pressline-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Out-of-domain input values                     │
//! │                                                                         │
//! │  pressline-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller form error       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing never clamps a bad input into range. A negative price or a
//! 120% discount is rejected as [`CoreError::InvalidInput`] so the
//! data-entry bug surfaces at the counter instead of as a wrong total.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A supplied field is outside its documented domain.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// An order was submitted with no line items.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// Totals submitted by the caller disagree with the recomputed totals.
    ///
    /// ## When This Occurs
    /// ```text
    /// Counter computes grand total: $75.00
    ///      │
    ///      ▼
    /// Database transaction recomputes: $74.50
    ///      │
    ///      ▼
    /// TotalsMismatch { field: "grand_total", submitted: $75.00, computed: $74.50 }
    /// ```
    #[error("{field} mismatch: submitted {submitted}, computed {computed}")]
    TotalsMismatch {
        field: String,
        submitted: Money,
        computed: Money,
    },

    /// Order is not in a state that allows the requested change.
    #[error("Order {order_id} cannot move from {from:?} to {to:?}")]
    InvalidStatusTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Catalog service cannot be found.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: String, value: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: Decimal },

    /// Percentage outside `[0, 100]`.
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: String, value: Decimal },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Arithmetic on the value would overflow the decimal range.
    #[error("{field} is too large")]
    TooLarge { field: String },
}

impl ValidationError {
    /// Prefixes the field name with its position in the order, so
    /// `unit_price` on the third line reads `items[2].unit_price`.
    pub fn at_item(self, index: usize) -> Self {
        let scope = |field: String| format!("items[{}].{}", index, field);
        match self {
            ValidationError::Required { field } => ValidationError::Required { field: scope(field) },
            ValidationError::TooLong { field, max } => ValidationError::TooLong {
                field: scope(field),
                max,
            },
            ValidationError::MustBePositive { field, value } => ValidationError::MustBePositive {
                field: scope(field),
                value,
            },
            ValidationError::Negative { field, value } => ValidationError::Negative {
                field: scope(field),
                value,
            },
            ValidationError::PercentageOutOfRange { field, value } => {
                ValidationError::PercentageOutOfRange {
                    field: scope(field),
                    value,
                }
            }
            ValidationError::InvalidFormat { field, reason } => ValidationError::InvalidFormat {
                field: scope(field),
                reason,
            },
            ValidationError::TooLarge { field } => ValidationError::TooLarge { field: scope(field) },
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer_id".to_string(),
        };
        assert_eq!(err.to_string(), "customer_id is required");

        let err = ValidationError::PercentageOutOfRange {
            field: "item_discount_percentage".to_string(),
            value: Decimal::new(120, 0),
        };
        assert_eq!(
            err.to_string(),
            "item_discount_percentage must be between 0 and 100, got 120"
        );
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
            value: 0,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
        assert_eq!(
            core_err.to_string(),
            "Invalid input: quantity must be positive, got 0"
        );
    }

    #[test]
    fn test_at_item_scopes_field() {
        let err = ValidationError::Negative {
            field: "unit_price".to_string(),
            value: Decimal::new(-5, 0),
        }
        .at_item(2);
        assert_eq!(err.to_string(), "items[2].unit_price must not be negative, got -5");
    }

    #[test]
    fn test_totals_mismatch_message() {
        let err = CoreError::TotalsMismatch {
            field: "grand_total".to_string(),
            submitted: Money::from_cents(7500),
            computed: Money::from_cents(7450),
        };
        assert_eq!(
            err.to_string(),
            "grand_total mismatch: submitted $75.00, computed $74.50"
        );
    }
}
