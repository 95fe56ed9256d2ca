//! # Validation Module
//!
//! Input validation utilities for Pressline.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Counter form                                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Pricing (Rust)                                               │
//! │  └── THIS MODULE: numeric domains (price ≥ 0, qty ≥ 1, 0 ≤ % ≤ 100)    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators reject, they never clamp.
//!
//! ## Usage
//! ```rust
//! use pressline_core::validation::{validate_quantity, validate_percentage};
//! use rust_decimal::Decimal;
//!
//! validate_quantity(2).unwrap();
//! assert!(validate_percentage("item_discount_percentage", Decimal::new(101, 0)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CartAdjustments, LineItemDraft, OrderDraft};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length for service names.
pub const MAX_SERVICE_NAME_LEN: usize = 200;

/// Maximum length for free-text notes on orders and lines.
pub const MAX_NOTE_LEN: usize = 500;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value (integer, at least 1).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
            value: qty,
        });
    }

    Ok(())
}

/// Validates that a monetary value is not negative.
///
/// ## Example
/// ```rust
/// use pressline_core::money::Money;
/// use pressline_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("unit_price", Money::from_cents(1099)).is_ok());
/// assert!(validate_non_negative("unit_price", Money::zero()).is_ok());
/// assert!(validate_non_negative("unit_price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: value.amount(),
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (complimentary items).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    validate_non_negative("unit_price", price)
}

/// Validates a percentage lies in `[0, 100]`.
pub fn validate_percentage(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::PercentageOutOfRange {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates the customer reference on an order.
///
/// The id is opaque here; it only has to be present.
pub fn validate_customer_id(customer_id: &str) -> ValidationResult<()> {
    if customer_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer_id".to_string(),
        });
    }

    Ok(())
}

/// Validates a service name.
pub fn validate_service_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "service_name".to_string(),
        });
    }

    if name.chars().count() > MAX_SERVICE_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "service_name".to_string(),
            max: MAX_SERVICE_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates optional free text.
pub fn validate_optional_note(field: &str, note: Option<&str>) -> ValidationResult<()> {
    match note {
        Some(text) if text.chars().count() > MAX_NOTE_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NOTE_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use pressline_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates the pricing inputs of one line item.
pub fn validate_line_pricing(
    unit_price: Money,
    quantity: i64,
    item_discount_percentage: Option<Decimal>,
    item_discount_amount: Option<Money>,
) -> ValidationResult<()> {
    validate_unit_price(unit_price)?;
    validate_quantity(quantity)?;
    if let Some(pct) = item_discount_percentage {
        validate_percentage("item_discount_percentage", pct)?;
    }
    if let Some(amount) = item_discount_amount {
        validate_non_negative("item_discount_amount", amount)?;
    }
    Ok(())
}

/// Validates cart-level adjustments.
///
/// A negative `cart_price_override` is NOT an error: pricing treats it as
/// absent.
pub fn validate_cart_adjustments(adjustments: &CartAdjustments) -> ValidationResult<()> {
    if let Some(pct) = adjustments.cart_discount_percentage {
        validate_percentage("cart_discount_percentage", pct)?;
    }
    if let Some(amount) = adjustments.cart_discount_amount {
        validate_non_negative("cart_discount_amount", amount)?;
    }
    Ok(())
}

/// Validates a whole line item, including its pass-through text.
pub fn validate_line_item(item: &LineItemDraft) -> ValidationResult<()> {
    validate_service_name(&item.service_name)?;
    validate_line_pricing(
        item.unit_price,
        item.quantity,
        item.item_discount_percentage,
        item.item_discount_amount,
    )?;
    validate_optional_note("notes", item.notes.as_deref())?;
    Ok(())
}

/// Validates an order draft field by field.
///
/// Errors on a line are scoped to it, e.g. `items[1].quantity`. An empty
/// item list is not checked here; [`crate::pricing::price_order`] reports it
/// as `CoreError::EmptyOrder`.
pub fn validate_order_draft(draft: &OrderDraft) -> ValidationResult<()> {
    validate_customer_id(&draft.customer_id)?;
    for (index, item) in draft.items.iter().enumerate() {
        validate_line_item(item).map_err(|e| e.at_item(index))?;
    }
    validate_cart_adjustments(&draft.adjustments)?;
    validate_optional_note("notes", draft.notes.as_deref())?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
