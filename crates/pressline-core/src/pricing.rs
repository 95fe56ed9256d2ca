//! # Order Pricing
//!
//! The one pricing formula in Pressline. The counter request path calls
//! [`price_order`]; the database transaction that writes the order calls it
//! again on the same draft. Neither keeps its own copy of the arithmetic.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PER LINE                                                               │
//! │    raw = unit_price × quantity                                          │
//! │    raw -= raw × item_discount_percentage / 100        (if present)      │
//! │    raw -= item_discount_amount                        (if present)      │
//! │    line_total = max(0, raw)                                             │
//! │                                                                         │
//! │  ORDER                                                                  │
//! │    subtotal = Σ line_total                                              │
//! │                                                                         │
//! │    cart_price_override ≥ 0 ?                                            │
//! │      yes ──► grand_total = cart_price_override        (nothing else)    │
//! │      no  ──► total = subtotal                                           │
//! │              total -= total × cart_discount_percentage / 100            │
//! │              total -= cart_discount_amount                              │
//! │              grand_total = max(0, total)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Percentage always comes before flat amount. Every step is floored at
//! zero. Nothing is rounded here; see [`Money::round_to_cents`].
//!
//! ## Example
//! ```rust
//! use pressline_core::money::Money;
//! use pressline_core::pricing::{compute_grand_total, price_line_item};
//! use rust_decimal::Decimal;
//!
//! // 2 × $10.00 with 10% off
//! let line = price_line_item(Money::from_cents(1000), 2, Some(Decimal::TEN), None).unwrap();
//! assert_eq!(line, Money::from_cents(1800));
//!
//! // $100.00, 20% off, then $5 off
//! let total = compute_grand_total(
//!     Money::from_cents(10000),
//!     Some(Decimal::new(20, 0)),
//!     Some(Money::from_cents(500)),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(total, Money::from_cents(7500));
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    CartAdjustments, LineItemDraft, OrderDraft, OrderTotals, PricedLineItem, PricedOrder,
};
use crate::validation::{
    validate_cart_adjustments, validate_line_pricing, validate_non_negative, validate_order_draft,
};

// =============================================================================
// Line Items
// =============================================================================

/// Prices one line: `max(0, unit_price × quantity − percentage − flat)`.
///
/// ## Errors
/// `CoreError::InvalidInput` when `unit_price < 0`, `quantity < 1`, the
/// percentage is outside `[0, 100]` or the flat amount is negative.
pub fn price_line_item(
    unit_price: Money,
    quantity: i64,
    item_discount_percentage: Option<Decimal>,
    item_discount_amount: Option<Money>,
) -> CoreResult<Money> {
    validate_line_pricing(
        unit_price,
        quantity,
        item_discount_percentage,
        item_discount_amount,
    )?;

    let mut total = unit_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| too_large("unit_price"))?;

    if let Some(pct) = item_discount_percentage {
        let discount = total
            .checked_percentage_of(pct)
            .ok_or_else(|| too_large("unit_price"))?;
        total = (total - discount).non_negative();
    }

    if let Some(amount) = item_discount_amount {
        total = (total - amount).non_negative();
    }

    Ok(total.non_negative())
}

/// Prices a [`LineItemDraft`].
pub fn price_line(item: &LineItemDraft) -> CoreResult<Money> {
    price_line_item(
        item.unit_price,
        item.quantity,
        item.item_discount_percentage,
        item.item_discount_amount,
    )
}

// =============================================================================
// Subtotal
// =============================================================================

/// Sums line totals. An empty sequence yields zero.
///
/// Rejecting empty orders is the caller's job ([`price_order`] does).
pub fn compute_subtotal<I>(line_totals: I) -> Money
where
    I: IntoIterator<Item = Money>,
{
    line_totals.into_iter().sum()
}

/// Like [`compute_subtotal`], but rejects a sum that does not fit.
///
/// ## Errors
/// `CoreError::InvalidInput(TooLarge)` when the running total overflows.
pub fn checked_subtotal<I>(line_totals: I) -> CoreResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    line_totals
        .into_iter()
        .try_fold(Money::zero(), |acc, line| {
            acc.checked_add(line).ok_or_else(|| too_large("subtotal"))
        })
}

// =============================================================================
// Cart-Level Total
// =============================================================================

/// Applies cart-level adjustments to a subtotal.
///
/// ## Rules
/// 1. `cart_price_override` present and ≥ 0: it IS the grand total. The
///    cart discounts are ignored and the override is not discounted.
/// 2. Otherwise (absent, or negative and therefore ignored): percentage
///    off, then flat amount off, floored at zero.
///
/// ## Errors
/// `CoreError::InvalidInput` for a negative subtotal, a percentage outside
/// `[0, 100]` or a negative flat amount. These are checked even when an
/// override wins.
pub fn compute_grand_total(
    subtotal: Money,
    cart_discount_percentage: Option<Decimal>,
    cart_discount_amount: Option<Money>,
    cart_price_override: Option<Money>,
) -> CoreResult<Money> {
    let adjustments = CartAdjustments {
        cart_discount_percentage,
        cart_discount_amount,
        cart_price_override,
    };
    apply_cart_adjustments(subtotal, &adjustments)
}

/// [`compute_grand_total`] over a [`CartAdjustments`] value.
pub fn apply_cart_adjustments(subtotal: Money, adjustments: &CartAdjustments) -> CoreResult<Money> {
    validate_non_negative("subtotal", subtotal)?;
    validate_cart_adjustments(adjustments)?;

    if let Some(price_override) = effective_override(adjustments) {
        return Ok(price_override);
    }

    let mut total = subtotal;

    if let Some(pct) = adjustments.cart_discount_percentage {
        let discount = total
            .checked_percentage_of(pct)
            .ok_or_else(|| too_large("subtotal"))?;
        total = (total - discount).non_negative();
    }

    if let Some(amount) = adjustments.cart_discount_amount {
        total = (total - amount).non_negative();
    }

    Ok(total.non_negative())
}

/// The override that actually applies, if any. Negative overrides are
/// dropped.
pub fn effective_override(adjustments: &CartAdjustments) -> Option<Money> {
    adjustments
        .cart_price_override
        .filter(|price_override| !price_override.is_negative())
}

// =============================================================================
// Whole Order
// =============================================================================

/// Prices a whole draft.
///
/// ## What This Does
/// 1. Validates the draft (customer present, every line in domain)
/// 2. Rejects an order with no lines
/// 3. Prices each line, sums the subtotal, applies cart adjustments
/// 4. Returns the draft enriched with `line_total`, `subtotal`,
///    `grand_total`; opaque fields are carried over untouched
///
/// Same draft in, same priced order out. No clock, no state.
pub fn price_order(draft: &OrderDraft) -> CoreResult<PricedOrder> {
    validate_order_draft(draft)?;

    if draft.items.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let items = draft
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let line_total = price_line(item).map_err(|err| scope_to_item(err, index))?;
            Ok(PricedLineItem {
                item: item.clone(),
                line_total,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let subtotal = checked_subtotal(items.iter().map(|line| line.line_total))?;
    let grand_total = apply_cart_adjustments(subtotal, &draft.adjustments)?;

    Ok(PricedOrder {
        customer_id: draft.customer_id.clone(),
        items,
        adjustments: draft.adjustments.clone(),
        due_date: draft.due_date,
        is_express: draft.is_express,
        notes: draft.notes.clone(),
        subtotal,
        grand_total,
    })
}

/// Checks totals computed elsewhere against a priced order.
///
/// Both sides are rounded to cents before comparing; `tolerance` is the
/// largest accepted absolute difference (zero means exact agreement).
///
/// ## Errors
/// `CoreError::TotalsMismatch` naming the first field that disagrees.
pub fn verify_totals(
    priced: &PricedOrder,
    submitted: &OrderTotals,
    tolerance: Money,
) -> CoreResult<()> {
    let computed = priced.totals();
    let checks = [
        ("subtotal", submitted.subtotal, computed.subtotal),
        ("grand_total", submitted.grand_total, computed.grand_total),
    ];

    for (field, submitted, computed) in checks {
        let submitted = submitted.round_to_cents();
        if (submitted - computed).abs() > tolerance.abs() {
            return Err(CoreError::TotalsMismatch {
                field: field.to_string(),
                submitted,
                computed,
            });
        }
    }

    Ok(())
}

fn too_large(field: &str) -> CoreError {
    CoreError::InvalidInput(ValidationError::TooLarge {
        field: field.to_string(),
    })
}

fn scope_to_item(err: CoreError, index: usize) -> CoreError {
    match err {
        CoreError::InvalidInput(inner) => CoreError::InvalidInput(inner.at_item(index)),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
