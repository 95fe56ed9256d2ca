//! Property tests for order pricing.
//!
//! Every caller that prices an order goes through `pressline_core::pricing`,
//! so these properties cover the request path and the database write path
//! at once.

use pressline_core::pricing::{
    compute_grand_total, compute_subtotal, price_line_item, price_order,
};
use pressline_core::{CartAdjustments, LineItemDraft, Money, OrderDraft};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Strategies
// =============================================================================

/// Non-negative prices up to $10,000.00.
fn price() -> impl Strategy<Value = Money> {
    (0i64..=1_000_000).prop_map(Money::from_cents)
}

fn quantity() -> impl Strategy<Value = i64> {
    1i64..=500
}

/// Percentages in [0, 100] with two decimal places (12.5%, 33.33%, ...).
fn percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis| Decimal::new(basis, 2))
}

fn line_item() -> impl Strategy<Value = LineItemDraft> {
    (
        price(),
        quantity(),
        proptest::option::of(percentage()),
        proptest::option::of(price()),
    )
        .prop_map(|(unit_price, quantity, pct, amount)| LineItemDraft {
            service_id: "svc".to_string(),
            service_name: "Suit - 2 Piece".to_string(),
            unit_price,
            quantity,
            item_discount_percentage: pct,
            item_discount_amount: amount,
            notes: None,
            color: None,
        })
}

fn adjustments() -> impl Strategy<Value = CartAdjustments> {
    (
        proptest::option::of(percentage()),
        proptest::option::of(price()),
        proptest::option::of(price()),
    )
        .prop_map(|(pct, amount, price_override)| CartAdjustments {
            cart_discount_percentage: pct,
            cart_discount_amount: amount,
            cart_price_override: price_override,
        })
}

fn draft() -> impl Strategy<Value = OrderDraft> {
    (proptest::collection::vec(line_item(), 1..12), adjustments()).prop_map(|(items, adj)| {
        OrderDraft {
            items,
            adjustments: adj,
            ..OrderDraft::new("cust-prop")
        }
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Property: with no discounts a line is exactly unit_price × quantity.
    #[test]
    fn test_undiscounted_line_is_price_times_quantity(
        unit_price in price(),
        qty in quantity(),
    ) {
        let total = price_line_item(unit_price, qty, None, None).unwrap();
        prop_assert_eq!(total, unit_price * qty);
    }

    /// Property: a percentage discount is exact, no rounding before display.
    #[test]
    fn test_percentage_discount_is_exact(
        unit_price in price(),
        qty in quantity(),
        pct in percentage(),
    ) {
        let total = price_line_item(unit_price, qty, Some(pct), Some(Money::zero())).unwrap();
        let gross = unit_price.amount() * Decimal::from(qty);
        let expected = gross * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED;
        prop_assert_eq!(total.amount(), expected);
    }

    /// Property: no line total is ever negative.
    #[test]
    fn test_line_total_never_negative(item in line_item()) {
        let total = price_line_item(
            item.unit_price,
            item.quantity,
            item.item_discount_percentage,
            item.item_discount_amount,
        ).unwrap();
        prop_assert!(!total.is_negative());
    }

    /// Property: no grand total is ever negative.
    #[test]
    fn test_grand_total_never_negative(order in draft()) {
        let priced = price_order(&order).unwrap();
        prop_assert!(!priced.grand_total.is_negative());
        prop_assert!(priced.items.iter().all(|line| !line.line_total.is_negative()));
    }

    /// Property: a non-negative override makes cart discounts irrelevant.
    #[test]
    fn test_override_ignores_cart_discounts(
        subtotal in price(),
        price_override in price(),
        pct_a in proptest::option::of(percentage()),
        pct_b in proptest::option::of(percentage()),
        amount_a in proptest::option::of(price()),
        amount_b in proptest::option::of(price()),
    ) {
        let a = compute_grand_total(subtotal, pct_a, amount_a, Some(price_override)).unwrap();
        let b = compute_grand_total(subtotal, pct_b, amount_b, Some(price_override)).unwrap();
        prop_assert_eq!(a, price_override);
        prop_assert_eq!(b, price_override);
    }

    /// Property: the subtotal does not depend on line order.
    #[test]
    fn test_subtotal_is_order_independent(
        totals in proptest::collection::vec(price(), 0..20),
        seed in any::<u64>(),
    ) {
        let mut shuffled = totals.clone();
        // Deterministic rotation plus reversal stands in for a shuffle.
        if !shuffled.is_empty() {
            let by = (seed as usize) % shuffled.len();
            shuffled.rotate_left(by);
        }
        shuffled.reverse();

        prop_assert_eq!(
            compute_subtotal(totals.iter().copied()),
            compute_subtotal(shuffled)
        );
    }

    /// Property: pricing the same draft twice gives the same result.
    #[test]
    fn test_price_order_is_idempotent(order in draft()) {
        let first = price_order(&order).unwrap();
        let second = price_order(&order).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: the subtotal is the sum of the priced lines.
    #[test]
    fn test_subtotal_matches_lines(order in draft()) {
        let priced = price_order(&order).unwrap();
        let sum: Money = priced.items.iter().map(|line| line.line_total).sum();
        prop_assert_eq!(priced.subtotal, sum);
    }

    /// Property: out-of-range percentages are rejected, never clamped.
    #[test]
    fn test_percentage_above_hundred_rejected(
        unit_price in price(),
        qty in quantity(),
        excess in 1i64..=100_000,
    ) {
        let pct = Decimal::ONE_HUNDRED + Decimal::new(excess, 2);
        prop_assert!(price_line_item(unit_price, qty, Some(pct), None).is_err());
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_item_percentage() {
    let total = price_line_item(Money::from_cents(1000), 2, Some(Decimal::TEN), None).unwrap();
    assert_eq!(total.round_to_cents(), Money::from_cents(1800));
}

#[test]
fn test_scenario_cart_percentage_then_flat() {
    let total = compute_grand_total(
        Money::from_cents(10000),
        Some(Decimal::new(20, 0)),
        Some(Money::from_cents(500)),
        None,
    )
    .unwrap();
    assert_eq!(total, Money::from_cents(7500));
}

#[test]
fn test_scenario_override_wins() {
    let total = compute_grand_total(
        Money::from_cents(5000),
        Some(Decimal::new(20, 0)),
        None,
        Some(Money::from_cents(4000)),
    )
    .unwrap();
    assert_eq!(total, Money::from_cents(4000));
}

#[test]
fn test_scenario_flat_discount_clamps_to_zero() {
    let total =
        price_line_item(Money::from_cents(500), 3, None, Some(Money::from_cents(2000))).unwrap();
    assert_eq!(total, Money::zero());
}
