//! # Cash Up
//!
//! End-of-day reconciliation of what the till and the card terminal should
//! hold against what was actually counted.
//!
//! ```text
//! expected_cash_in_till = system_cash_takings + opening_float − total_payouts
//! cash_variance         = actual_cash_counted − expected_cash_in_till
//! card_variance         = actual_card_total   − system_card_takings
//! ```
//!
//! A positive variance means the till is over, negative means short.
//! Plain arithmetic, no rounding, no validation: a cash up with odd
//! numbers is still a cash up, and the variance is what flags it.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Money taken out of the till during the day (supplier paid in cash,
/// petty cash, refunds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub amount: Money,
    pub reason: String,
}

/// Sums payouts.
pub fn total_payouts(payouts: &[Payout]) -> Money {
    payouts.iter().map(|payout| payout.amount).sum()
}

/// Figures going into a cash up.
///
/// `system_*` values come from recorded payments; `actual_*` values are
/// what the operator counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CashUpInput {
    pub system_cash_takings: Money,
    pub opening_float: Money,
    pub total_payouts: Money,
    pub actual_cash_counted: Money,
    pub system_card_takings: Money,
    pub actual_card_total: Money,
}

/// Whether a count agrees with the system figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    Balanced,
    Over,
    Short,
}

impl VarianceStatus {
    /// Classifies a variance, ignoring anything below half a cent.
    pub fn of(variance: Money) -> Self {
        let rounded = variance.round_to_cents();
        if rounded.is_positive() {
            VarianceStatus::Over
        } else if rounded.is_negative() {
            VarianceStatus::Short
        } else {
            VarianceStatus::Balanced
        }
    }
}

/// Result of a cash up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashUpSummary {
    pub expected_cash_in_till: Money,
    pub cash_variance: Money,
    pub card_variance: Money,
    /// `cash_variance + card_variance`.
    pub total_variance: Money,
    /// Cash plus card the system recorded for the day.
    pub total_takings: Money,
    pub cash_status: VarianceStatus,
    pub card_status: VarianceStatus,
}

/// `system_cash_takings + opening_float − total_payouts`.
pub fn expected_cash_in_till(
    system_cash_takings: Money,
    opening_float: Money,
    total_payouts: Money,
) -> Money {
    system_cash_takings + opening_float - total_payouts
}

/// `actual_cash_counted − expected_cash_in_till`.
pub fn cash_variance(actual_cash_counted: Money, expected_cash_in_till: Money) -> Money {
    actual_cash_counted - expected_cash_in_till
}

/// `actual_card_total − system_card_takings`.
pub fn card_variance(actual_card_total: Money, system_card_takings: Money) -> Money {
    actual_card_total - system_card_takings
}

/// Runs the full cash up.
///
/// ## Example
/// ```rust
/// use pressline_core::cashup::{reconcile, CashUpInput, VarianceStatus};
/// use pressline_core::money::Money;
///
/// let summary = reconcile(&CashUpInput {
///     system_cash_takings: Money::from_cents(50000),
///     opening_float: Money::from_cents(10000),
///     total_payouts: Money::from_cents(3000),
///     actual_cash_counted: Money::from_cents(56000),
///     ..Default::default()
/// });
///
/// assert_eq!(summary.expected_cash_in_till, Money::from_cents(57000));
/// assert_eq!(summary.cash_variance, Money::from_cents(-1000));
/// assert_eq!(summary.cash_status, VarianceStatus::Short);
/// ```
pub fn reconcile(input: &CashUpInput) -> CashUpSummary {
    let expected = expected_cash_in_till(
        input.system_cash_takings,
        input.opening_float,
        input.total_payouts,
    );
    let cash = cash_variance(input.actual_cash_counted, expected);
    let card = card_variance(input.actual_card_total, input.system_card_takings);

    CashUpSummary {
        expected_cash_in_till: expected,
        cash_variance: cash,
        card_variance: card,
        total_variance: cash + card,
        total_takings: input.system_cash_takings + input.system_card_takings,
        cash_status: VarianceStatus::of(cash),
        card_status: VarianceStatus::of(card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_up_short_by_ten() {
        let input = CashUpInput {
            system_cash_takings: Money::from_cents(50000),
            opening_float: Money::from_cents(10000),
            total_payouts: Money::from_cents(3000),
            actual_cash_counted: Money::from_cents(56000),
            system_card_takings: Money::from_cents(120000),
            actual_card_total: Money::from_cents(120000),
        };
        let summary = reconcile(&input);

        assert_eq!(summary.expected_cash_in_till, Money::from_cents(57000));
        assert_eq!(summary.cash_variance, Money::from_cents(-1000));
        assert_eq!(summary.cash_variance.to_string(), "-$10.00");
        assert_eq!(summary.card_variance, Money::zero());
        assert_eq!(summary.total_variance, Money::from_cents(-1000));
        assert_eq!(summary.total_takings, Money::from_cents(170000));
        assert_eq!(summary.cash_status, VarianceStatus::Short);
        assert_eq!(summary.card_status, VarianceStatus::Balanced);
    }

    #[test]
    fn test_card_over() {
        assert_eq!(
            card_variance(Money::from_cents(10250), Money::from_cents(10000)),
            Money::from_cents(250)
        );
        assert_eq!(VarianceStatus::of(Money::from_cents(250)), VarianceStatus::Over);
    }

    #[test]
    fn test_total_payouts() {
        let payouts = vec![
            Payout {
                amount: Money::from_cents(1200),
                reason: "milk & coffee".to_string(),
            },
            Payout {
                amount: Money::from_cents(1800),
                reason: "window cleaner".to_string(),
            },
        ];
        assert_eq!(total_payouts(&payouts), Money::from_cents(3000));
        assert_eq!(total_payouts(&[]), Money::zero());
    }

    #[test]
    fn test_sub_cent_variance_is_balanced() {
        let variance = Money::from_decimal(rust_decimal::Decimal::new(-4, 3)); // -0.004
        assert_eq!(VarianceStatus::of(variance), VarianceStatus::Balanced);
    }
}
