//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Discounts make it worse: 10% off $19.99 = $17.991                      │
//! │  Rounding that to cents before the flat discount is applied            │
//! │  changes the grand total depending on WHERE you rounded.               │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 Decimal                                    │
//! │    Every intermediate step is exact.                                   │
//! │    Round to cents ONCE, at display or persistence time.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pressline_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_cents(1999); // $19.99
//! let discounted = price.apply_percentage_discount(Decimal::TEN);
//!
//! // Exact, unrounded intermediate value
//! assert_eq!(discounted.amount(), Decimal::new(17991, 3));
//!
//! // Rounded only when shown or stored
//! assert_eq!(discounted.to_string(), "$17.99");
//! assert_eq!(discounted.to_cents(), 1799);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Number of decimal places kept when a value is displayed or persisted.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units (dollars), held as an exact
/// decimal.
///
/// ## Design Decisions
/// - **Signed**: variances in a cash up and refunds can be negative
/// - **Unrounded**: arithmetic never rounds; see [`Money::round_to_cents`]
/// - **Serde**: serialized as a decimal string (`"17.991"`) so no JSON
///   consumer ever sees a binary float
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Service.price ──► LineItemDraft.unit_price ──► PricedLineItem.line_total│
/// │                                                                         │
/// │  PricedOrder.subtotal ──► cart discounts ──► PricedOrder.grand_total    │
/// │                                                                         │
/// │  Payments ──► system takings ──► CashUpSummary variances                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal amount in major units.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use pressline_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.amount().to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_DECIMAL_PLACES))
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    pub fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money::from_cents(major * 100 - minor)
        } else {
            Money::from_cents(major * 100 + minor)
        }
    }

    /// Returns the exact, unrounded amount in major units.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Floors the value at zero.
    ///
    /// Every subtraction step in pricing passes through this, so no discount
    /// can drive a line or an order below $0.00.
    #[inline]
    pub fn non_negative(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Rounds to whole cents, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use pressline_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(12345, 3)); // 12.345
    /// assert_eq!(m.round_to_cents(), Money::from_cents(1235));
    /// ```
    pub fn round_to_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Returns the value rounded to whole cents.
    ///
    /// Amounts beyond the `i64` cent range saturate. Anything that gets
    /// stored goes through [`Money::checked_to_cents`] instead.
    pub fn to_cents(&self) -> i64 {
        self.checked_to_cents()
            .unwrap_or(if self.is_negative() { i64::MIN } else { i64::MAX })
    }

    /// Returns the value rounded to whole cents, or `None` when it does not
    /// fit an `i64` cent column.
    ///
    /// ## Example
    /// ```rust
    /// use pressline_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_cents(1099).checked_to_cents(), Some(1099));
    /// assert_eq!(Money::from_decimal(Decimal::MAX).checked_to_cents(), None);
    /// ```
    pub fn checked_to_cents(&self) -> Option<i64> {
        self.round_to_cents()
            .0
            .checked_mul(Decimal::ONE_HUNDRED)?
            .trunc()
            .to_i64()
    }

    /// Adds two amounts, `None` on decimal overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use pressline_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(450); // $4.50 shirt press
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_cents(1350));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Like [`Money::multiply_quantity`], but `None` on decimal overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Like [`Money::percentage_of`], but `None` on decimal overflow.
    #[inline]
    pub fn checked_percentage_of(&self, percentage: Decimal) -> Option<Self> {
        self.0
            .checked_mul(percentage)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(Money)
    }

    /// Returns `percentage`% of this amount, exactly.
    ///
    /// `percentage` is expressed in percent (10 = 10%), not as a fraction.
    #[inline]
    pub fn percentage_of(&self, percentage: Decimal) -> Self {
        Money(self.0 * percentage / Decimal::ONE_HUNDRED)
    }

    /// Subtracts `percentage`% of this amount and returns the remainder.
    ///
    /// ## Example
    /// ```rust
    /// use pressline_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// let discounted = subtotal.apply_percentage_discount(Decimal::new(20, 0));
    /// assert_eq!(discounted, Money::from_cents(8000)); // $80.00
    /// ```
    pub fn apply_percentage_discount(&self, percentage: Decimal) -> Self {
        *self - self.percentage_of(percentage)
    }

    /// Formats with an arbitrary currency symbol, rounded to cents.
    ///
    /// ## Example
    /// ```rust
    /// use pressline_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-1000).format_with_symbol("£"), "-£10.00");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let mut rounded = self.round_to_cents().0;
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        rounded = rounded.abs();
        rounded.rescale(CURRENCY_DECIMAL_PLACES);
        format!("{}{}{}", sign, symbol, rounded)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded to cents with a `$` symbol.
///
/// For shop-specific symbols use [`Money::format_with_symbol`] or
/// `ShopConfig::format_money`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

/// Parses a plain decimal string such as `"100"` or `"12.50"`.
impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
