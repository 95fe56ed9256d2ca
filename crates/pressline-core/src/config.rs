//! # Shop Configuration
//!
//! Business values that used to be literals scattered around the counter
//! screens: shop name, currency symbol, opening float, totals tolerance.
//! They are passed in explicitly to whatever needs them. Loading them (env,
//! file) is the application's job, not this crate's.

use serde::{Deserialize, Serialize};

use crate::cashup::CashUpInput;
use crate::money::Money;

/// Per-shop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Printed on tickets and reports.
    pub shop_name: String,

    /// Prefix used when formatting money for display.
    pub currency_symbol: String,

    /// Cash placed in the till before trading starts.
    pub default_opening_float: Money,

    /// Largest accepted difference between totals a caller submits and the
    /// totals recomputed when the order is written. Zero means exact.
    pub totals_tolerance: Money,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            shop_name: "Pressline Dry Cleaners".to_string(),
            currency_symbol: "$".to_string(),
            default_opening_float: Money::from_cents(10000),
            totals_tolerance: Money::zero(),
        }
    }
}

impl ShopConfig {
    /// Formats an amount with this shop's currency symbol.
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Starts a cash up with this shop's default opening float.
    pub fn cash_up_input(&self) -> CashUpInput {
        CashUpInput {
            opening_float: self.default_opening_float,
            ..CashUpInput::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShopConfig::default();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.default_opening_float, Money::from_cents(10000));
        assert!(config.totals_tolerance.is_zero());
    }

    #[test]
    fn test_format_money_uses_symbol() {
        let config = ShopConfig {
            currency_symbol: "£".to_string(),
            ..ShopConfig::default()
        };
        assert_eq!(config.format_money(Money::from_cents(1250)), "£12.50");
    }

    #[test]
    fn test_cash_up_input_seeds_float() {
        let input = ShopConfig::default().cash_up_input();
        assert_eq!(input.opening_float, Money::from_cents(10000));
        assert!(input.system_cash_takings.is_zero());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: ShopConfig = serde_json::from_str(r#"{"shop_name": "Bubbles"}"#).unwrap();
        assert_eq!(config.shop_name, "Bubbles");
        assert_eq!(config.currency_symbol, "$");
    }
}
