//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use pressline_core::{Money, ShopConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::pool::DbConfig;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// Shop-level business settings
    pub shop: ShopConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `load` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ShopConfig::default();

        let config = AppConfig {
            database_path: lookup("PRESSLINE_DB_PATH")
                .unwrap_or_else(|| "pressline.db".to_string())
                .into(),

            max_connections: lookup("PRESSLINE_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PRESSLINE_DB_MAX_CONNECTIONS".to_string()))?,

            shop: ShopConfig {
                shop_name: lookup("PRESSLINE_SHOP_NAME").unwrap_or(defaults.shop_name),

                currency_symbol: lookup("PRESSLINE_CURRENCY_SYMBOL")
                    .unwrap_or(defaults.currency_symbol),

                default_opening_float: money_var(
                    &lookup,
                    "PRESSLINE_OPENING_FLOAT",
                    defaults.default_opening_float,
                )?,

                totals_tolerance: money_var(
                    &lookup,
                    "PRESSLINE_TOTALS_TOLERANCE",
                    defaults.totals_tolerance,
                )?,
            },
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "PRESSLINE_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.shop.default_opening_float.is_negative() {
            return Err(ConfigError::InvalidValue("PRESSLINE_OPENING_FLOAT".to_string()));
        }

        if config.shop.totals_tolerance.is_negative() {
            return Err(ConfigError::InvalidValue(
                "PRESSLINE_TOTALS_TOLERANCE".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let config = if self.database_path.as_os_str() == crate::pool::IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(self.database_path.clone())
        };
        config.max_connections(self.max_connections)
    }
}

/// Reads a decimal amount such as `100` or `100.00`.
fn money_var<F>(lookup: &F, key: &str, default: Money) -> Result<Money, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<Money>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = load_from(&[]).unwrap();

        assert_eq!(config.database_path, PathBuf::from("pressline.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.shop, ShopConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = load_from(&[
            ("PRESSLINE_DB_PATH", ":memory:"),
            ("PRESSLINE_DB_MAX_CONNECTIONS", "1"),
            ("PRESSLINE_SHOP_NAME", "Crease Lightning"),
            ("PRESSLINE_CURRENCY_SYMBOL", "£"),
            ("PRESSLINE_OPENING_FLOAT", "150.00"),
            ("PRESSLINE_TOTALS_TOLERANCE", "0.01"),
        ])
        .unwrap();

        assert_eq!(config.shop.shop_name, "Crease Lightning");
        assert_eq!(config.shop.currency_symbol, "£");
        assert_eq!(config.shop.default_opening_float, Money::from_cents(15000));
        assert_eq!(config.shop.totals_tolerance, Money::from_cents(1));
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load_from(&[("PRESSLINE_DB_MAX_CONNECTIONS", "lots")]),
            Err(ConfigError::InvalidValue(key)) if key == "PRESSLINE_DB_MAX_CONNECTIONS"
        ));
        assert!(load_from(&[("PRESSLINE_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load_from(&[("PRESSLINE_OPENING_FLOAT", "a hundred")]).is_err());
        assert!(load_from(&[("PRESSLINE_OPENING_FLOAT", "-5")]).is_err());
        assert!(load_from(&[("PRESSLINE_TOTALS_TOLERANCE", "-0.01")]).is_err());
    }
}
