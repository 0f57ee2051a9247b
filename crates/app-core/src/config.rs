//! Application configuration
//!
//! Sources, highest priority first:
//! 1. Environment variables (`RENTAL_*`)
//! 2. JSON config file
//! 3. Defaults

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::catalog::DEFAULT_PRICE_FRACTION;
use crate::validation::Wilaya;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON for [`AppConfig`]
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Currency symbol appended to prices
    pub currency_symbol: String,

    /// Days between default pickup and drop-off
    pub default_rental_days: u32,

    /// Upper end of the filter price slider
    pub max_filter_price: i64,

    /// Initial filter slider position
    pub default_price_fraction: f32,

    /// Regions offered in the renter form
    pub wilayas: Vec<Wilaya>,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "DA".to_string(),
            default_rental_days: 3,
            max_filter_price: 5000,
            default_price_fraction: DEFAULT_PRICE_FRACTION,
            wilayas: Wilaya::all().to_vec(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, then apply environment overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RENTAL_*` overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(symbol) = lookup("RENTAL_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
        if let Some(days) = lookup("RENTAL_DEFAULT_RENTAL_DAYS") {
            self.default_rental_days = days.parse().map_err(|_| {
                ConfigError::Invalid(format!("RENTAL_DEFAULT_RENTAL_DAYS: {days}"))
            })?;
        }
        if let Some(price) = lookup("RENTAL_MAX_FILTER_PRICE") {
            self.max_filter_price = price
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("RENTAL_MAX_FILTER_PRICE: {price}")))?;
        }
        if let Some(filter) = lookup("RENTAL_LOG_FILTER") {
            self.log_filter = filter;
        }
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.default_rental_days == 0 {
            return Err(ConfigError::Invalid(
                "defaultRentalDays must be at least 1".to_string(),
            ));
        }
        if self.max_filter_price <= 0 {
            return Err(ConfigError::Invalid(
                "maxFilterPrice must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.default_price_fraction) {
            return Err(ConfigError::Invalid(
                "defaultPriceFraction must be within [0, 1]".to_string(),
            ));
        }
        if self.wilayas.is_empty() {
            return Err(ConfigError::Invalid("wilayas must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.currency_symbol, "DA");
        assert_eq!(config.default_rental_days, 3);
        assert_eq!(config.max_filter_price, 5000);
        assert_eq!(config.wilayas.len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load(temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(config.wilayas, Wilaya::all().to_vec());
        assert_eq!(config.default_price_fraction, DEFAULT_PRICE_FRACTION);
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "defaultRentalDays": 5, "wilayas": ["Oran"] }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.wilayas, vec![Wilaya::Oran]);
        assert_eq!(config.max_filter_price, 5000);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RENTAL_CURRENCY_SYMBOL", "EUR"),
            ("RENTAL_DEFAULT_RENTAL_DAYS", "7"),
            ("RENTAL_LOG_FILTER", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.currency_symbol, "EUR");
        assert_eq!(config.default_rental_days, 7);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| {
            (key == "RENTAL_MAX_FILTER_PRICE").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_ranges() {
        let config = AppConfig {
            default_rental_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            default_price_fraction: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            wilayas: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
