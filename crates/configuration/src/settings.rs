use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Parameters for the statistics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// When true, the zone comparison only uses comparables of the same property type.
    pub compare_by_type: bool,
    pub investment: InvestmentSettings,
    pub demand: DemandSettings,
}

/// Assumptions behind the estimated annual return.
///
/// All values are percentages of the list price, except `vacancy_rate`
/// which is a fraction of the year (0.08 = one month empty per year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSettings {
    /// Gross rental yield used when the zone offers no reference price.
    pub default_rental_yield_pct: Decimal,
    pub vacancy_rate: Decimal,
    /// Taxes, administration and maintenance per year.
    pub operating_cost_pct: Decimal,
    /// Expected yearly appreciation of the asset.
    pub appreciation_pct: Decimal,
}

/// Weights of the demand score. `listing_weight + search_weight` must be 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSettings {
    pub listing_weight: Decimal,
    pub search_weight: Decimal,
    /// Comparable listing count at which the listing component reaches half its weight.
    pub listing_half_saturation: Decimal,
    /// Search count at which the search component reaches half its weight.
    pub search_half_saturation: Decimal,
}

/// Output settings for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            compare_by_type: true,
            investment: InvestmentSettings::default(),
            demand: DemandSettings::default(),
        }
    }
}

impl Default for InvestmentSettings {
    fn default() -> Self {
        Self {
            default_rental_yield_pct: dec!(6),
            vacancy_rate: dec!(0.08),
            operating_cost_pct: dec!(1.5),
            appreciation_pct: dec!(3),
        }
    }
}

impl Default for DemandSettings {
    fn default() -> Self {
        Self {
            listing_weight: dec!(0.6),
            search_weight: dec!(0.4),
            listing_half_saturation: dec!(20),
            search_half_saturation: dec!(10),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
        }
    }
}

impl Config {
    /// Checks cross-field rules that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analytics.investment.validate()?;
        self.analytics.demand.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl InvestmentSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_rental_yield_pct < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "default_rental_yield_pct must not be negative".to_string(),
            ));
        }
        if self.vacancy_rate < Decimal::ZERO || self.vacancy_rate >= Decimal::ONE {
            return Err(ConfigError::ValidationError(
                "vacancy_rate must be in [0, 1)".to_string(),
            ));
        }
        if self.operating_cost_pct < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "operating_cost_pct must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl DemandSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing_weight < Decimal::ZERO || self.search_weight < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "demand weights must not be negative".to_string(),
            ));
        }
        if self.listing_weight + self.search_weight != Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "demand weights must sum to 1, got {}",
                self.listing_weight + self.search_weight
            )));
        }
        if self.listing_half_saturation <= Decimal::ZERO
            || self.search_half_saturation <= Decimal::ZERO
        {
            return Err(ConfigError::ValidationError(
                "demand half-saturation constants must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut config = Config::default();
        config.analytics.demand.search_weight = dec!(0.5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn rejects_full_vacancy() {
        let mut config = Config::default();
        config.analytics.investment.vacancy_rate = Decimal::ONE;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_half_saturation() {
        let mut config = Config::default();
        config.analytics.demand.listing_half_saturation = Decimal::ZERO;
        assert!(config.validate().is_err());
    }
}
