//! Detector configuration.

use crate::error::{DetectorError, DetectorResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for crossover detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Short moving-average window (ticks).
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Long moving-average window (ticks). Also the history capacity.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    /// Required distance of mid from the long MA, as a fraction (0.02 = 2%).
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: Decimal,
}

fn default_short_window() -> usize {
    5
}

fn default_long_window() -> usize {
    20
}

fn default_deviation_threshold() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
            deviation_threshold: default_deviation_threshold(),
        }
    }
}

impl SignalConfig {
    /// Validate configuration values.
    ///
    /// Returns Err if:
    /// - short_window is zero
    /// - short_window >= long_window
    /// - deviation_threshold is negative or >= 1
    pub fn validate(&self) -> DetectorResult<()> {
        if self.short_window == 0 {
            return Err(DetectorError::ConfigError(
                "short_window must be positive".to_string(),
            ));
        }

        if self.short_window >= self.long_window {
            return Err(DetectorError::ConfigError(format!(
                "short_window ({}) must be less than long_window ({})",
                self.short_window, self.long_window
            )));
        }

        if self.deviation_threshold.is_sign_negative() || self.deviation_threshold >= Decimal::ONE
        {
            return Err(DetectorError::ConfigError(format!(
                "deviation_threshold ({}) must be in [0, 1)",
                self.deviation_threshold
            )));
        }

        Ok(())
    }

    /// Multiplier applied to the long MA to confirm a BUY.
    /// Buy when: mid < long_ma * (1 - threshold)
    pub fn buy_threshold(&self) -> Decimal {
        Decimal::ONE - self.deviation_threshold
    }

    /// Multiplier applied to the long MA to confirm a SELL.
    /// Sell when: mid > long_ma * (1 + threshold)
    pub fn sell_threshold(&self) -> Decimal {
        Decimal::ONE + self.deviation_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = SignalConfig::default();
        assert_eq!(config.short_window, 5);
        assert_eq!(config.long_window, 20);
        assert_eq!(config.deviation_threshold, dec!(0.02));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_thresholds() {
        let config = SignalConfig::default();
        assert_eq!(config.buy_threshold(), dec!(0.98));
        assert_eq!(config.sell_threshold(), dec!(1.02));
    }

    #[test]
    fn test_validate_short_not_below_long() {
        let config = SignalConfig {
            short_window: 20,
            long_window: 20,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be less than"));
    }

    #[test]
    fn test_validate_zero_short() {
        let config = SignalConfig {
            short_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_threshold_range() {
        let negative = SignalConfig {
            deviation_threshold: dec!(-0.01),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let too_large = SignalConfig {
            deviation_threshold: dec!(1),
            ..Default::default()
        };
        assert!(too_large.validate().is_err());

        let zero = SignalConfig {
            deviation_threshold: dec!(0),
            ..Default::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SignalConfig = toml::from_str("short_window = 3").unwrap();
        assert_eq!(config.short_window, 3);
        assert_eq!(config.long_window, 20);
        assert_eq!(config.deviation_threshold, dec!(0.02));
    }
}
