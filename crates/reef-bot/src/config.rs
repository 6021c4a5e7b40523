//! Application configuration.

use crate::error::{AppError, AppResult};
use reef_arb::{ArbitrageScanner, ConversionGraph, ConversionPathSearch, Currency};
use reef_core::Symbol;
use reef_detector::SignalConfig;
use reef_executor::ClipSizer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "REEF_CONFIG";

/// Config file used when neither the CLI nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/reef.toml";

/// Per-instrument trading parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Absolute position limit. Default: 50.
    #[serde(default = "default_position_limit")]
    pub position_limit: i64,
    /// Short MA window (ticks). Default: 5.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Long MA window (ticks). Default: 20.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    /// Required distance of mid from the long MA (fraction). Default: 0.02.
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: Decimal,
    /// Largest size requested per order. Default: 10.
    #[serde(default = "default_base_clip_size")]
    pub base_clip_size: u64,
}

fn default_position_limit() -> i64 {
    50
}

fn default_short_window() -> usize {
    5
}

fn default_long_window() -> usize {
    20
}

fn default_deviation_threshold() -> Decimal {
    Decimal::new(2, 2)
}

fn default_base_clip_size() -> u64 {
    10
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            position_limit: default_position_limit(),
            short_window: default_short_window(),
            long_window: default_long_window(),
            deviation_threshold: default_deviation_threshold(),
            base_clip_size: default_base_clip_size(),
        }
    }
}

impl InstrumentConfig {
    pub fn signal_config(&self) -> SignalConfig {
        SignalConfig {
            short_window: self.short_window,
            long_window: self.long_window,
            deviation_threshold: self.deviation_threshold,
        }
    }

    pub fn clip_sizer(&self) -> ClipSizer {
        ClipSizer::new(self.base_clip_size, self.position_limit)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.signal_config().validate()?;
        self.clip_sizer().validate()?;
        Ok(())
    }
}

/// Conversion-table arbitrage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageConfig {
    /// Whether the scanner runs each tick. Default: true.
    #[serde(default = "default_arbitrage_enabled")]
    pub enabled: bool,
    /// Currency names, in rate-matrix order.
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
    /// Square rate matrix: row = from, column = to.
    #[serde(default = "default_rates")]
    pub rates: Vec<Vec<Decimal>>,
    /// Minimum reported edge in percent. Default: 1.
    #[serde(default = "default_min_edge_pct")]
    pub min_edge_pct: Decimal,
    /// Start and end currency for path search. Default: SeaShells.
    #[serde(default = "default_home_currency")]
    pub home_currency: String,
    /// Intermediate hops per searched path. Default: 4.
    #[serde(default = "default_path_depth")]
    pub path_depth: usize,
}

fn default_arbitrage_enabled() -> bool {
    true
}

fn default_currencies() -> Vec<String> {
    ConversionGraph::standard()
        .currencies()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}

fn default_rates() -> Vec<Vec<Decimal>> {
    let graph = ConversionGraph::standard();
    let n = graph.len();
    (0..n)
        .map(|i| (0..n).map(|j| graph.rate_at(i, j)).collect())
        .collect()
}

fn default_min_edge_pct() -> Decimal {
    Decimal::ONE
}

fn default_home_currency() -> String {
    "SeaShells".to_string()
}

fn default_path_depth() -> usize {
    4
}

impl Default for ArbitrageConfig {
    fn default() -> Self {
        Self {
            enabled: default_arbitrage_enabled(),
            currencies: default_currencies(),
            rates: default_rates(),
            min_edge_pct: default_min_edge_pct(),
            home_currency: default_home_currency(),
            path_depth: default_path_depth(),
        }
    }
}

impl ArbitrageConfig {
    /// Build and validate the conversion graph.
    pub fn graph(&self) -> AppResult<ConversionGraph> {
        let currencies = self.currencies.iter().map(|c| Currency::new(c.as_str())).collect();
        Ok(ConversionGraph::new(currencies, self.rates.clone())?)
    }

    pub fn scanner(&self) -> AppResult<ArbitrageScanner> {
        Ok(ArbitrageScanner::new(self.graph()?).with_min_edge_pct(self.min_edge_pct)?)
    }

    pub fn path_search(&self) -> AppResult<ConversionPathSearch> {
        Ok(ConversionPathSearch::new(
            self.graph()?,
            &self.home_currency,
            self.path_depth,
        )?)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.scanner()?;
        self.path_search()?;
        Ok(())
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info,reef=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// One table per traded instrument.
    #[serde(default = "default_instruments")]
    pub instruments: BTreeMap<Symbol, InstrumentConfig>,
    #[serde(default)]
    pub arbitrage: ArbitrageConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_instruments() -> BTreeMap<Symbol, InstrumentConfig> {
    let mut instruments = BTreeMap::new();
    instruments.insert(Symbol::new("SQUID_INK"), InstrumentConfig::default());
    instruments
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            arbitrage: ArbitrageConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Config file to read.
    ///
    /// Precedence: `path` argument > `REEF_CONFIG` > `config/reef.toml`.
    /// `None` when nothing was named and the default file does not exist.
    pub fn resolve_path(path: Option<&str>) -> Option<String> {
        if let Some(path) = path {
            return Some(path.to_string());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(path);
        }
        Path::new(DEFAULT_CONFIG_PATH)
            .exists()
            .then(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load the resolved config file, or defaults when there is none.
    ///
    /// Nothing is logged here; callers usually load config before the
    /// subscriber exists.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        match Self::resolve_path(path) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Validate every section.
    pub fn validate(&self) -> AppResult<()> {
        if self.instruments.is_empty() {
            return Err(AppError::Config("no instruments configured".to_string()));
        }
        for (symbol, instrument) in &self.instruments {
            instrument
                .validate()
                .map_err(|e| AppError::Config(format!("instrument {symbol}: {e}")))?;
        }
        if self.arbitrage.enabled {
            self.arbitrage.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let ink = &config.instruments[&Symbol::new("SQUID_INK")];
        assert_eq!(ink.position_limit, 50);
        assert_eq!(ink.short_window, 5);
        assert_eq!(ink.long_window, 20);
        assert_eq!(ink.deviation_threshold, dec!(0.02));
        assert_eq!(ink.base_clip_size, 10);

        assert_eq!(config.arbitrage.min_edge_pct, dec!(1));
        assert_eq!(config.arbitrage.currencies.len(), 4);
        assert_eq!(config.arbitrage.rates[3][1], dec!(1.98));
    }

    #[test]
    fn test_parse_instrument_tables() {
        let config = AppConfig::from_toml(
            r#"
            [instruments.KELP]
            position_limit = 20
            deviation_threshold = 0.05

            [instruments.RAINFOREST_RESIN]
            base_clip_size = 4

            [arbitrage]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.instruments.len(), 2);
        let kelp = &config.instruments[&Symbol::new("KELP")];
        assert_eq!(kelp.position_limit, 20);
        assert_eq!(kelp.deviation_threshold, dec!(0.05));
        assert_eq!(kelp.short_window, 5);

        let resin = &config.instruments[&Symbol::new("RAINFOREST_RESIN")];
        assert_eq!(resin.base_clip_size, 4);
        assert!(!config.arbitrage.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let mut config = AppConfig::default();
        config.instruments.insert(
            Symbol::new("KELP"),
            InstrumentConfig {
                short_window: 20,
                long_window: 20,
                ..Default::default()
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("KELP"));
    }

    #[test]
    fn test_validate_rejects_zero_clip_and_negative_threshold() {
        let zero_clip = InstrumentConfig {
            base_clip_size: 0,
            ..Default::default()
        };
        assert!(zero_clip.validate().is_err());

        let negative = InstrumentConfig {
            deviation_threshold: dec!(-0.01),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let zero_window = InstrumentConfig {
            short_window: 0,
            ..Default::default()
        };
        assert!(zero_window.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_square_rates() {
        let mut config = AppConfig::default();
        config.arbitrage.rates.pop();
        assert!(matches!(config.validate(), Err(AppError::Arb(_))));

        // Disabled scanner is not validated
        config.arbitrage.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_home() {
        let mut config = AppConfig::default();
        config.arbitrage.home_currency = "Doubloons".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("SQUID_INK"));
        assert!(toml_str.contains("min_edge_pct"));

        let parsed = AppConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_instruments_rejected() {
        let mut config = AppConfig::default();
        config.instruments.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            AppConfig::resolve_path(Some("custom.toml")),
            Some("custom.toml".to_string())
        );
        assert!(matches!(
            AppConfig::load(Some("/nonexistent/custom.toml")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/nonexistent/reef.toml").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
