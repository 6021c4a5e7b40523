//! Shipped configuration file tests.

use reef_bot::{AppConfig, Engine};
use reef_core::Symbol;

const SHIPPED: &str = include_str!("../../../config/reef.toml");

/// The shipped file spells out the built-in defaults.
#[test]
fn test_shipped_config_matches_defaults() {
    let config = AppConfig::from_toml(SHIPPED).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config, AppConfig::default());
}

/// The shipped config builds an engine with the scanner and path search on.
#[test]
fn test_shipped_config_builds_engine() {
    let config = AppConfig::from_toml(SHIPPED).unwrap();
    let engine = Engine::new(&config).unwrap();

    assert!(engine.instrument(Symbol::new("SQUID_INK").as_str()).is_some());
    let paths = engine.conversion_paths(rust_decimal::Decimal::ONE).unwrap();
    assert_eq!(paths.len(), 81);
}
