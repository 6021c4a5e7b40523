//! Tick file loading for replay.

use reef_core::TradingState;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Read a JSON array of ticks from disk.
pub fn load_ticks(path: &str) -> AppResult<Vec<TradingState>> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_string(),
        source,
    })?;
    let ticks = parse_ticks(&content)?;
    debug!(path, ticks = ticks.len(), "Tick file parsed");
    Ok(ticks)
}

/// Parse a JSON array of ticks in the exchange layout.
pub fn parse_ticks(content: &str) -> AppResult<Vec<TradingState>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ticks_load() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/sample_ticks.json");
        let ticks = load_ticks(path).unwrap();
        assert_eq!(ticks.len(), 32);
        assert!(ticks.iter().all(|t| t.order_depths.contains_key("SQUID_INK")));
    }

    #[test]
    fn test_missing_tick_file() {
        let err = load_ticks("/nonexistent/ticks.json").unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/ticks.json"));
    }

    #[test]
    fn test_malformed_ticks() {
        let err = parse_ticks(r#"{"timestamp": 0}"#).unwrap_err();
        assert!(matches!(err, AppError::TickData(_)));
    }
}
