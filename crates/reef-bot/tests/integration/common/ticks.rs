//! Tick and config builders.

use reef_bot::{AppConfig, InstrumentConfig};
use reef_core::{OrderBook, Symbol, TradingState};
use rust_decimal::Decimal;

/// Dip, rebound spike, retrace: one BUY on the last tick at 2% deviation.
pub const BUY_SERIES: [i64; 7] = [100, 100, 100, 100, 80, 120, 95];

/// Spike, drop, rebound: one SELL on the last tick at 2% deviation.
pub const SELL_SERIES: [i64; 7] = [100, 100, 100, 100, 120, 80, 105];

/// Short windows so crossovers appear within a handful of ticks.
pub fn fast_instrument(deviation_threshold: Decimal) -> InstrumentConfig {
    InstrumentConfig {
        short_window: 2,
        long_window: 4,
        deviation_threshold,
        ..Default::default()
    }
}

/// Config trading `symbols` with `instrument`, scanner off.
pub fn config_for(symbols: &[&str], instrument: InstrumentConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.instruments = symbols
        .iter()
        .map(|s| (Symbol::new(*s), instrument.clone()))
        .collect();
    config.arbitrage.enabled = false;
    config
}

/// One-tick-wide book centred on `mid` with 20 lots each side.
pub fn book_around(mid: i64) -> OrderBook {
    OrderBook::new()
        .with_bid(mid - 1, 20)
        .with_ask(mid + 1, -20)
}

/// One tick per mid for a single symbol.
pub fn ticks_for(symbol: &str, mids: &[i64]) -> Vec<TradingState> {
    mids.iter()
        .enumerate()
        .map(|(i, mid)| TradingState::new(i as i64 * 100).with_book(symbol, book_around(*mid)))
        .collect()
}
