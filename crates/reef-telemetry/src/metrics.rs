//! Prometheus metrics for the reef engine.
//!
//! Covers:
//! - Tick processing (processed / skipped by reason)
//! - Signal detection
//! - Simulated fills and emitted orders
//! - Position and PnL gauges
//! - Arbitrage scan results
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, register_int_counter,
    CounterVec, GaugeVec, HistogramVec, IntCounter,
};

/// Total ticks processed by the engine.
pub static TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("reef_ticks_total", "Total ticks processed").unwrap()
});

/// Instrument ticks skipped.
/// Labels: symbol, reason (no_bid/no_ask/empty/missing_book/ledger_rejected)
pub static INSTRUMENT_SKIPPED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reef_instrument_skipped_total",
        "Instrument ticks skipped without evaluation",
        &["symbol", "reason"]
    )
    .unwrap()
});

/// Signals emitted by the crossover detector.
/// Labels: symbol, signal (buy/sell/hold)
pub static SIGNALS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reef_signals_total",
        "Crossover detector signals",
        &["symbol", "signal"]
    )
    .unwrap()
});

/// Orders emitted after a simulated fill.
pub static ORDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reef_orders_total",
        "Orders emitted",
        &["symbol", "side"]
    )
    .unwrap()
});

/// Filled quantity per simulated execution.
pub static FILL_QTY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "reef_fill_qty",
        "Filled quantity per simulated execution",
        &["symbol", "side"],
        vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0]
    )
    .unwrap()
});

/// Partially filled executions (filled < requested).
pub static PARTIAL_FILLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reef_partial_fills_total",
        "Simulated executions limited by book depth",
        &["symbol"]
    )
    .unwrap()
});

/// Current position per instrument.
pub static POSITION: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("reef_position", "Current position", &["symbol"]).unwrap()
});

/// Realized PnL per instrument.
pub static REALIZED_PNL: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("reef_realized_pnl", "Realized PnL", &["symbol"]).unwrap()
});

/// Unrealized PnL per instrument.
pub static UNREALIZED_PNL: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("reef_unrealized_pnl", "Unrealized PnL", &["symbol"]).unwrap()
});

/// External position disagreed with the ledger.
pub static POSITION_DIVERGENCE_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reef_position_divergence_total",
        "External position differs from ledger position",
        &["symbol"]
    )
    .unwrap()
});

/// Arbitrage opportunities reported by the scanner.
pub static ARB_OPPORTUNITIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "reef_arb_opportunities_total",
        "Arbitrage opportunities above threshold",
        &["product"]
    )
    .unwrap()
});

/// Edge distribution of reported arbitrage opportunities (percent).
pub static ARB_EDGE_PCT: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "reef_arb_edge_pct",
        "Edge of reported arbitrage opportunities in percent",
        &["product"],
        vec![1.0, 1.5, 2.0, 3.0, 5.0, 10.0, 25.0]
    )
    .unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record a processed tick.
    pub fn tick_processed() {
        TICKS_TOTAL.inc();
    }

    /// Record an instrument tick skipped without evaluation.
    pub fn instrument_skipped(symbol: &str, reason: &str) {
        INSTRUMENT_SKIPPED_TOTAL
            .with_label_values(&[symbol, reason])
            .inc();
    }

    /// Record a detector signal.
    pub fn signal(symbol: &str, signal: &str) {
        SIGNALS_TOTAL.with_label_values(&[symbol, signal]).inc();
    }

    /// Record an emitted order and its filled quantity.
    pub fn order_emitted(symbol: &str, side: &str, filled: u64) {
        ORDERS_TOTAL.with_label_values(&[symbol, side]).inc();
        FILL_QTY
            .with_label_values(&[symbol, side])
            .observe(filled as f64);
    }

    /// Record a fill limited by book depth.
    pub fn partial_fill(symbol: &str) {
        PARTIAL_FILLS_TOTAL.with_label_values(&[symbol]).inc();
    }

    /// Update position and PnL gauges.
    pub fn pnl(symbol: &str, position: i64, realized: f64, unrealized: f64) {
        POSITION.with_label_values(&[symbol]).set(position as f64);
        REALIZED_PNL.with_label_values(&[symbol]).set(realized);
        UNREALIZED_PNL.with_label_values(&[symbol]).set(unrealized);
    }

    /// Record an external/ledger position mismatch.
    pub fn position_divergence(symbol: &str) {
        POSITION_DIVERGENCE_TOTAL
            .with_label_values(&[symbol])
            .inc();
    }

    /// Record an arbitrage opportunity.
    pub fn arb_opportunity(product: &str, edge_pct: f64) {
        ARB_OPPORTUNITIES_TOTAL.with_label_values(&[product]).inc();
        ARB_EDGE_PCT.with_label_values(&[product]).observe(edge_pct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let before = SIGNALS_TOTAL.with_label_values(&["TEST", "buy"]).get();
        Metrics::signal("TEST", "buy");
        let after = SIGNALS_TOTAL.with_label_values(&["TEST", "buy"]).get();
        assert_eq!(after - before, 1.0);
    }

    #[test]
    fn test_pnl_gauges() {
        Metrics::pnl("GAUGE_TEST", -4, 60.0, -2.5);
        assert_eq!(POSITION.with_label_values(&["GAUGE_TEST"]).get(), -4.0);
        assert_eq!(REALIZED_PNL.with_label_values(&["GAUGE_TEST"]).get(), 60.0);
        assert_eq!(UNREALIZED_PNL.with_label_values(&["GAUGE_TEST"]).get(), -2.5);
    }
}
