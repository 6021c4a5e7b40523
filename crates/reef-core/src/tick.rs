//! Per-tick input and output records.
//!
//! `TradingState` is what the driver hands the engine each tick;
//! `TickOutput` is what it gets back.

use crate::{Order, OrderBook, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Market snapshot for one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradingState {
    /// Exchange timestamp of the tick.
    #[serde(default)]
    pub timestamp: i64,
    /// One book per instrument.
    #[serde(default)]
    pub order_depths: BTreeMap<Symbol, OrderBook>,
    /// Current external position per instrument.
    #[serde(default, alias = "position")]
    pub positions: BTreeMap<Symbol, i64>,
    /// Opaque carry-over from the previous tick.
    #[serde(default, alias = "traderData")]
    pub trader_data: String,
}

impl TradingState {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// Add an instrument book (builder style).
    pub fn with_book(mut self, symbol: impl Into<Symbol>, book: OrderBook) -> Self {
        self.order_depths.insert(symbol.into(), book);
        self
    }

    /// Set an external position (builder style).
    pub fn with_position(mut self, symbol: impl Into<Symbol>, position: i64) -> Self {
        self.positions.insert(symbol.into(), position);
        self
    }

    /// External position for an instrument, if the driver reported one.
    pub fn position(&self, symbol: &Symbol) -> Option<i64> {
        self.positions.get(symbol).copied()
    }
}

/// Engine result for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Orders per instrument, in emission order.
    pub orders: BTreeMap<Symbol, Vec<Order>>,
    /// Conversion requests (always 0 for this engine).
    pub conversions: i64,
    /// Carry-over payload for the next tick (always empty).
    pub trader_data: String,
}

impl TickOutput {
    /// Total number of orders across all instruments.
    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }

    /// Orders for one instrument (empty slice if none).
    pub fn orders_for(&self, symbol: &str) -> &[Order] {
        self.orders.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Price;

    #[test]
    fn test_trading_state_builder() {
        let state = TradingState::new(1000)
            .with_book("KELP", OrderBook::new().with_bid(1500, 10).with_ask(1505, -8))
            .with_position("KELP", 3);

        let kelp = Symbol::new("KELP");
        assert_eq!(state.position(&kelp), Some(3));
        assert_eq!(state.position(&Symbol::new("RESIN")), None);
        assert!(state.order_depths.contains_key(&kelp));
    }

    #[test]
    fn test_tick_output_counts() {
        let mut out = TickOutput::default();
        out.orders.insert(
            Symbol::new("KELP"),
            vec![Order::new(Symbol::new("KELP"), Price::from(1505), 2)],
        );
        out.orders.insert(Symbol::new("RESIN"), Vec::new());

        assert_eq!(out.order_count(), 1);
        assert_eq!(out.orders_for("KELP").len(), 1);
        assert!(out.orders_for("MISSING").is_empty());
    }

    #[test]
    fn test_deserialize_state() {
        let json = r#"{
            "timestamp": 1001,
            "order_depths": {
                "KELP": {"buy_orders": {"1502": 8}, "sell_orders": {"1504": -7}}
            },
            "position": {"KELP": -2}
        }"#;
        let state: TradingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.timestamp, 1001);
        assert_eq!(state.position(&Symbol::new("KELP")), Some(-2));
        assert!(state.trader_data.is_empty());
    }
}
