//! Book-walking execution simulator.
//!
//! A buy consumes the ask side ascending, a sell consumes the bid side
//! descending. Levels are taken greedily, best price first, until the
//! requested size is filled or liquidity runs out.

use reef_core::{OrderBook, OrderSide, Price};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

/// Result of walking the book for one requested size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedFill {
    pub side: OrderSide,
    /// Volume-weighted average fill price. Zero when nothing filled.
    pub price: Price,
    /// Signed filled quantity (positive buy, negative sell).
    pub filled: i64,
    /// Requested size.
    pub requested: u64,
    /// Quantity consumed per price level, in consumption order.
    pub levels: Vec<(Price, u64)>,
}

impl SimulatedFill {
    fn empty(side: OrderSide, requested: u64) -> Self {
        Self {
            side,
            price: Price::ZERO,
            filled: 0,
            requested,
            levels: Vec::new(),
        }
    }

    /// Nothing filled. Must not be turned into an order.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Filled less than requested.
    pub fn is_partial(&self) -> bool {
        self.filled_qty() < self.requested
    }

    /// Absolute filled quantity.
    pub fn filled_qty(&self) -> u64 {
        self.filled.unsigned_abs()
    }

    /// Price distance between the first and last consumed level.
    pub fn slippage(&self) -> Option<Price> {
        let (first, _) = self.levels.first()?;
        let (last, _) = self.levels.last()?;
        Some(*last - *first)
    }
}

/// Stateless execution simulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionSimulator;

impl ExecutionSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Fill up to `size` against the side of `book` that `side` consumes.
    pub fn simulate(&self, book: &OrderBook, side: OrderSide, size: u64) -> SimulatedFill {
        match side {
            OrderSide::Buy => Self::walk(side, book.ask_levels(), size),
            OrderSide::Sell => Self::walk(side, book.bid_levels(), size),
        }
    }

    fn walk(
        side: OrderSide,
        levels: impl Iterator<Item = (Price, u64)>,
        size: u64,
    ) -> SimulatedFill {
        let mut fill = SimulatedFill::empty(side, size);
        let mut remaining = size;
        let mut filled: u64 = 0;
        let mut cost = Decimal::ZERO;

        for (price, available) in levels {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(available);
            cost += price.inner() * Decimal::from(take);
            filled += take;
            remaining -= take;
            fill.levels.push((price, take));
            trace!(side = %side, price = %price, take, remaining, "Level consumed");
        }

        let Some(vwap) = cost.checked_div(Decimal::from(filled)) else {
            return fill;
        };
        fill.price = Price::new(vwap);
        fill.filled = side.sign() * filled as i64;
        fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ladder() -> OrderBook {
        OrderBook::new()
            .with_bid(10000, 3)
            .with_bid(9999, 5)
            .with_ask(10002, -4)
            .with_ask(10003, -2)
    }

    #[test]
    fn test_buy_walks_asks_ascending() {
        let fill = ExecutionSimulator::new().simulate(&ladder(), OrderSide::Buy, 5);

        assert_eq!(fill.filled, 5);
        assert_eq!(fill.price, Price::new(dec!(10002.2)));
        assert_eq!(
            fill.levels,
            vec![(Price::from(10002), 4), (Price::from(10003), 1)]
        );
        assert!(!fill.is_partial());
        assert_eq!(fill.slippage(), Some(Price::from(1)));
    }

    #[test]
    fn test_buy_partial_when_depth_short() {
        let fill = ExecutionSimulator::new().simulate(&ladder(), OrderSide::Buy, 10);

        assert_eq!(fill.filled, 6);
        assert_eq!(fill.requested, 10);
        assert!(fill.is_partial());
        // (4 * 10002 + 2 * 10003) / 6
        assert_eq!(fill.price.inner().round_dp(4), dec!(10002.3333));
    }

    #[test]
    fn test_sell_walks_bids_descending() {
        let fill = ExecutionSimulator::new().simulate(&ladder(), OrderSide::Sell, 4);

        assert_eq!(fill.filled, -4);
        assert_eq!(fill.price, Price::new(dec!(9999.75)));
        assert_eq!(fill.levels[0], (Price::from(10000), 3));
    }

    #[test]
    fn test_no_liquidity_is_degenerate() {
        let book = OrderBook::new().with_bid(100, 5);
        let fill = ExecutionSimulator::new().simulate(&book, OrderSide::Buy, 3);

        assert!(fill.is_empty());
        assert_eq!(fill.price, Price::ZERO);
        assert!(fill.levels.is_empty());
        assert!(fill.slippage().is_none());
    }

    #[test]
    fn test_zero_size_fills_nothing() {
        let fill = ExecutionSimulator::new().simulate(&ladder(), OrderSide::Buy, 0);
        assert!(fill.is_empty());
        assert_eq!(fill.price, Price::ZERO);
    }
}
