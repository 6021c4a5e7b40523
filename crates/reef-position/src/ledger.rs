//! FIFO cost-basis ledger.
//!
//! Lots are queued oldest-first. Every lot in the queue shares one side: a
//! long book of lots is closed by sells, a short book by buys. Closing
//! always drains from the front; new inventory is pushed to the back.

use std::collections::VecDeque;

use reef_core::{OrderSide, Price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Lot
// ============================================================================

/// Direction of an open lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotSide {
    Long,
    Short,
}

impl LotSide {
    /// Lot side opened by a fill on `side`.
    pub fn opened_by(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => Self::Long,
            OrderSide::Sell => Self::Short,
        }
    }

    /// Fill side that closes lots of this side.
    pub fn closing_side(&self) -> OrderSide {
        match self {
            Self::Long => OrderSide::Sell,
            Self::Short => OrderSide::Buy,
        }
    }

    pub fn sign(&self) -> i64 {
        match self {
            Self::Long => 1,
            Self::Short => -1,
        }
    }
}

/// One open lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub side: LotSide,
    /// Entry price.
    pub price: Price,
    /// Open quantity (always positive).
    pub qty: u64,
}

impl Lot {
    #[must_use]
    pub fn new(side: LotSide, price: Price, qty: u64) -> Self {
        Self { side, price, qty }
    }

    /// Quantity signed by side (long positive, short negative).
    pub fn signed_qty(&self) -> i64 {
        self.side.sign() * self.qty as i64
    }

    /// PnL realized by closing `qty` of this lot at `exit_price`.
    pub fn closing_pnl(&self, exit_price: Price, qty: u64) -> Decimal {
        let per_unit = match self.side {
            LotSide::Long => exit_price.inner() - self.price.inner(),
            LotSide::Short => self.price.inner() - exit_price.inner(),
        };
        per_unit * Decimal::from(qty)
    }
}

// ============================================================================
// CostBasisLedger
// ============================================================================

/// Result of draining lots from the front of the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseResult {
    /// Quantity actually closed. May be less than requested if the ledger emptied.
    pub closed: u64,
    /// PnL realized across all closed quantity.
    pub realized: Decimal,
}

/// FIFO queue of open lots, oldest at the front.
#[derive(Debug, Clone, Default)]
pub struct CostBasisLedger {
    lots: VecDeque<Lot>,
}

impl CostBasisLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side of the open inventory, `None` when flat.
    pub fn side(&self) -> Option<LotSide> {
        self.lots.front().map(|lot| lot.side)
    }

    /// Push a new lot to the back.
    ///
    /// Zero quantities are ignored. Callers close opposite lots first, so a
    /// lot of the other side is never pushed onto a non-empty ledger.
    pub fn open(&mut self, side: LotSide, price: Price, qty: u64) {
        if qty == 0 {
            return;
        }
        debug_assert!(self.side().map_or(true, |s| s == side));
        self.lots.push_back(Lot::new(side, price, qty));
    }

    /// Close up to `qty` from the front at `exit_price`.
    ///
    /// Fully closed lots are popped; a partially closed lot shrinks in place.
    /// Stops when `qty` is exhausted or the ledger empties.
    pub fn close(&mut self, exit_price: Price, qty: u64) -> CloseResult {
        let mut result = CloseResult::default();
        let mut remaining = qty;

        while remaining > 0 {
            let Some(front) = self.lots.front_mut() else {
                break;
            };

            let take = remaining.min(front.qty);
            result.realized += front.closing_pnl(exit_price, take);
            result.closed += take;
            remaining -= take;

            if take == front.qty {
                self.lots.pop_front();
            } else {
                front.qty -= take;
            }
        }

        result
    }

    /// Sum of lot quantities signed by side. Equals the position.
    pub fn signed_quantity(&self) -> i64 {
        self.lots.iter().map(Lot::signed_qty).sum()
    }

    /// Total open quantity regardless of side.
    pub fn open_quantity(&self) -> u64 {
        self.lots.iter().map(|lot| lot.qty).sum()
    }

    /// Volume-weighted entry price of the open lots, `None` when flat.
    pub fn average_cost(&self) -> Option<Price> {
        let qty = self.open_quantity();
        if qty == 0 {
            return None;
        }
        let cost: Decimal = self
            .lots
            .iter()
            .map(|lot| lot.price.inner() * Decimal::from(lot.qty))
            .sum();
        cost.checked_div(Decimal::from(qty)).map(Price::new)
    }

    pub fn front(&self) -> Option<&Lot> {
        self.lots.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_close_partial_lot_in_place() {
        let mut ledger = CostBasisLedger::new();
        ledger.open(LotSide::Long, Price::from(100), 10);

        let result = ledger.close(Price::from(110), 6);
        assert_eq!(result.closed, 6);
        assert_eq!(result.realized, dec!(60));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.front(), Some(&Lot::new(LotSide::Long, Price::from(100), 4)));
    }

    #[test]
    fn test_close_drains_oldest_first() {
        let mut ledger = CostBasisLedger::new();
        ledger.open(LotSide::Long, Price::from(100), 3);
        ledger.open(LotSide::Long, Price::from(104), 5);

        let result = ledger.close(Price::from(102), 4);
        // 3 @ +2 from the first lot, 1 @ -2 from the second
        assert_eq!(result.realized, dec!(4));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.front().map(|l| (l.price, l.qty)), Some((Price::from(104), 4)));
    }

    #[test]
    fn test_close_stops_when_empty() {
        let mut ledger = CostBasisLedger::new();
        ledger.open(LotSide::Long, Price::from(100), 2);

        let result = ledger.close(Price::from(99), 5);
        assert_eq!(result.closed, 2);
        assert_eq!(result.realized, dec!(-2));
        assert!(ledger.is_empty());
        assert_eq!(ledger.side(), None);
    }

    #[test]
    fn test_short_lot_pnl() {
        let mut ledger = CostBasisLedger::new();
        ledger.open(LotSide::Short, Price::from(110), 5);
        assert_eq!(ledger.signed_quantity(), -5);

        let result = ledger.close(Price::from(100), 3);
        assert_eq!(result.realized, dec!(30));
        assert_eq!(ledger.signed_quantity(), -2);
    }

    #[test]
    fn test_average_cost() {
        let mut ledger = CostBasisLedger::new();
        assert!(ledger.average_cost().is_none());

        ledger.open(LotSide::Long, Price::from(100), 1);
        ledger.open(LotSide::Long, Price::from(103), 2);
        assert_eq!(ledger.average_cost(), Some(Price::from(102)));
    }

    #[test]
    fn test_zero_quantity_ignored() {
        let mut ledger = CostBasisLedger::new();
        ledger.open(LotSide::Long, Price::from(100), 0);
        assert!(ledger.is_empty());
        assert_eq!(ledger.close(Price::from(100), 0), CloseResult::default());
    }
}
