//! Position tracking for a single instrument.
//!
//! `PositionTracker` owns the lot ledger and the running scalars derived from
//! it. A fill is applied in one step: close opposite lots FIFO, open the
//! remainder as new lots, then move position and cash. The signed lot sum
//! equals the position after every fill.

use reef_core::{OrderBook, OrderSide, Price};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{PositionError, PositionResult};
use crate::ledger::{CostBasisLedger, LotSide};

/// What a single fill did to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    pub side: OrderSide,
    pub price: Price,
    /// Absolute filled quantity.
    pub quantity: u64,
    /// Quantity that closed existing lots.
    pub closed: u64,
    /// Quantity that opened new lots.
    pub opened: u64,
    /// PnL realized by this fill.
    pub realized_pnl: Decimal,
    /// Position after the fill.
    pub position: i64,
}

/// Reporting snapshot of one instrument's position and PnL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PnlSummary {
    pub position: i64,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub total_pnl: Decimal,
    pub cash: Decimal,
    pub open_lots: usize,
}

/// Position, realized PnL and cash for one instrument.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    ledger: CostBasisLedger,
    position: i64,
    realized_pnl: Decimal,
    cash: Decimal,
    /// Absolute position limit. `None` means unbounded.
    limit: Option<i64>,
}

impl PositionTracker {
    /// Create an unbounded tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker that rejects fills taking |position| above `limit`.
    pub fn with_limit(limit: i64) -> Self {
        Self {
            limit: Some(limit.abs()),
            ..Self::default()
        }
    }

    /// Apply a fill of `signed_qty` (positive buy, negative sell) at `price`.
    ///
    /// Rejected fills leave the tracker unchanged.
    pub fn apply_fill(&mut self, price: Price, signed_qty: i64) -> PositionResult<FillOutcome> {
        let Some(side) = OrderSide::from_signed(signed_qty) else {
            return Err(PositionError::InvalidFill("zero quantity".to_string()));
        };
        if !price.is_positive() {
            return Err(PositionError::InvalidFill(format!(
                "non-positive price {}",
                price
            )));
        }

        let new_position = self
            .position
            .checked_add(signed_qty)
            .ok_or_else(|| PositionError::InvalidFill("position overflow".to_string()))?;
        if let Some(limit) = self.limit {
            if new_position.abs() > limit {
                return Err(PositionError::LimitExceeded(format!(
                    "fill {} would move position {} -> {} beyond limit {}",
                    signed_qty, self.position, new_position, limit
                )));
            }
        }

        let quantity = signed_qty.unsigned_abs();

        // Close opposite inventory first, remainder opens on the fill's side
        let close = match self.ledger.side() {
            Some(lot_side) if lot_side.closing_side() == side => self.ledger.close(price, quantity),
            _ => Default::default(),
        };
        let opened = quantity - close.closed;
        self.ledger.open(LotSide::opened_by(side), price, opened);

        let notional = price.notional(signed_qty);
        self.cash -= notional;
        self.realized_pnl += close.realized;
        self.position = new_position;

        debug_assert_eq!(self.ledger.signed_quantity(), self.position);

        trace!(
            side = %side,
            price = %price,
            quantity,
            closed = close.closed,
            opened,
            "Fill applied to ledger"
        );
        if !close.realized.is_zero() {
            debug!(
                realized = %close.realized,
                total_realized = %self.realized_pnl,
                position = self.position,
                "PnL realized"
            );
        }

        Ok(FillOutcome {
            side,
            price,
            quantity,
            closed: close.closed,
            opened,
            realized_pnl: close.realized,
            position: self.position,
        })
    }

    /// Unrealized PnL marked against the book.
    ///
    /// Longs mark at best bid, shorts at best ask, against the average cost
    /// of the open lots. Zero when flat or when either side of the book is
    /// empty.
    pub fn unrealized_pnl(&self, book: &OrderBook) -> Decimal {
        if self.position == 0 || !book.state().is_quotable() {
            return Decimal::ZERO;
        }
        let mark = if self.position > 0 {
            book.best_bid()
        } else {
            book.best_ask()
        };
        match (mark, self.ledger.average_cost()) {
            (Some(mark), Some(avg)) => (mark - avg).notional(self.position),
            _ => Decimal::ZERO,
        }
    }

    /// Snapshot for reporting.
    pub fn summary(&self, book: &OrderBook) -> PnlSummary {
        let unrealized = self.unrealized_pnl(book);
        PnlSummary {
            position: self.position,
            realized_pnl: self.realized_pnl,
            unrealized_pnl: unrealized,
            total_pnl: self.realized_pnl + unrealized,
            cash: self.cash,
            open_lots: self.ledger.len(),
        }
    }

    /// Difference between an externally reported position and the ledger.
    ///
    /// `None` when they agree. The ledger is never adjusted.
    pub fn divergence(&self, external: i64) -> Option<i64> {
        let diff = external - self.position;
        (diff != 0).then_some(diff)
    }

    /// Remaining quantity tradeable on `side` before `limit` is reached.
    pub fn headroom(&self, side: OrderSide, limit: i64) -> u64 {
        headroom(self.position, side, limit)
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn ledger(&self) -> &CostBasisLedger {
        &self.ledger
    }
}

/// Headroom for `side` at `position`: BUY = limit - position,
/// SELL = limit + position. Never negative.
pub fn headroom(position: i64, side: OrderSide, limit: i64) -> u64 {
    let room = match side {
        OrderSide::Buy => limit.saturating_sub(position),
        OrderSide::Sell => limit.saturating_add(position),
    };
    room.max(0) as u64
}
