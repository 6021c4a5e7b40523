//! Order book snapshot for one instrument at one tick.
//!
//! Holds both price ladders as price→quantity maps. The exchange convention
//! stores ask quantities as negative numbers; the book accepts either sign
//! and treats the magnitude as available quantity.
//!
//! No ordering between the two sides is enforced: a crossed book is legal
//! input and still produces a mid price.

use crate::error::{CoreError, Result};
use crate::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Book state used to decide whether a tick can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookState {
    /// Both sides present, best bid below best ask.
    Valid,
    /// Both sides present, best bid at or above best ask.
    Crossed,
    /// No bid side.
    NoBid,
    /// No ask side.
    NoAsk,
    /// Both sides missing.
    Empty,
}

impl BookState {
    /// Check if this state has a quote on both sides.
    pub fn is_quotable(&self) -> bool {
        matches!(self, Self::Valid | Self::Crossed)
    }

    /// Short label used for logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Crossed => "crossed",
            Self::NoBid => "no_bid",
            Self::NoAsk => "no_ask",
            Self::Empty => "empty",
        }
    }
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::Crossed => write!(f, "CROSSED"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
        }
    }
}

/// Resting liquidity for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Bid ladder: price -> quantity.
    #[serde(default, alias = "buy_orders")]
    pub bids: BTreeMap<Price, i64>,
    /// Ask ladder: price -> quantity (sign ignored).
    #[serde(default, alias = "sell_orders")]
    pub asks: BTreeMap<Price, i64>,
}

impl OrderBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bid level (builder style).
    pub fn with_bid(mut self, price: impl Into<Price>, qty: i64) -> Self {
        self.bids.insert(price.into(), qty);
        self
    }

    /// Add an ask level (builder style).
    pub fn with_ask(mut self, price: impl Into<Price>, qty: i64) -> Self {
        self.asks.insert(price.into(), qty);
        self
    }

    /// Bid levels with liquidity, best (highest) price first.
    pub fn bid_levels(&self) -> impl Iterator<Item = (Price, u64)> + '_ {
        self.bids
            .iter()
            .rev()
            .map(|(p, q)| (*p, q.unsigned_abs()))
            .filter(|(_, q)| *q > 0)
    }

    /// Ask levels with liquidity, best (lowest) price first.
    pub fn ask_levels(&self) -> impl Iterator<Item = (Price, u64)> + '_ {
        self.asks
            .iter()
            .map(|(p, q)| (*p, q.unsigned_abs()))
            .filter(|(_, q)| *q > 0)
    }

    /// Highest bid price with liquidity.
    pub fn best_bid(&self) -> Option<Price> {
        self.bid_levels().next().map(|(p, _)| p)
    }

    /// Lowest ask price with liquidity.
    pub fn best_ask(&self) -> Option<Price> {
        self.ask_levels().next().map(|(p, _)| p)
    }

    /// Total quantity resting on the bid side.
    pub fn bid_depth(&self) -> u64 {
        self.bid_levels().map(|(_, q)| q).sum()
    }

    /// Total quantity resting on the ask side.
    pub fn ask_depth(&self) -> u64 {
        self.ask_levels().map(|(_, q)| q).sum()
    }

    /// Classify the book.
    pub fn state(&self) -> BookState {
        match (self.best_bid(), self.best_ask()) {
            (None, None) => BookState::Empty,
            (Some(_), None) => BookState::NoAsk,
            (None, Some(_)) => BookState::NoBid,
            (Some(bid), Some(ask)) => {
                if bid < ask {
                    BookState::Valid
                } else {
                    BookState::Crossed
                }
            }
        }
    }

    /// Fair-value estimate: (best_bid + best_ask) / 2.
    ///
    /// Returns `CoreError::NoQuote` if either side is empty. Callers treat
    /// that as "no signal this tick" and must not touch any history.
    pub fn mid_price(&self) -> Result<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Ok(Price::new((bid.inner() + ask.inner()) / Decimal::TWO)),
            _ => Err(CoreError::NoQuote(self.state())),
        }
    }

    /// Spread: best_ask - best_bid. Negative for a crossed book.
    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}
