//! Order types emitted by the engine.

use crate::{Price, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns 1 for buy, -1 for sell (for position calculations).
    pub fn sign(&self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }

    /// Side implied by a signed quantity. Zero has no side.
    pub fn from_signed(qty: i64) -> Option<Self> {
        match qty.signum() {
            1 => Some(Self::Buy),
            -1 => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// An order for one instrument.
///
/// `quantity` is signed: positive buys, negative sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: i64,
}

impl Order {
    pub fn new(symbol: Symbol, price: Price, quantity: i64) -> Self {
        Self {
            symbol,
            price,
            quantity,
        }
    }

    /// Side of the order, `None` for a zero quantity.
    pub fn side(&self) -> Option<OrderSide> {
        OrderSide::from_signed(self.quantity)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order({}, {}, {})", self.symbol, self.price, self.quantity)
    }
}
