//! Signal types.

use reef_core::OrderSide;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading signal for one tick. Recomputed every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Order side this signal asks for, `None` for HOLD.
    pub fn side(&self) -> Option<OrderSide> {
        match self {
            Self::Buy => Some(OrderSide::Buy),
            Self::Sell => Some(OrderSide::Sell),
            Self::Hold => None,
        }
    }

    /// Label for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// Direction of a moving-average crossover between the last two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossover {
    /// Short MA moved from at-or-below to strictly above the long MA.
    Up,
    /// Short MA moved from at-or-above to strictly below the long MA.
    Down,
    None,
}
