//! Order generation: signal -> clip -> simulated fill -> ledger -> order.

use reef_core::{Order, OrderBook, OrderSide, Symbol};
use reef_detector::Signal;
use reef_position::{headroom, FillOutcome, PositionTracker};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExecutorError, ExecutorResult};
use crate::simulator::{ExecutionSimulator, SimulatedFill};

// ============================================================================
// ClipSizer
// ============================================================================

/// Order size bounds for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSizer {
    /// Largest size requested per order.
    #[serde(default = "default_base_clip_size")]
    pub base_clip_size: u64,
    /// Absolute position limit.
    #[serde(default = "default_position_limit")]
    pub position_limit: i64,
}

fn default_base_clip_size() -> u64 {
    10
}

fn default_position_limit() -> i64 {
    50
}

impl Default for ClipSizer {
    fn default() -> Self {
        Self {
            base_clip_size: default_base_clip_size(),
            position_limit: default_position_limit(),
        }
    }
}

impl ClipSizer {
    pub fn new(base_clip_size: u64, position_limit: i64) -> Self {
        Self {
            base_clip_size,
            position_limit,
        }
    }

    /// Validate sizing values.
    ///
    /// Returns Err if base_clip_size is zero or position_limit is not positive.
    pub fn validate(&self) -> ExecutorResult<()> {
        if self.base_clip_size == 0 {
            return Err(ExecutorError::ConfigError(
                "base_clip_size must be positive".to_string(),
            ));
        }
        if self.position_limit <= 0 {
            return Err(ExecutorError::ConfigError(format!(
                "position_limit ({}) must be positive",
                self.position_limit
            )));
        }
        Ok(())
    }

    /// Clip for `side` at `position`: min(base clip, headroom).
    pub fn clip(&self, position: i64, side: OrderSide) -> u64 {
        self.base_clip_size
            .min(headroom(position, side, self.position_limit))
    }
}

// ============================================================================
// OrderGenerator
// ============================================================================

/// Why no order was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Signal was HOLD.
    Hold,
    /// Position already at the limit on the signaled side.
    NoHeadroom,
    /// Nothing resting on the side the order would consume.
    NoLiquidity,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::NoHeadroom => "no_headroom",
            Self::NoLiquidity => "no_liquidity",
        }
    }
}

/// Result of one `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// One order emitted and applied to the ledger.
    Emitted {
        order: Order,
        fill: SimulatedFill,
        outcome: FillOutcome,
    },
    /// No order this tick (not an error).
    Skipped { reason: SkipReason },
}

impl GenerateOutcome {
    fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Emitted { order, .. } => Some(order),
            Self::Skipped { .. } => None,
        }
    }

    pub fn is_emitted(&self) -> bool {
        matches!(self, Self::Emitted { .. })
    }
}

/// Produces at most one order per instrument per tick.
#[derive(Debug, Clone, Default)]
pub struct OrderGenerator {
    sizer: ClipSizer,
    simulator: ExecutionSimulator,
}

impl OrderGenerator {
    /// Create a generator. Fails if the sizer is invalid.
    pub fn new(sizer: ClipSizer) -> ExecutorResult<Self> {
        sizer.validate()?;
        Ok(Self {
            sizer,
            simulator: ExecutionSimulator::new(),
        })
    }

    /// Turn `signal` into at most one order.
    ///
    /// `position` is the position headroom is measured from. The fill is
    /// applied to `tracker` before the order is returned.
    pub fn generate(
        &self,
        symbol: &Symbol,
        signal: Signal,
        book: &OrderBook,
        position: i64,
        tracker: &mut PositionTracker,
    ) -> ExecutorResult<GenerateOutcome> {
        // Gate 1: HOLD
        let Some(side) = signal.side() else {
            return Ok(GenerateOutcome::skipped(SkipReason::Hold));
        };

        // Gate 2: headroom
        let clip = self.sizer.clip(position, side);
        if clip == 0 {
            debug!(
                symbol = %symbol,
                side = %side,
                position,
                limit = self.sizer.position_limit,
                "Signal skipped: no headroom"
            );
            return Ok(GenerateOutcome::skipped(SkipReason::NoHeadroom));
        }

        // Gate 3: liquidity
        let fill = self.simulator.simulate(book, side, clip);
        if fill.is_empty() {
            debug!(symbol = %symbol, side = %side, clip, "Signal skipped: no liquidity");
            return Ok(GenerateOutcome::skipped(SkipReason::NoLiquidity));
        }

        let outcome = tracker.apply_fill(fill.price, fill.filled)?;
        let order = Order::new(symbol.clone(), fill.price, fill.filled);

        info!(
            symbol = %symbol,
            side = %side,
            price = %fill.price,
            filled = fill.filled,
            requested = fill.requested,
            levels = fill.levels.len(),
            realized = %outcome.realized_pnl,
            position = outcome.position,
            "Order generated"
        );

        Ok(GenerateOutcome::Emitted {
            order,
            fill,
            outcome,
        })
    }

    pub fn sizer(&self) -> &ClipSizer {
        &self.sizer
    }
}
