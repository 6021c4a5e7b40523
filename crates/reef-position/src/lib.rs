//! Position management for reef.
//!
//! Tracks the signed position of one instrument through a FIFO lot ledger
//! and derives realized/unrealized PnL and cash from it.
//!
//! # Key Components
//!
//! - [`Lot`]: One open lot (side, entry price, quantity)
//! - [`CostBasisLedger`]: FIFO queue of lots, oldest at the front
//! - [`PositionTracker`]: Applies fills, keeps position/realized PnL/cash
//! - [`FillOutcome`]: What a single fill closed and opened
//! - [`PnlSummary`]: Reporting snapshot marked against the current book

pub mod error;
pub mod ledger;
pub mod tracker;

pub use error::{PositionError, PositionResult};
pub use ledger::{CloseResult, CostBasisLedger, Lot, LotSide};
pub use tracker::{headroom, FillOutcome, PnlSummary, PositionTracker};
