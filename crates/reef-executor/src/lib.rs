//! Simulated execution and order generation for reef.
//!
//! Turns a detector signal into at most one order per instrument per tick.
//!
//! # Key Components
//!
//! - [`ExecutionSimulator`]: Walks one side of the book best-price-first
//! - [`SimulatedFill`]: VWAP, signed filled quantity and consumed levels
//! - [`ClipSizer`]: Order size bounded by base clip and position-limit headroom
//! - [`OrderGenerator`]: Signal -> clip -> simulated fill -> ledger -> order
//!
//! # Gates (in `OrderGenerator::generate`)
//!
//! 1. HOLD -> Skipped::Hold
//! 2. Zero headroom -> Skipped::NoHeadroom
//! 3. Zero fill -> Skipped::NoLiquidity
//! 4. (all passed) -> apply fill to ledger + emit order

pub mod error;
pub mod generator;
pub mod simulator;

pub use error::{ExecutorError, ExecutorResult};
pub use generator::{ClipSizer, GenerateOutcome, OrderGenerator, SkipReason};
pub use simulator::{ExecutionSimulator, SimulatedFill};
