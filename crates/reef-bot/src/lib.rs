//! reef: per-tick trading-decision engine.
//!
//! Orchestrates all components for each tick:
//! - Mid price and moving-average crossover detection
//! - Book-walking execution simulation with position-limit clipping
//! - FIFO cost-basis ledger and PnL
//! - Advisory conversion-table arbitrage scanning

pub mod config;
pub mod engine;
pub mod error;
pub mod replay;

pub use config::{AppConfig, ArbitrageConfig, InstrumentConfig, TelemetryConfig};
pub use engine::{Engine, InstrumentState, SkipCause, TickReport};
pub use error::{AppError, AppResult};
pub use replay::{load_ticks, parse_ticks};
