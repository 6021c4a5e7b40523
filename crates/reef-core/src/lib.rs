//! Core domain types for the reef tick engine.
//!
//! This crate provides the fundamental types used throughout the engine:
//! - `Symbol`: Instrument identifier
//! - `Price`: Precision-safe price type
//! - `OrderBook`, `BookState`: Resting liquidity snapshot for one tick
//! - `Order`, `OrderSide`: Orders emitted by the engine
//! - `TradingState`, `TickOutput`: Per-tick input and output records

pub mod book;
pub mod decimal;
pub mod error;
pub mod order;
pub mod symbol;
pub mod tick;

pub use book::{BookState, OrderBook};
pub use decimal::Price;
pub use error::{CoreError, Result};
pub use order::{Order, OrderSide};
pub use symbol::Symbol;
pub use tick::{TickOutput, TradingState};
