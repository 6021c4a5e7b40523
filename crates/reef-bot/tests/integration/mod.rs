//! Integration tests for reef-bot.
//!
//! These tests drive the `Engine` across multiple ticks:
//! - Signal flow from book to order
//! - Position-limit clipping and partial fills
//! - Per-instrument isolation

pub mod common;
