//! Shared fixtures for integration tests.

pub mod ticks;
