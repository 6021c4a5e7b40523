//! Moving-average crossover detection.
//!
//! Keeps bounded price and moving-average histories for one instrument and
//! classifies each tick as BUY, SELL or HOLD:
//! - BUY when the short MA crosses above the long MA and the mid price sits
//!   at least `deviation_threshold` below the long MA
//! - SELL when the short MA crosses below the long MA and the mid price sits
//!   at least `deviation_threshold` above the long MA

pub mod config;
pub mod detector;
pub mod error;
pub mod signal;
pub mod window;

pub use config::SignalConfig;
pub use detector::{CrossoverDetector, MovingAverages};
pub use error::{DetectorError, DetectorResult};
pub use signal::{Crossover, Signal};
pub use window::RollingWindow;
