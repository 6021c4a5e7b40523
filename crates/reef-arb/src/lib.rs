//! Cross-currency conversion arbitrage for reef.
//!
//! Pure, advisory analysis over a static conversion-rate table. Nothing here
//! places orders.
//!
//! # Key Components
//!
//! - [`ConversionGraph`]: Validated directed rate table over a small currency set
//! - [`ArbitrageScanner`]: Buy a product in one currency, sell it in another,
//!   settle back to the source currency
//! - [`ConversionPathSearch`]: Fixed-depth round trips from a home currency

pub mod currency;
pub mod error;
pub mod graph;
pub mod path;
pub mod scanner;

pub use currency::Currency;
pub use error::{ArbError, ArbResult};
pub use graph::ConversionGraph;
pub use path::{ConversionPath, ConversionPathSearch, PathSearchResult};
pub use scanner::{ArbOpportunity, ArbitrageScanner, ProductQuote};
