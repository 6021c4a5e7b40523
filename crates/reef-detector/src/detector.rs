//! Crossover detector implementation.
//!
//! Strategy: trade the turn of a cycle.
//! - Buy: short MA crosses above long MA and mid < long_ma * (1 - threshold)
//! - Sell: short MA crosses below long MA and mid > long_ma * (1 + threshold)
//!
//! The long MA doubles as the fair-value estimate. Only the last two MA
//! samples are ever compared: current vs. the immediately preceding pair.

use crate::config::SignalConfig;
use crate::error::DetectorResult;
use crate::signal::{Crossover, Signal};
use crate::window::RollingWindow;
use reef_core::Price;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Moving averages computed for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverages {
    pub short: Decimal,
    pub long: Decimal,
}

/// Stateful crossover detector for a single instrument.
///
/// All three histories hold at most `long_window` samples and stay aligned
/// in time: one entry per accepted mid price.
#[derive(Debug, Clone)]
pub struct CrossoverDetector {
    config: SignalConfig,
    prices: RollingWindow<Decimal>,
    short_ma: RollingWindow<Decimal>,
    long_ma: RollingWindow<Decimal>,
}

impl CrossoverDetector {
    /// Create a detector. Fails if the configuration is invalid.
    pub fn new(config: SignalConfig) -> DetectorResult<Self> {
        config.validate()?;
        let capacity = config.long_window;
        Ok(Self {
            config,
            prices: RollingWindow::new(capacity),
            short_ma: RollingWindow::new(capacity),
            long_ma: RollingWindow::new(capacity),
        })
    }

    /// Feed a mid price and classify the tick.
    pub fn observe(&mut self, mid: Price) -> Signal {
        self.update(mid);
        self.detect(mid)
    }

    /// Append a mid price and the moving averages derived from it.
    ///
    /// Until a window has filled, its MA is bootstrapped with the raw price.
    pub fn update(&mut self, mid: Price) -> MovingAverages {
        let price = mid.inner();
        self.prices.push(price);

        let short = self.mean_of_last(self.config.short_window).unwrap_or(price);
        let long = self.mean_of_last(self.config.long_window).unwrap_or(price);

        self.short_ma.push(short);
        self.long_ma.push(long);

        debug!(
            mid = %price,
            short_ma = %short,
            long_ma = %long,
            samples = self.prices.len(),
            "Moving averages updated"
        );

        MovingAverages { short, long }
    }

    /// Mean of the last `n` prices, `None` until `n` prices exist.
    fn mean_of_last(&self, n: usize) -> Option<Decimal> {
        if n == 0 || self.prices.len() < n {
            return None;
        }
        let sum: Decimal = self.prices.tail(n).copied().sum();
        Some(sum / Decimal::from(n))
    }

    /// Classify the last two MA samples.
    pub fn crossover(&self) -> Crossover {
        let (Some(cs), Some(ps), Some(cl), Some(pl)) = (
            self.short_ma.latest(),
            self.short_ma.previous(),
            self.long_ma.latest(),
            self.long_ma.previous(),
        ) else {
            return Crossover::None;
        };

        if ps <= pl && cs > cl {
            Crossover::Up
        } else if ps >= pl && cs < cl {
            Crossover::Down
        } else {
            Crossover::None
        }
    }

    /// Detect a signal for the current tick without mutating history.
    ///
    /// Requires at least two samples in both MA histories.
    pub fn detect(&self, mid: Price) -> Signal {
        let Some(fair_value) = self.fair_value() else {
            return Signal::Hold;
        };
        let mid = mid.inner();
        let fair = fair_value.inner();

        match self.crossover() {
            Crossover::Up => {
                let limit = fair * self.config.buy_threshold();
                if mid < limit {
                    info!(
                        mid = %mid,
                        fair_value = %fair,
                        limit = %limit,
                        "BUY: short MA crossed above long MA below fair value"
                    );
                    Signal::Buy
                } else {
                    debug!(mid = %mid, limit = %limit, "Upward crossover not confirmed by deviation");
                    Signal::Hold
                }
            }
            Crossover::Down => {
                let limit = fair * self.config.sell_threshold();
                if mid > limit {
                    info!(
                        mid = %mid,
                        fair_value = %fair,
                        limit = %limit,
                        "SELL: short MA crossed below long MA above fair value"
                    );
                    Signal::Sell
                } else {
                    debug!(mid = %mid, limit = %limit, "Downward crossover not confirmed by deviation");
                    Signal::Hold
                }
            }
            Crossover::None => Signal::Hold,
        }
    }

    /// Current fair-value estimate (latest long MA).
    ///
    /// `None` until two samples exist in both MA histories.
    pub fn fair_value(&self) -> Option<Price> {
        if self.short_ma.len() < 2 || self.long_ma.len() < 2 {
            return None;
        }
        self.long_ma.latest().copied().map(Price::new)
    }

    /// Latest moving averages, if any sample has been taken.
    pub fn latest_averages(&self) -> Option<MovingAverages> {
        Some(MovingAverages {
            short: *self.short_ma.latest()?,
            long: *self.long_ma.latest()?,
        })
    }

    pub fn price_history(&self) -> &RollingWindow<Decimal> {
        &self.prices
    }

    pub fn short_ma_history(&self) -> &RollingWindow<Decimal> {
        &self.short_ma
    }

    pub fn long_ma_history(&self) -> &RollingWindow<Decimal> {
        &self.long_ma
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }
}
