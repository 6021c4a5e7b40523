//! Per-tick trading engine.
//!
//! One `InstrumentState` per configured instrument, owned by the `Engine`
//! and mutated only while that instrument's tick is processed. Each tick:
//!
//! 1. Mid price from the book (one-sided books skip the instrument)
//! 2. Detector update and signal
//! 3. Clip sizing against the position limit
//! 4. Simulated fill, ledger update, at most one order
//! 5. PnL snapshot
//!
//! Failures are local to an instrument: it is skipped for the tick and the
//! remaining instruments are processed normally.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reef_arb::{ArbOpportunity, ArbitrageScanner, ConversionPathSearch, PathSearchResult};
use reef_core::{BookState, CoreError, OrderBook, Symbol, TickOutput, TradingState};
use reef_detector::{CrossoverDetector, Signal};
use reef_executor::{GenerateOutcome, OrderGenerator};
use reef_position::{PnlSummary, PositionTracker};
use reef_telemetry::Metrics;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, InstrumentConfig};
use crate::error::AppResult;

/// Why an instrument produced no evaluation this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipCause {
    /// Instrument configured but absent from the tick.
    MissingBook,
    /// One or both book sides empty.
    NoQuote(BookState),
    /// Ledger refused the simulated fill.
    LedgerRejected,
}

impl SkipCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingBook => "missing_book",
            Self::NoQuote(state) => state.as_str(),
            Self::LedgerRejected => "ledger_rejected",
        }
    }
}

/// Everything the engine keeps for one instrument.
#[derive(Debug)]
pub struct InstrumentState {
    config: InstrumentConfig,
    detector: CrossoverDetector,
    generator: OrderGenerator,
    tracker: PositionTracker,
}

impl InstrumentState {
    pub fn new(config: InstrumentConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            detector: CrossoverDetector::new(config.signal_config())?,
            generator: OrderGenerator::new(config.clip_sizer())?,
            tracker: PositionTracker::new(),
            config,
        })
    }

    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    pub fn detector(&self) -> &CrossoverDetector {
        &self.detector
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }
}

/// Full result of one tick, including diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub timestamp: i64,
    pub processed_at: DateTime<Utc>,
    pub output: TickOutput,
    pub signals: BTreeMap<Symbol, Signal>,
    pub skipped: BTreeMap<Symbol, SkipCause>,
    pub pnl: BTreeMap<Symbol, PnlSummary>,
    pub opportunities: Vec<ArbOpportunity>,
}

/// Per-tick decision engine.
#[derive(Debug)]
pub struct Engine {
    instruments: BTreeMap<Symbol, InstrumentState>,
    scanner: Option<ArbitrageScanner>,
    path_search: Option<ConversionPathSearch>,
    ticks: u64,
}

impl Engine {
    /// Build an engine from validated configuration.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let mut instruments = BTreeMap::new();
        for (symbol, instrument) in &config.instruments {
            instruments.insert(symbol.clone(), InstrumentState::new(instrument.clone())?);
        }

        let (scanner, path_search) = if config.arbitrage.enabled {
            (
                Some(config.arbitrage.scanner()?),
                Some(config.arbitrage.path_search()?),
            )
        } else {
            (None, None)
        };

        info!(
            instruments = instruments.len(),
            arbitrage = scanner.is_some(),
            "Engine initialized"
        );

        Ok(Self {
            instruments,
            scanner,
            path_search,
            ticks: 0,
        })
    }

    /// Process one tick and return the driver-facing output.
    pub fn run(&mut self, state: &TradingState) -> TickOutput {
        self.process(state).output
    }

    /// Process one tick and return the output with diagnostics.
    pub fn process(&mut self, state: &TradingState) -> TickReport {
        let mut report = TickReport {
            timestamp: state.timestamp,
            processed_at: Utc::now(),
            output: TickOutput::default(),
            signals: BTreeMap::new(),
            skipped: BTreeMap::new(),
            pnl: BTreeMap::new(),
            opportunities: Vec::new(),
        };

        for symbol in state.order_depths.keys() {
            if !self.instruments.contains_key(symbol) {
                debug!(symbol = %symbol, "Book for unconfigured instrument ignored");
            }
        }

        for (symbol, instrument) in self.instruments.iter_mut() {
            // Every configured instrument appears in the output, even without orders
            report.output.orders.insert(symbol.clone(), Vec::new());
            let Some(book) = state.order_depths.get(symbol) else {
                Self::skip(&mut report, symbol, SkipCause::MissingBook);
                continue;
            };
            let external = state.position(symbol);
            Self::process_instrument(symbol, instrument, book, external, &mut report);
        }

        if let Some(scanner) = &self.scanner {
            report.opportunities = scanner.scan_books(&state.order_depths);
            for opportunity in &report.opportunities {
                info!(
                    product = %opportunity.product,
                    source = %opportunity.source,
                    buy_in = %opportunity.buy_currency,
                    sell_in = %opportunity.sell_currency,
                    edge_pct = %opportunity.edge_pct.round_dp(4),
                    "Arbitrage opportunity"
                );
                Metrics::arb_opportunity(
                    opportunity.product.as_str(),
                    to_f64(opportunity.edge_pct),
                );
            }
        }

        self.ticks += 1;
        Metrics::tick_processed();
        debug!(
            timestamp = state.timestamp,
            orders = report.output.order_count(),
            skipped = report.skipped.len(),
            "Tick processed"
        );
        report
    }

    fn process_instrument(
        symbol: &Symbol,
        instrument: &mut InstrumentState,
        book: &OrderBook,
        external: Option<i64>,
        report: &mut TickReport,
    ) {
        // Step 1: mid price. No history is touched on a one-sided book.
        let mid = match book.mid_price() {
            Ok(mid) => mid,
            Err(CoreError::NoQuote(state)) => {
                Self::skip(report, symbol, SkipCause::NoQuote(state));
                return;
            }
        };

        // Step 2: signal
        let signal = instrument.detector.observe(mid);
        report.signals.insert(symbol.clone(), signal);
        Metrics::signal(symbol.as_str(), signal.as_str());

        // Step 3: position used for headroom
        let ledger_position = instrument.tracker.position();
        if let Some(diff) = external.and_then(|p| instrument.tracker.divergence(p)) {
            warn!(
                symbol = %symbol,
                external = ledger_position + diff,
                ledger = ledger_position,
                "External position diverges from ledger"
            );
            Metrics::position_divergence(symbol.as_str());
        }
        let position = external.unwrap_or(ledger_position);

        // Step 4: order
        match instrument
            .generator
            .generate(symbol, signal, book, position, &mut instrument.tracker)
        {
            Ok(GenerateOutcome::Emitted { order, fill, .. }) => {
                let side = fill.side.to_string();
                Metrics::order_emitted(symbol.as_str(), &side, fill.filled_qty());
                if fill.is_partial() {
                    debug!(
                        symbol = %symbol,
                        filled = fill.filled_qty(),
                        requested = fill.requested,
                        "Partial fill"
                    );
                    Metrics::partial_fill(symbol.as_str());
                }
                report
                    .output
                    .orders
                    .entry(symbol.clone())
                    .or_default()
                    .push(order);
            }
            Ok(GenerateOutcome::Skipped { reason }) => {
                if signal != Signal::Hold {
                    debug!(symbol = %symbol, signal = %signal, reason = reason.as_str(), "No order");
                }
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Fill rejected, instrument skipped this tick");
                Self::skip(report, symbol, SkipCause::LedgerRejected);
            }
        }

        // Step 5: PnL
        let summary = instrument.tracker.summary(book);
        Metrics::pnl(
            symbol.as_str(),
            summary.position,
            to_f64(summary.realized_pnl),
            to_f64(summary.unrealized_pnl),
        );
        report.pnl.insert(symbol.clone(), summary);
    }

    fn skip(report: &mut TickReport, symbol: &Symbol, cause: SkipCause) {
        warn!(symbol = %symbol, reason = cause.as_str(), "Instrument skipped this tick");
        Metrics::instrument_skipped(symbol.as_str(), cause.as_str());
        report.skipped.insert(symbol.clone(), cause);
    }

    /// Round-trip search over the conversion table from the home currency.
    pub fn conversion_paths(&self, start_amount: Decimal) -> Option<PathSearchResult> {
        self.path_search
            .as_ref()
            .map(|search| search.search(start_amount))
    }

    pub fn instrument(&self, symbol: &str) -> Option<&InstrumentState> {
        self.instruments.get(symbol)
    }

    pub fn instruments(&self) -> impl Iterator<Item = (&Symbol, &InstrumentState)> {
        self.instruments.iter()
    }

    /// Ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(symbols: &[&str]) -> AppConfig {
        let mut config = AppConfig::default();
        config.instruments = symbols
            .iter()
            .map(|s| (Symbol::new(*s), InstrumentConfig::default()))
            .collect();
        config.arbitrage.enabled = false;
        config
    }

    fn book(mid: i64) -> OrderBook {
        OrderBook::new()
            .with_bid(mid - 1, 20)
            .with_ask(mid + 1, -20)
    }

    #[test]
    fn test_output_shape() {
        let mut engine = Engine::new(&config(&["KELP"])).unwrap();
        let state = TradingState::new(0).with_book("KELP", book(100));

        let output = engine.run(&state);
        assert_eq!(output.conversions, 0);
        assert!(output.trader_data.is_empty());
        assert_eq!(output.order_count(), 0);
        assert_eq!(output.orders.get("KELP"), Some(&Vec::new()));
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn test_skipped_instrument_keeps_output_entry() {
        let mut engine = Engine::new(&config(&["KELP", "INK"])).unwrap();
        let output = engine.run(&TradingState::new(0).with_book("KELP", book(100)));

        assert_eq!(output.orders.len(), 2);
        assert!(output.orders_for("INK").is_empty());
        assert!(output.orders_for("KELP").is_empty());
    }

    #[test]
    fn test_one_sided_book_skipped_without_history() {
        let mut engine = Engine::new(&config(&["KELP", "INK"])).unwrap();
        let state = TradingState::new(0)
            .with_book("KELP", book(100))
            .with_book("INK", OrderBook::new().with_bid(99, 5));

        let report = engine.process(&state);
        assert_eq!(
            report.skipped.get("INK"),
            Some(&SkipCause::NoQuote(BookState::NoAsk))
        );
        assert!(!report.skipped.contains_key("KELP"));
        assert!(report.signals.contains_key("KELP"));

        let ink = engine.instrument("INK").unwrap();
        assert!(ink.detector().price_history().is_empty());
        let kelp = engine.instrument("KELP").unwrap();
        assert_eq!(kelp.detector().price_history().len(), 1);
    }

    #[test]
    fn test_skip_cause_labels() {
        let labels: Vec<_> = [
            SkipCause::NoQuote(BookState::NoBid),
            SkipCause::NoQuote(BookState::NoAsk),
            SkipCause::NoQuote(BookState::Empty),
            SkipCause::MissingBook,
            SkipCause::LedgerRejected,
        ]
        .iter()
        .map(SkipCause::as_str)
        .collect();
        assert_eq!(
            labels,
            ["no_bid", "no_ask", "empty", "missing_book", "ledger_rejected"]
        );
    }

    #[test]
    fn test_missing_book_skipped() {
        let mut engine = Engine::new(&config(&["KELP"])).unwrap();
        let report = engine.process(&TradingState::new(0));
        assert_eq!(report.skipped.get("KELP"), Some(&SkipCause::MissingBook));
    }

    #[test]
    fn test_unconfigured_book_ignored() {
        let mut engine = Engine::new(&config(&["KELP"])).unwrap();
        let state = TradingState::new(0)
            .with_book("KELP", book(100))
            .with_book("OTHER", book(50));

        let report = engine.process(&state);
        assert!(!report.signals.contains_key("OTHER"));
        assert!(!report.skipped.contains_key("OTHER"));
    }

    #[test]
    fn test_crossed_book_still_evaluated() {
        let mut engine = Engine::new(&config(&["KELP"])).unwrap();
        let crossed = OrderBook::new().with_bid(102, 5).with_ask(100, -5);
        let report = engine.process(&TradingState::new(0).with_book("KELP", crossed));

        assert!(report.skipped.is_empty());
        let history = engine.instrument("KELP").unwrap().detector().price_history();
        assert_eq!(history.latest(), Some(&dec!(101)));
    }

    #[test]
    fn test_arbitrage_reported_when_enabled() {
        let mut cfg = config(&["KELP"]);
        cfg.arbitrage.enabled = true;
        cfg.arbitrage.currencies = vec!["A".into(), "B".into(), "C".into()];
        cfg.arbitrage.rates = vec![
            vec![dec!(1), dec!(1), dec!(1)],
            vec![dec!(1), dec!(1), dec!(0.98)],
            vec![dec!(1.02), dec!(1), dec!(1)],
        ];
        cfg.arbitrage.home_currency = "A".to_string();
        cfg.arbitrage.path_depth = 2;

        let mut engine = Engine::new(&cfg).unwrap();
        let quote = OrderBook::new().with_bid(100, 5).with_ask(100, -5);
        let report = engine.process(&TradingState::new(0).with_book("KELP", quote));

        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.opportunities[0].edge_pct, dec!(2));

        let paths = engine.conversion_paths(dec!(1)).unwrap();
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn test_out_of_range_book_does_not_abort_tick() {
        let mut cfg = config(&["KELP"]);
        cfg.arbitrage.enabled = true;
        cfg.arbitrage.currencies = vec!["A".into(), "B".into(), "C".into()];
        cfg.arbitrage.rates = vec![
            vec![dec!(1), dec!(100), dec!(100)],
            vec![dec!(100), dec!(1), dec!(100)],
            vec![dec!(100), dec!(100), dec!(1)],
        ];
        cfg.arbitrage.home_currency = "A".to_string();
        cfg.arbitrage.path_depth = 1;

        let huge = Decimal::from_i128_with_scale(10i128.pow(27), 0);
        let mut engine = Engine::new(&cfg).unwrap();
        let state = TradingState::new(0)
            .with_book("KELP", book(100))
            .with_book("HUGE", OrderBook::new().with_bid(huge, 5).with_ask(huge, -5));

        let report = engine.process(&state);
        assert!(report.signals.contains_key("KELP"));
        assert!(!report.opportunities.is_empty());
        assert!(report
            .opportunities
            .iter()
            .all(|o| o.product.as_str() == "KELP"));
    }

    #[test]
    fn test_conversion_paths_disabled() {
        let engine = Engine::new(&config(&["KELP"])).unwrap();
        assert!(engine.conversion_paths(dec!(1)).is_none());
    }

    #[test]
    fn test_pnl_reported_per_instrument() {
        let mut engine = Engine::new(&config(&["KELP"])).unwrap();
        let report = engine.process(&TradingState::new(0).with_book("KELP", book(100)));
        let summary = report.pnl.get("KELP").unwrap();
        assert_eq!(summary.position, 0);
        assert_eq!(summary.total_pnl, Decimal::ZERO);
    }
}
