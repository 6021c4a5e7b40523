//! Product round-trip arbitrage scanner.
//!
//! For each product and every ordered (source, buy, sell) triple of distinct
//! currencies:
//! - cost_in_source = best_ask / rate(source -> buy)
//! - revenue_in_source = best_bid * rate(sell -> source)
//! - edge_% = (revenue - cost) / cost * 100
//!
//! Combinations above the edge threshold are reported. Zero rates, zero
//! costs and amounts outside the `Decimal` range are skipped.

use std::collections::BTreeMap;

use reef_core::{OrderBook, Price, Symbol};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::currency::Currency;
use crate::error::{ArbError, ArbResult};
use crate::graph::ConversionGraph;

/// Default minimum edge in percent.
pub const DEFAULT_MIN_EDGE_PCT: Decimal = Decimal::ONE;

/// Live top of book for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuote {
    pub product: Symbol,
    pub best_bid: Price,
    pub best_ask: Price,
}

impl ProductQuote {
    pub fn new(product: impl Into<Symbol>, best_bid: impl Into<Price>, best_ask: impl Into<Price>) -> Self {
        Self {
            product: product.into(),
            best_bid: best_bid.into(),
            best_ask: best_ask.into(),
        }
    }

    /// Quote from a book. `None` unless both sides rest.
    pub fn from_book(product: Symbol, book: &OrderBook) -> Option<Self> {
        Some(Self {
            product,
            best_bid: book.best_bid()?,
            best_ask: book.best_ask()?,
        })
    }
}

/// One reported round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbOpportunity {
    pub product: Symbol,
    pub source: Currency,
    pub buy_currency: Currency,
    pub sell_currency: Currency,
    pub cost_in_source: Decimal,
    pub revenue_in_source: Decimal,
    pub edge_pct: Decimal,
}

/// Exhaustive scanner over a conversion graph.
#[derive(Debug, Clone)]
pub struct ArbitrageScanner {
    graph: ConversionGraph,
    min_edge_pct: Decimal,
}

impl ArbitrageScanner {
    /// Scanner with the default 1% threshold.
    pub fn new(graph: ConversionGraph) -> Self {
        Self {
            graph,
            min_edge_pct: DEFAULT_MIN_EDGE_PCT,
        }
    }

    /// Override the reporting threshold. Must not be negative.
    pub fn with_min_edge_pct(mut self, min_edge_pct: Decimal) -> ArbResult<Self> {
        if min_edge_pct.is_sign_negative() && !min_edge_pct.is_zero() {
            return Err(ArbError::ConfigError(format!(
                "min_edge_pct ({}) must not be negative",
                min_edge_pct
            )));
        }
        self.min_edge_pct = min_edge_pct;
        Ok(self)
    }

    pub fn graph(&self) -> &ConversionGraph {
        &self.graph
    }

    pub fn min_edge_pct(&self) -> Decimal {
        self.min_edge_pct
    }

    /// Scan every quotable book in a tick.
    pub fn scan_books(&self, books: &BTreeMap<Symbol, OrderBook>) -> Vec<ArbOpportunity> {
        let quotes: Vec<ProductQuote> = books
            .iter()
            .filter_map(|(symbol, book)| ProductQuote::from_book(symbol.clone(), book))
            .collect();
        self.scan(&quotes)
    }

    /// Report every combination above the threshold, best edge first.
    pub fn scan(&self, quotes: &[ProductQuote]) -> Vec<ArbOpportunity> {
        let mut found = Vec::new();
        for quote in quotes {
            self.scan_product(quote, &mut found);
        }
        found.sort_by(|a, b| b.edge_pct.cmp(&a.edge_pct));

        debug!(
            products = quotes.len(),
            opportunities = found.len(),
            min_edge_pct = %self.min_edge_pct,
            "Arbitrage scan complete"
        );
        found
    }

    fn scan_product(&self, quote: &ProductQuote, found: &mut Vec<ArbOpportunity>) {
        let n = self.graph.len();
        let hundred = Decimal::ONE_HUNDRED;

        for source in 0..n {
            for buy in (0..n).filter(|&b| b != source) {
                let buy_rate = self.graph.rate_at(source, buy);
                let Some(cost) = quote.best_ask.inner().checked_div(buy_rate) else {
                    trace!(source, buy, "Zero conversion rate skipped");
                    continue;
                };
                if cost.is_zero() {
                    continue;
                }

                for sell in (0..n).filter(|&s| s != source && s != buy) {
                    let sell_rate = self.graph.rate_at(sell, source);
                    let Some((revenue, edge_pct)) = quote
                        .best_bid
                        .inner()
                        .checked_mul(sell_rate)
                        .and_then(|revenue| {
                            let edge = revenue.checked_sub(cost)?.checked_div(cost)?;
                            Some((revenue, edge.checked_mul(hundred)?))
                        })
                    else {
                        trace!(product = %quote.product, source, buy, sell, "Edge out of range, skipped");
                        continue;
                    };
                    if edge_pct <= self.min_edge_pct {
                        continue;
                    }

                    let currencies = self.graph.currencies();
                    found.push(ArbOpportunity {
                        product: quote.product.clone(),
                        source: currencies[source].clone(),
                        buy_currency: currencies[buy].clone(),
                        sell_currency: currencies[sell].clone(),
                        cost_in_source: cost,
                        revenue_in_source: revenue,
                        edge_pct,
                    });
                }
            }
        }
    }
}
