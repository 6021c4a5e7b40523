//! Fixed-depth conversion round trips from a home currency.
//!
//! Every path starts and ends in the home currency and takes `depth`
//! intermediate hops drawn (with repetition) from the other currencies, so
//! a search visits `(n - 1)^depth` paths.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::currency::Currency;
use crate::error::{ArbError, ArbResult};
use crate::graph::ConversionGraph;

/// Deepest search accepted. Path count grows as `(n - 1)^depth`.
pub const MAX_PATH_DEPTH: usize = 8;

/// One evaluated round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionPath {
    /// Currencies visited, home at both ends.
    pub hops: Vec<Currency>,
    pub start_amount: Decimal,
    pub final_amount: Decimal,
    pub profit: Decimal,
    pub edge_pct: Decimal,
}

impl ConversionPath {
    pub fn is_profitable(&self) -> bool {
        self.final_amount > self.start_amount
    }
}

impl std::fmt::Display for ConversionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, hop) in self.hops.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", hop)?;
        }
        Ok(())
    }
}

/// All paths from one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSearchResult {
    pub paths: Vec<ConversionPath>,
}

impl PathSearchResult {
    pub fn profitable(&self) -> impl Iterator<Item = &ConversionPath> {
        self.paths.iter().filter(|p| p.is_profitable())
    }

    /// Highest final amount; ties resolve to the first path enumerated.
    pub fn best(&self) -> Option<&ConversionPath> {
        self.paths.iter().fold(None, |best, path| match best {
            Some(b) if b.final_amount >= path.final_amount => Some(b),
            _ => Some(path),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Exhaustive round-trip search.
#[derive(Debug, Clone)]
pub struct ConversionPathSearch {
    graph: ConversionGraph,
    home: usize,
    depth: usize,
}

impl ConversionPathSearch {
    /// Create a search from `home` with `depth` intermediate hops.
    pub fn new(graph: ConversionGraph, home: &str, depth: usize) -> ArbResult<Self> {
        let home = graph
            .index_of(home)
            .ok_or_else(|| ArbError::UnknownCurrency(home.to_string()))?;
        if depth == 0 || depth > MAX_PATH_DEPTH {
            return Err(ArbError::ConfigError(format!(
                "path depth ({}) must be in 1..={}",
                depth, MAX_PATH_DEPTH
            )));
        }
        if graph.len() < 2 {
            return Err(ArbError::ConfigError(
                "path search needs at least one non-home currency".to_string(),
            ));
        }
        Ok(Self { graph, home, depth })
    }

    pub fn home(&self) -> &Currency {
        &self.graph.currencies()[self.home]
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluate every path for `start_amount` units of the home currency.
    ///
    /// Paths through a zero rate are worthless and left out, as are paths
    /// whose amounts leave the `Decimal` range.
    pub fn search(&self, start_amount: Decimal) -> PathSearchResult {
        let intermediates: Vec<usize> = (0..self.graph.len()).filter(|&i| i != self.home).collect();
        let mut result = PathSearchResult::default();
        let mut skipped = 0usize;

        // Odometer over intermediates^depth
        let mut digits = vec![0usize; self.depth];
        loop {
            let route: Vec<usize> = std::iter::once(self.home)
                .chain(digits.iter().map(|&d| intermediates[d]))
                .chain(std::iter::once(self.home))
                .collect();

            match self.evaluate(&route, start_amount) {
                Some(path) => result.paths.push(path),
                None => skipped += 1,
            }

            if !advance(&mut digits, intermediates.len()) {
                break;
            }
        }

        let profitable = result.profitable().count();
        debug!(
            home = %self.home(),
            depth = self.depth,
            paths = result.len(),
            skipped,
            profitable,
            "Conversion path search complete"
        );
        if let Some(best) = result.best().filter(|b| b.is_profitable()) {
            info!(path = %best, edge_pct = %best.edge_pct.round_dp(4), "Profitable conversion path");
        }
        result
    }

    fn evaluate(&self, route: &[usize], start_amount: Decimal) -> Option<ConversionPath> {
        let mut amount = start_amount;
        for pair in route.windows(2) {
            let rate = self.graph.rate_at(pair[0], pair[1]);
            if rate.is_zero() {
                return None;
            }
            amount = amount.checked_mul(rate)?;
        }

        let profit = amount.checked_sub(start_amount)?;
        let edge_pct = profit
            .checked_div(start_amount)?
            .checked_mul(Decimal::ONE_HUNDRED)?;
        let currencies = self.graph.currencies();

        Some(ConversionPath {
            hops: route.iter().map(|&i| currencies[i].clone()).collect(),
            start_amount,
            final_amount: amount,
            profit,
            edge_pct,
        })
    }
}

/// Increment a base-`radix` odometer. Returns false once it wraps.
fn advance(digits: &mut [usize], radix: usize) -> bool {
    for digit in digits.iter_mut().rev() {
        *digit += 1;
        if *digit < radix {
            return true;
        }
        *digit = 0;
    }
    false
}
