//! Directed conversion-rate table.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::currency::Currency;
use crate::error::{ArbError, ArbResult};

/// Static directed weighted graph over a small currency set.
///
/// `rate(a, b)` is how many units of `b` one unit of `a` converts into.
/// Rates are not required to be reciprocal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionGraph {
    currencies: Vec<Currency>,
    /// Row = from, column = to, in `currencies` order.
    rates: Vec<Vec<Decimal>>,
}

impl ConversionGraph {
    /// Build a graph from a square rate matrix.
    ///
    /// Returns Err if:
    /// - the currency list is empty or has duplicates
    /// - the matrix is not square with one row per currency
    /// - any rate is negative
    pub fn new(currencies: Vec<Currency>, rates: Vec<Vec<Decimal>>) -> ArbResult<Self> {
        let n = currencies.len();
        if n == 0 {
            return Err(ArbError::InvalidGraph("no currencies".to_string()));
        }

        let mut seen = HashSet::with_capacity(n);
        for currency in &currencies {
            if !seen.insert(currency.as_str()) {
                return Err(ArbError::InvalidGraph(format!(
                    "duplicate currency {}",
                    currency
                )));
            }
        }

        if rates.len() != n {
            return Err(ArbError::InvalidGraph(format!(
                "{} rate rows for {} currencies",
                rates.len(),
                n
            )));
        }
        for (i, row) in rates.iter().enumerate() {
            if row.len() != n {
                return Err(ArbError::InvalidGraph(format!(
                    "row {} ({}) has {} rates, expected {}",
                    i,
                    currencies[i],
                    row.len(),
                    n
                )));
            }
            if let Some(rate) = row.iter().find(|r| r.is_sign_negative() && !r.is_zero()) {
                return Err(ArbError::InvalidGraph(format!(
                    "negative rate {} from {}",
                    rate, currencies[i]
                )));
            }
        }

        Ok(Self { currencies, rates })
    }

    /// The island trading table: Snowballs, Pizzas, Silicon Nuggets, SeaShells.
    pub fn standard() -> Self {
        let currencies = ["Snowballs", "Pizzas", "Silicon Nuggets", "SeaShells"]
            .into_iter()
            .map(Currency::from)
            .collect();
        let rates = [
            [100, 145, 52, 72],
            [70, 100, 31, 48],
            [195, 310, 100, 149],
            [134, 198, 64, 100],
        ]
        .iter()
        .map(|row| row.iter().map(|r| Decimal::new(*r, 2)).collect())
        .collect();
        Self { currencies, rates }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn index_of(&self, currency: &str) -> Option<usize> {
        self.currencies.iter().position(|c| c.as_str() == currency)
    }

    /// Rate by matrix index. Panics on out-of-range indices, like slice indexing.
    pub fn rate_at(&self, from: usize, to: usize) -> Decimal {
        self.rates[from][to]
    }

    /// Rate by currency name.
    pub fn rate(&self, from: &str, to: &str) -> ArbResult<Decimal> {
        let i = self
            .index_of(from)
            .ok_or_else(|| ArbError::UnknownCurrency(from.to_string()))?;
        let j = self
            .index_of(to)
            .ok_or_else(|| ArbError::UnknownCurrency(to.to_string()))?;
        Ok(self.rate_at(i, j))
    }
}

impl Default for ConversionGraph {
    fn default() -> Self {
        Self::standard()
    }
}
