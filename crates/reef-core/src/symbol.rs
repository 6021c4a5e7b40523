//! Instrument identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instrument symbol (e.g. "SQUID_INK", "KELP").
///
/// This is the primary key for per-instrument state and configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new("SQUID_INK").to_string(), "SQUID_INK");
    }

    #[test]
    fn test_lookup_by_str() {
        let mut positions: HashMap<Symbol, i64> = HashMap::new();
        positions.insert(Symbol::from("KELP"), 7);
        assert_eq!(positions.get("KELP"), Some(&7));
    }
}
