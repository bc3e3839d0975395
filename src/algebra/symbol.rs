//! Named indeterminates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named indeterminate such as `T`, `lambda` or `t_3`.
///
/// Ordered by name, which fixes the term order of every [`Expr`](super::Expr).
/// Names are expected to be identifiers (`[A-Za-z_][A-Za-z0-9_]*`) so that
/// rendered expressions parse back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Create an indexed symbol, e.g. `indexed("t", 2)` is `t_2`.
    pub fn indexed(prefix: &str, index: usize) -> Self {
        Self(format!("{prefix}_{index}"))
    }

    /// Get the symbol name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_name() {
        assert_eq!(Symbol::indexed("t", 4).as_str(), "t_4");
        assert_eq!(Symbol::indexed("w", 1).to_string(), "w_1");
    }

    #[test]
    fn test_ordering_is_by_name() {
        assert!(Symbol::new("T") < Symbol::new("lambda"));
        assert!(Symbol::new("t_0") < Symbol::new("t_1"));
    }
}
