//! Assembly policy v1: counting mode, source and resource limits.
//!
//! The policy is the only configuration of an assembly run. Its
//! `params_hash` is recorded in every report, so two reports with equal
//! hashes were produced under identical settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::algebra::Symbol;
use crate::canonical::canonical_hash_hex;
use crate::types::VertexId;
use crate::{DEFAULT_POLICY_VERSION, DEFAULT_SOURCE, LENGTH_SYMBOL};

/// Default number of `R_k` orders kept in the cache.
pub const DEFAULT_RK_CACHE_CAPACITY: usize = 16;

/// How route lengths enter the λ-substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountingMode {
    /// `λ = T − Σ c·w` over all edges of the route.
    Inward,
    /// `λ = T + Σ w` over the coefficient-1 edges only.
    Outward,
}

impl CountingMode {
    /// Parse counting mode from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inward" | "in" => Some(Self::Inward),
            "outward" | "out" | "plus" => Some(Self::Outward),
            _ => None,
        }
    }
}

impl Default for CountingMode {
    fn default() -> Self {
        Self::Inward
    }
}

impl fmt::Display for CountingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inward => write!(f, "inward"),
            Self::Outward => write!(f, "outward"),
        }
    }
}

impl FromStr for CountingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountingMode::from_str(s).ok_or_else(|| format!("unknown counting mode: {s}"))
    }
}

/// Assembly policy version 1.
///
/// ## Parameters
///
/// - `mode`: inward (default) or outward λ-substitution
/// - `source`: vertex the wavefront starts from
/// - `length_symbol`: name of the distance variable of N
/// - `edge_limit`: refuse graphs with more edges (unset by default)
/// - `rk_cache_capacity`: `R_k` orders kept in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Counting variant.
    pub mode: CountingMode,
    /// Source vertex.
    pub source: VertexId,
    /// Distance variable.
    pub length_symbol: Symbol,
    /// Largest accepted edge count, if enforced.
    pub edge_limit: Option<usize>,
    /// Capacity of the `R_k` cache.
    pub rk_cache_capacity: usize,
}

impl AssemblyPolicy {
    /// Default policy with the inward variant.
    pub fn inward() -> Self {
        Self::default()
    }

    /// Default policy with the outward variant.
    pub fn outward() -> Self {
        Self {
            mode: CountingMode::Outward,
            ..Self::default()
        }
    }

    /// Set the source vertex.
    pub fn with_source(mut self, source: VertexId) -> Self {
        self.source = source;
        self
    }

    /// Enforce an edge limit.
    pub fn with_edge_limit(mut self, limit: usize) -> Self {
        self.edge_limit = Some(limit);
        self
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for AssemblyPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            mode: CountingMode::Inward,
            source: DEFAULT_SOURCE,
            length_symbol: Symbol::new(LENGTH_SYMBOL),
            edge_limit: None,
            rk_cache_capacity: DEFAULT_RK_CACHE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(CountingMode::from_str("Inward"), Some(CountingMode::Inward));
        assert_eq!(CountingMode::from_str("plus"), Some(CountingMode::Outward));
        assert_eq!(CountingMode::from_str("sideways"), None);
        assert_eq!(CountingMode::Outward.to_string(), "outward");
    }

    #[test]
    fn test_presets() {
        assert_eq!(AssemblyPolicy::inward().mode, CountingMode::Inward);
        assert_eq!(AssemblyPolicy::outward().mode, CountingMode::Outward);
        assert_eq!(AssemblyPolicy::default().edge_limit, None);
        assert_eq!(AssemblyPolicy::default().source, VertexId::new(0));
    }

    #[test]
    fn test_policy_params_hash_determinism() {
        let policy1 = AssemblyPolicy::default();
        let policy2 = AssemblyPolicy::default();

        assert_eq!(policy1.params_hash(), policy2.params_hash());
    }

    #[test]
    fn test_policy_params_hash_changes() {
        let policy1 = AssemblyPolicy::default();
        let policy2 = AssemblyPolicy::outward();
        let policy3 = AssemblyPolicy::default().with_edge_limit(8);

        assert_ne!(policy1.params_hash(), policy2.params_hash());
        assert_ne!(policy1.params_hash(), policy3.params_hash());
    }

    #[test]
    fn test_serde_round_trip() {
        let policy = AssemblyPolicy::outward().with_source(VertexId::new(2));
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"outward\""));
        let back: AssemblyPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
