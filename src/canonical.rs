//! Canonical hashing for graphs, policies and reports.
//!
//! Values are hashed over their JSON encoding. Every hashed type in this
//! crate keeps its collections in `BTreeMap`s or sorted `Vec`s, so equal
//! values always produce equal bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Seed shared by every canonical hash.
const HASH_SEED: u64 = 0;

/// A 64-bit content hash, displayed as 16 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Hash a serializable value.
    ///
    /// A value that fails to serialize hashes as the empty byte string; none
    /// of the crate's hashed types can fail.
    pub fn of<T: Serialize>(value: &T) -> Self {
        let bytes = serde_json::to_vec(value).unwrap_or_default();
        Self(xxh64(&bytes, HASH_SEED))
    }

    /// Get the raw hash.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_string()
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = std::num::ParseIntError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        u64::from_str_radix(&text, 16).map(Self)
    }
}

/// Hash a serializable value and return it as hex.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    Fingerprint::of(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        weights: BTreeMap<u32, String>,
    }

    fn sample() -> Sample {
        let mut weights = BTreeMap::new();
        weights.insert(1, "t_1".to_string());
        weights.insert(0, "t_0".to_string());
        Sample {
            name: "triangle".to_string(),
            weights,
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(Fingerprint::of(&sample()), Fingerprint::of(&sample()));
    }

    #[test]
    fn test_hex_round_trip() {
        let fingerprint = Fingerprint::of(&sample());
        let hex = fingerprint.to_string();
        assert_eq!(hex.len(), 16);
        assert_eq!(Fingerprint::try_from(hex).unwrap(), fingerprint);
    }
}
