//! Bounded cache of generic `R_k` polynomials.
//!
//! Building `R_k` over symbolic weights costs a truncated product of `k`
//! series; one assembly reuses the same few orders for every subgraph,
//! vertex and route. Entries are immutable once written.

use lru::LruCache;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::{ToddError, ToddPolynomial};

/// Capacity used when a zero capacity is requested.
const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

/// LRU table of generic `R_k`, keyed by `k`.
pub struct RkTable {
    cache: RwLock<LruCache<usize, Arc<ToddPolynomial>>>,
}

impl RkTable {
    /// Create a table holding at most `capacity` orders.
    pub fn new(capacity: usize) -> Self {
        let size = NonZeroUsize::new(capacity).unwrap_or(FALLBACK_CAPACITY);
        Self {
            cache: RwLock::new(LruCache::new(size)),
        }
    }

    /// Generic `R_k`, built on first use.
    ///
    /// A hit marks the order as most recently used.
    pub fn get(&self, order: usize) -> Result<Arc<ToddPolynomial>, ToddError> {
        // Recency update needs the write lock even on a hit
        let hit = self.cache.write().get(&order).cloned();
        if let Some(rk) = hit {
            tracing::trace!(order, "Rk cache hit");
            return Ok(rk);
        }

        let rk = Arc::new(ToddPolynomial::generic(order)?);
        tracing::trace!(order, "Rk cache miss, built");
        self.cache.write().put(order, Arc::clone(&rk));
        Ok(rk)
    }

    /// Build every order up to and including `max_order`.
    pub fn prepare(&self, max_order: usize) -> Result<(), ToddError> {
        for order in 0..=max_order {
            self.get(order)?;
        }
        Ok(())
    }

    /// Whether `order` is cached, without touching its recency.
    pub fn contains(&self, order: usize) -> bool {
        self.cache.read().contains(&order)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.read();
        CacheStats {
            len: cache.len(),
            cap: cache.cap().get(),
        }
    }

    /// Drop every cached polynomial.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

impl Default for RkTable {
    fn default() -> Self {
        Self::new(FALLBACK_CAPACITY.get())
    }
}

impl std::fmt::Debug for RkTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RkTable").field("stats", &self.stats()).finish()
    }
}
