//! Arcs of the metric multigraph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EdgeId, VertexId};
use crate::algebra::Expr;

/// One directed realization of an undirected edge.
///
/// A non-loop edge is stored as two arcs with swapped endpoints; a loop is a
/// single arc. Both arcs of a pair share `id` and `weight`.
/// Implements `Ord` for deterministic ordering: (id, begin, end).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Undirected edge identity.
    pub id: EdgeId,
    /// Tail vertex.
    pub begin: VertexId,
    /// Head vertex.
    pub end: VertexId,
    /// Length of the edge.
    pub weight: Expr,
}

impl Edge {
    /// Create an arc.
    pub fn new(id: EdgeId, begin: VertexId, end: VertexId, weight: Expr) -> Self {
        Self {
            id,
            begin,
            end,
            weight,
        }
    }

    /// The arc running the other way along the same edge.
    pub fn reversed(&self) -> Self {
        Self::new(self.id, self.end, self.begin, self.weight.clone())
    }

    /// Whether both endpoints coincide.
    pub fn is_loop(&self) -> bool {
        self.begin == self.end
    }

    /// Whether the arc touches `vertex`.
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.begin == vertex || self.end == vertex
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.begin, self.end, self.weight)
    }
}

// Canonical ordering: id, then begin, then end
impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.begin.cmp(&other.begin))
            .then_with(|| self.end.cmp(&other.end))
    }
}
