//! Vertex and edge identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a vertex.
///
/// Vertices carry no payload; the identifier is the vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Create a vertex id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Identifier of an undirected edge, shared by both of its arcs.
///
/// Ordered numerically; the sorted edge ids of a graph are its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Create an edge id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id following this one, if any.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<u32> for EdgeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
