//! Connected sub-multigraph enumeration.
//!
//! Every subset of the parent's undirected edges is realized as a
//! sub-multigraph containing the source; the connected ones are kept. The
//! search is exponential in the edge count, see
//! [`RECOMMENDED_EDGE_CEILING`](crate::RECOMMENDED_EDGE_CEILING).

use std::collections::BTreeMap;

use crate::types::{EdgeId, Graph, GraphSignature, VertexId};

/// Widest edge set a subset mask can describe.
pub const MAX_ENUMERABLE_EDGES: usize = 63;

/// Error type for subgraph enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumerationError {
    /// The power set does not fit in a 64-bit mask.
    #[error("Cannot enumerate subsets of {edges} edges (at most {max})", max = MAX_ENUMERABLE_EDGES)]
    TooManyEdges {
        /// Edge count of the input graph.
        edges: usize,
    },
}

/// Iterator over all subsets of `n < 64` elements as bit masks.
///
/// Bit `i` of a mask marks element `i` as present. Masks come in
/// increasing numeric order, starting with the empty set.
#[derive(Debug, Clone)]
pub struct PowersetIterator {
    size: u64,
    current: u64,
}

impl PowersetIterator {
    /// Subsets of `n_elements` elements; `n_elements` must be below 64.
    pub fn new(n_elements: u8) -> Self {
        PowersetIterator {
            size: 1u64 << n_elements.min(MAX_ENUMERABLE_EDGES as u8),
            current: 0,
        }
    }
}

impl Iterator for PowersetIterator {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.size {
            let out = self.current;
            self.current += 1;
            Some(out)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.size - self.current).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

/// All connected sub-multigraphs of `graph` that contain `source`.
///
/// The output is ordered by signature, so the trivial subgraph (the source
/// alone) comes first. The full graph is included when it is connected.
pub fn connected_subgraphs(graph: &Graph, source: VertexId) -> Result<Vec<Graph>, EnumerationError> {
    let ids: Vec<EdgeId> = graph.edge_ids().collect();
    if ids.len() > MAX_ENUMERABLE_EDGES {
        return Err(EnumerationError::TooManyEdges { edges: ids.len() });
    }

    let mut found: BTreeMap<GraphSignature, Graph> = BTreeMap::new();
    for mask in PowersetIterator::new(ids.len() as u8) {
        let chosen = ids
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1u64 << bit) != 0)
            .map(|(_, id)| *id);
        let candidate = graph.subgraph(source, chosen);
        if candidate.is_connected_from(source) {
            found.entry(candidate.signature()).or_insert(candidate);
        }
    }

    tracing::trace!(
        edges = ids.len(),
        connected = found.len(),
        "Enumerated connected sub-multigraphs"
    );
    Ok(found.into_values().collect())
}
