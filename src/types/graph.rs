//! Paired-arc metric multigraph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::edge::Edge;
use super::ids::{EdgeId, VertexId};
use crate::algebra::Expr;
use crate::canonical::Fingerprint;

/// Error type for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The vertex is already present.
    #[error("Duplicate vertex: {0}")]
    DuplicateVertex(VertexId),
    /// The edge id is already in use.
    #[error("Duplicate edge id: {0}")]
    DuplicateEdge(EdgeId),
    /// The largest edge id in use has no successor.
    #[error("No fresh edge id after {0}")]
    EdgeIdsExhausted(EdgeId),
}

/// Canonical signature of a graph: its sorted edge ids.
///
/// Two sub-multigraphs of the same parent are equal exactly when their
/// signatures are.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphSignature(pub Vec<EdgeId>);

impl fmt::Display for GraphSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("}")
    }
}

/// A finite multigraph with stable edge identities and exact weights.
///
/// Invariants:
/// - `edges[id]` holds one arc for a loop and two mutually reverse arcs
///   otherwise, always with equal weight.
/// - every arc in `edges` also appears in the adjacency list of its `begin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GraphRecord", try_from = "GraphRecord")]
pub struct Graph {
    adjacency: BTreeMap<VertexId, Vec<Edge>>,
    edges: BTreeMap<EdgeId, Vec<Edge>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an isolated vertex.
    pub fn add_vertex(&mut self, vertex: VertexId) -> Result<(), GraphError> {
        if self.adjacency.contains_key(&vertex) {
            return Err(GraphError::DuplicateVertex(vertex));
        }
        self.adjacency.insert(vertex, Vec::new());
        Ok(())
    }

    /// Add an edge with a fresh id, creating missing endpoints.
    ///
    /// The fresh id is one past the largest id in use.
    pub fn add_edge(
        &mut self,
        begin: VertexId,
        end: VertexId,
        weight: impl Into<Expr>,
    ) -> Result<EdgeId, GraphError> {
        let id = self.next_edge_id()?;
        self.insert_edge(id, begin, end, weight.into());
        Ok(id)
    }

    /// Add an edge with a caller-chosen id, creating missing endpoints.
    pub fn add_edge_with_id(
        &mut self,
        id: EdgeId,
        begin: VertexId,
        end: VertexId,
        weight: impl Into<Expr>,
    ) -> Result<EdgeId, GraphError> {
        if self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateEdge(id));
        }
        self.insert_edge(id, begin, end, weight.into());
        Ok(id)
    }

    /// Callers guarantee `id` is unused.
    pub(crate) fn insert_edge(&mut self, id: EdgeId, begin: VertexId, end: VertexId, weight: Expr) {
        let forward = Edge::new(id, begin, end, weight);
        let mut arcs = vec![forward.clone()];
        self.adjacency.entry(begin).or_default().push(forward.clone());
        if !forward.is_loop() {
            let backward = forward.reversed();
            self.adjacency.entry(end).or_default().push(backward.clone());
            arcs.push(backward);
        }
        self.edges.insert(id, arcs);
    }

    fn next_edge_id(&self) -> Result<EdgeId, GraphError> {
        match self.edges.keys().next_back() {
            None => Ok(EdgeId::new(0)),
            Some(&last) => last.checked_next().ok_or(GraphError::EdgeIdsExhausted(last)),
        }
    }

    /// Number of arcs leaving `vertex`; 0 for an unknown vertex.
    ///
    /// A non-loop edge counts once at each endpoint, a loop once.
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.connectors(vertex).len()
    }

    /// Arcs leaving `vertex`, in insertion order.
    pub fn connectors(&self, vertex: VertexId) -> &[Edge] {
        self.adjacency.get(&vertex).map_or(&[], Vec::as_slice)
    }

    /// The first arc of an edge.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id).and_then(|arcs| arcs.first())
    }

    /// Both arcs of an edge (one for a loop).
    pub fn arcs(&self, id: EdgeId) -> &[Edge] {
        self.edges.get(&id).map_or(&[], Vec::as_slice)
    }

    /// One arc per undirected edge, by ascending id.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter_map(|arcs| arcs.first())
    }

    /// Edge ids in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether the vertex is present.
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// Whether the edge is present.
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// The arc paired with `arc`; a loop arc is its own pair.
    pub fn reverse_of(&self, arc: &Edge) -> Option<&Edge> {
        self.arcs(arc.id)
            .iter()
            .find(|other| other.begin == arc.end && other.end == arc.begin)
    }

    /// Sub-multigraph on the given edges, always containing `source`.
    ///
    /// Ids and weights are kept; ids missing from this graph are skipped.
    pub fn subgraph(&self, source: VertexId, ids: impl IntoIterator<Item = EdgeId>) -> Graph {
        let mut sub = Graph::new();
        sub.adjacency.insert(source, Vec::new());
        for id in ids {
            if let Some(arc) = self.edge(id) {
                sub.insert_edge(arc.id, arc.begin, arc.end, arc.weight.clone());
            }
        }
        sub
    }

    /// Vertices reachable from `start` without crossing `banned`.
    pub fn reachable_from(&self, start: VertexId, banned: Option<EdgeId>) -> BTreeSet<VertexId> {
        let mut visited = BTreeSet::new();
        if !self.contains_vertex(start) {
            return visited;
        }
        let mut stack = vec![start];
        visited.insert(start);
        while let Some(vertex) = stack.pop() {
            for arc in self.connectors(vertex) {
                if Some(arc.id) == banned {
                    continue;
                }
                if visited.insert(arc.end) {
                    stack.push(arc.end);
                }
            }
        }
        visited
    }

    /// Whether every vertex is reachable from `start`.
    pub fn is_connected_from(&self, start: VertexId) -> bool {
        self.contains_vertex(start) && self.reachable_from(start, None).len() == self.num_vertices()
    }

    /// Sorted edge ids.
    pub fn signature(&self) -> GraphSignature {
        GraphSignature(self.edge_ids().collect())
    }

    /// Content hash of the vertex set and edge list.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&GraphRecord::from(self.clone()))
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vertex, arcs) in &self.adjacency {
            write!(f, "{vertex}:")?;
            for arc in arcs {
                write!(f, " [{}]", arc)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serialized form of an undirected edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Edge id.
    pub id: EdgeId,
    /// First endpoint.
    pub begin: VertexId,
    /// Second endpoint.
    pub end: VertexId,
    /// Edge length.
    pub weight: Expr,
}

/// Serialized form of a [`Graph`]: vertices plus an edge list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    /// All vertices, including isolated ones.
    pub vertices: Vec<VertexId>,
    /// One entry per undirected edge, by ascending id.
    pub edges: Vec<EdgeRecord>,
}

impl From<Graph> for GraphRecord {
    fn from(graph: Graph) -> Self {
        Self {
            vertices: graph.vertices().collect(),
            edges: graph
                .edges()
                .map(|arc| EdgeRecord {
                    id: arc.id,
                    begin: arc.begin,
                    end: arc.end,
                    weight: arc.weight.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<GraphRecord> for Graph {
    type Error = GraphError;

    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        let mut graph = Graph::new();
        for vertex in record.vertices {
            graph.add_vertex(vertex)?;
        }
        for edge in record.edges {
            graph.add_edge_with_id(edge.id, edge.begin, edge.end, edge.weight)?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    fn triangle() -> Graph {
        let mut g = Graph::new();
        g.add_edge(v(0), v(1), Expr::symbol("t_0")).unwrap();
        g.add_edge(v(1), v(2), Expr::symbol("t_1")).unwrap();
        g.add_edge(v(2), v(0), Expr::symbol("t_2")).unwrap();
        g
    }

    #[test]
    fn test_duplicate_vertex() {
        let mut g = Graph::new();
        g.add_vertex(v(0)).unwrap();
        assert_eq!(g.add_vertex(v(0)), Err(GraphError::DuplicateVertex(v(0))));
    }

    #[test]
    fn test_duplicate_edge_id() {
        let mut g = Graph::new();
        let id = g.add_edge(v(0), v(1), Expr::one()).unwrap();
        assert_eq!(
            g.add_edge_with_id(id, v(1), v(2), Expr::one()),
            Err(GraphError::DuplicateEdge(id))
        );
    }

    #[test]
    fn test_arc_pairing() {
        let g = triangle();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.num_edges(), 3);
        for id in g.edge_ids() {
            let arcs = g.arcs(id);
            assert_eq!(arcs.len(), 2);
            assert_eq!(arcs[0].reversed(), arcs[1]);
            assert_eq!(g.reverse_of(&arcs[0]), Some(&arcs[1]));
            assert_eq!(g.reverse_of(&arcs[1]), Some(&arcs[0]));
        }
    }

    #[test]
    fn test_loop_is_single_arc() {
        let mut g = Graph::new();
        let id = g.add_edge(v(0), v(0), Expr::symbol("t_0")).unwrap();
        g.add_edge(v(0), v(1), Expr::symbol("t_1")).unwrap();
        assert_eq!(g.arcs(id).len(), 1);
        assert_eq!(g.degree(v(0)), 2);
        assert_eq!(g.degree(v(1)), 1);
        let arc = g.edge(id).unwrap();
        assert_eq!(g.reverse_of(arc), Some(arc));
    }

    #[test]
    fn test_parallel_edges_count_in_degree() {
        let mut g = Graph::new();
        g.add_edge(v(0), v(1), Expr::symbol("t_0")).unwrap();
        g.add_edge(v(0), v(1), Expr::symbol("t_1")).unwrap();
        assert_eq!(g.degree(v(0)), 2);
        assert_eq!(g.degree(v(1)), 2);
        assert_eq!(g.degree(v(9)), 0);
    }

    #[test]
    fn test_fresh_ids_follow_largest() {
        let mut g = Graph::new();
        g.add_edge_with_id(EdgeId::new(5), v(0), v(1), Expr::one()).unwrap();
        assert_eq!(g.add_edge(v(1), v(2), Expr::one()).unwrap(), EdgeId::new(6));
    }

    #[test]
    fn test_fresh_id_after_largest_possible() {
        let mut g = Graph::new();
        let last = EdgeId::new(u32::MAX);
        g.add_edge_with_id(last, v(0), v(1), Expr::symbol("t_0")).unwrap();
        assert_eq!(
            g.add_edge(v(1), v(2), Expr::symbol("t_1")),
            Err(GraphError::EdgeIdsExhausted(last))
        );
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.degree(v(1)), 1);
        assert_eq!(g.edge(last).map(|e| e.weight.clone()), Some(Expr::symbol("t_0")));
    }

    #[test]
    fn test_reachability_with_ban() {
        let mut g = triangle();
        let tail = g.add_edge(v(0), v(3), Expr::symbol("t_3")).unwrap();
        assert!(g.is_connected_from(v(0)));
        let reach = g.reachable_from(v(0), Some(tail));
        assert!(!reach.contains(&v(3)));
        let reach = g.reachable_from(v(0), Some(EdgeId::new(0)));
        assert!(reach.contains(&v(1)));
    }

    #[test]
    fn test_subgraph_keeps_source() {
        let g = triangle();
        let empty = g.subgraph(v(0), []);
        assert_eq!(empty.num_vertices(), 1);
        assert_eq!(empty.num_edges(), 0);
        let path = g.subgraph(v(0), [EdgeId::new(1)]);
        assert!(path.contains_vertex(v(0)));
        assert!(!path.is_connected_from(v(0)));
        assert_eq!(path.signature(), GraphSignature(vec![EdgeId::new(1)]));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut g = triangle();
        g.add_vertex(v(7)).unwrap();
        let json = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
        assert_eq!(back.fingerprint(), g.fingerprint());
    }
}
