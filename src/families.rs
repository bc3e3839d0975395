//! Standard graph families with symbolic weights `t_0, t_1, ...`.
//!
//! Each builder returns the `(vertexCount, edgeCount, Graph)` triple taken
//! by [`build`](crate::assembler::build); the source is vertex 0.

use std::fmt;
use std::str::FromStr;

use crate::algebra::{Expr, Symbol};
use crate::io::graph_file::POSITIONAL_PREFIX;
use crate::types::{EdgeId, Graph, VertexId};

fn from_edges(edges: &[(u32, u32)]) -> (usize, usize, Graph) {
    let mut graph = Graph::new();
    for (id, &(a, b)) in (0u32..).zip(edges) {
        graph.insert_edge(
            EdgeId::new(id),
            VertexId::new(a),
            VertexId::new(b),
            Expr::symbol(Symbol::indexed(POSITIONAL_PREFIX, id as usize)),
        );
    }
    (graph.num_vertices(), graph.num_edges(), graph)
}

/// `m` parallel edges between vertices 0 and 1.
pub fn multiedge(m: usize) -> (usize, usize, Graph) {
    from_edges(&vec![(0, 1); m])
}

/// One edge.
pub fn single_edge() -> (usize, usize, Graph) {
    multiedge(1)
}

/// A path `0 - 1 - ... - len`.
pub fn bamboo(len: u32) -> (usize, usize, Graph) {
    let edges: Vec<(u32, u32)> = (0..len).map(|i| (i, i + 1)).collect();
    from_edges(&edges)
}

/// The cycle `0 - 1 - 2 - 0`.
pub fn triangle() -> (usize, usize, Graph) {
    from_edges(&[(0, 1), (1, 2), (2, 0)])
}

/// A triangle on `0, 1, 2` with the tail `0 - 3 - 4`.
pub fn triangle_with_tail() -> (usize, usize, Graph) {
    from_edges(&[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4)])
}

/// Two stars joined at their centres: `0 - {1, 2}`, `0 - 3`, `3 - {4, 5}`.
pub fn h_graph() -> (usize, usize, Graph) {
    from_edges(&[(0, 1), (0, 2), (0, 3), (3, 4), (3, 5)])
}

/// A loop at the source plus one pendant edge.
pub fn loop_with_tail() -> (usize, usize, Graph) {
    from_edges(&[(0, 0), (0, 1)])
}

/// Named family selector for command lines and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// See [`single_edge`].
    SingleEdge,
    /// See [`multiedge`].
    Multiedge(usize),
    /// See [`bamboo`].
    Bamboo(u32),
    /// See [`triangle`].
    Triangle,
    /// See [`triangle_with_tail`].
    TriangleWithTail,
    /// See [`h_graph`].
    HGraph,
    /// See [`loop_with_tail`].
    LoopWithTail,
}

impl Family {
    /// Build the family member.
    pub fn build(self) -> (usize, usize, Graph) {
        match self {
            Self::SingleEdge => single_edge(),
            Self::Multiedge(m) => multiedge(m),
            Self::Bamboo(len) => bamboo(len),
            Self::Triangle => triangle(),
            Self::TriangleWithTail => triangle_with_tail(),
            Self::HGraph => h_graph(),
            Self::LoopWithTail => loop_with_tail(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleEdge => write!(f, "single"),
            Self::Multiedge(m) => write!(f, "multiedge:{m}"),
            Self::Bamboo(len) => write!(f, "bamboo:{len}"),
            Self::Triangle => write!(f, "triangle"),
            Self::TriangleWithTail => write!(f, "triangle-tail"),
            Self::HGraph => write!(f, "h"),
            Self::LoopWithTail => write!(f, "loop-tail"),
        }
    }
}

impl FromStr for Family {
    type Err = String;

    /// Parse `single`, `multiedge:<m>`, `bamboo:<len>`, `triangle`,
    /// `triangle-tail`, `h` or `loop-tail`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, size) = match s.split_once(':') {
            Some((name, size)) => (name, Some(size)),
            None => (s, None),
        };
        let size = |default: u32| -> Result<u32, String> {
            size.map_or(Ok(default), |n| n.parse().map_err(|_| format!("invalid size in '{s}'")))
        };
        match name.to_lowercase().as_str() {
            "single" => Ok(Self::SingleEdge),
            "multiedge" | "multi" => Ok(Self::Multiedge(size(4)? as usize)),
            "bamboo" | "path" => Ok(Self::Bamboo(size(2)?)),
            "triangle" => Ok(Self::Triangle),
            "triangle-tail" => Ok(Self::TriangleWithTail),
            "h" => Ok(Self::HGraph),
            "loop-tail" => Ok(Self::LoopWithTail),
            _ => Err(format!("unknown graph family: {s}")),
        }
    }
}
