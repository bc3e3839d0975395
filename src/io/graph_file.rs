//! The editor's `.graph` layout format.
//!
//! ```text
//! <nodeCount> <edgeCount>
//! <x> <y> <name>            (nodeCount lines)
//! <node1> <node2> <name>    (edgeCount lines)
//! ```
//!
//! Coordinates are editor positions in `[0, 1)`; they survive a round trip
//! but play no part in the computation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::algebra::{Expr, ExprError, Symbol};
use crate::types::{Graph, GraphError, VertexId};

/// Prefix of positional weight symbols `t_0, t_1, ...`.
pub const POSITIONAL_PREFIX: &str = "t";

/// Error type for `.graph` files.
#[derive(Debug, thiserror::Error)]
pub enum GraphFileError {
    /// Reading or writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The first line is not `<nodes> <edges>`.
    #[error("Line 1: expected '<nodeCount> <edgeCount>', got '{0}'")]
    InvalidHeader(String),
    /// Fewer lines than the header announces.
    #[error("Expected {expected} node and edge lines, found {found}")]
    Truncated {
        /// Lines announced by the header.
        expected: usize,
        /// Lines present.
        found: usize,
    },
    /// A node line is not `<x> <y> <name>`.
    #[error("Line {line}: expected '<x> <y> <name>', got '{text}'")]
    InvalidNode {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// An edge line is not `<node1> <node2> <name>`.
    #[error("Line {line}: expected '<node1> <node2> <name>', got '{text}'")]
    InvalidEdge {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// Two nodes share a name.
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),
    /// An edge names a node that does not exist.
    #[error("Line {line}: unknown node '{name}'")]
    UnknownNode {
        /// 1-based line number.
        line: usize,
        /// Missing node name.
        name: String,
    },
    /// An edge name is not a valid weight expression.
    #[error("Edge '{name}' is not a valid weight: {source}")]
    InvalidWeight {
        /// Edge name.
        name: String,
        /// Parse failure.
        source: ExprError,
    },
    /// The graph could not be built.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// How edge weights are derived from a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightNaming {
    /// Edge `i` (file order) gets the symbol `t_i`.
    #[default]
    Positional,
    /// Each edge name is parsed as its weight (`a`, `len_2`, `3`, `1/2`).
    EdgeNames,
}

/// A node with its editor position.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Unique node name.
    pub name: String,
}

/// An edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEdge {
    /// First endpoint name.
    pub node1: String,
    /// Second endpoint name.
    pub node2: String,
    /// Edge label.
    pub name: String,
}

/// Contents of a `.graph` file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphLayout {
    /// Nodes in file order; the first node is the source.
    pub nodes: Vec<LayoutNode>,
    /// Edges in file order.
    pub edges: Vec<LayoutEdge>,
}

impl GraphLayout {
    /// Parse layout text.
    pub fn parse(text: &str) -> Result<Self, GraphFileError> {
        let lines: Vec<&str> = text.lines().collect();
        let header = lines.first().copied().unwrap_or_default();
        let (node_count, edge_count) = parse_header(header)?;

        let expected = node_count
            .checked_add(edge_count)
            .ok_or_else(|| GraphFileError::InvalidHeader(header.to_string()))?;
        let body = &lines[1..];
        if body.len() < expected {
            return Err(GraphFileError::Truncated {
                expected,
                found: body.len(),
            });
        }

        let mut layout = GraphLayout::default();
        for (offset, text) in body[..node_count].iter().enumerate() {
            let line = offset + 2;
            let invalid = || GraphFileError::InvalidNode {
                line,
                text: text.to_string(),
            };
            let [x, y, name] = three_fields(text).ok_or_else(invalid)?;
            let x = f64::from_str(x).map_err(|_| invalid())?;
            let y = f64::from_str(y).map_err(|_| invalid())?;
            if layout.nodes.iter().any(|n| n.name == name) {
                return Err(GraphFileError::DuplicateNode(name.to_string()));
            }
            layout.nodes.push(LayoutNode {
                x,
                y,
                name: name.to_string(),
            });
        }

        for (offset, text) in body[node_count..expected].iter().enumerate() {
            let line = offset + node_count + 2;
            let [node1, node2, name] = three_fields(text).ok_or_else(|| GraphFileError::InvalidEdge {
                line,
                text: text.to_string(),
            })?;
            for endpoint in [node1, node2] {
                if !layout.nodes.iter().any(|n| n.name == endpoint) {
                    return Err(GraphFileError::UnknownNode {
                        line,
                        name: endpoint.to_string(),
                    });
                }
            }
            layout.edges.push(LayoutEdge {
                node1: node1.to_string(),
                node2: node2.to_string(),
                name: name.to_string(),
            });
        }
        Ok(layout)
    }

    /// Read a `.graph` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphFileError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Write a `.graph` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GraphFileError> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Lay out a graph on a circle, naming nodes and edges by their ids.
    pub fn from_graph(graph: &Graph) -> Self {
        let count = graph.num_vertices().max(1) as f64;
        let nodes = graph
            .vertices()
            .enumerate()
            .map(|(i, vertex)| {
                let angle = std::f64::consts::TAU * i as f64 / count;
                LayoutNode {
                    x: round_position(0.5 + 0.4 * angle.cos()),
                    y: round_position(0.5 + 0.4 * angle.sin()),
                    name: vertex.to_string(),
                }
            })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| LayoutEdge {
                node1: edge.begin.to_string(),
                node2: edge.end.to_string(),
                name: edge.id.get().to_string(),
            })
            .collect();
        Self { nodes, edges }
    }

    /// Build the `(vertexCount, edgeCount, Graph)` triple.
    ///
    /// Node `i` in file order becomes vertex `i`, so the first node is the
    /// source. Every node is added, isolated ones included.
    pub fn to_graph(&self, naming: WeightNaming) -> Result<(usize, usize, Graph), GraphFileError> {
        let index: BTreeMap<&str, VertexId> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.name.as_str(), VertexId::new(i as u32)))
            .collect();

        let mut graph = Graph::new();
        for vertex in index.values() {
            graph.add_vertex(*vertex)?;
        }
        for (i, edge) in self.edges.iter().enumerate() {
            let endpoint = |name: &str| {
                index.get(name).copied().ok_or_else(|| GraphFileError::UnknownNode {
                    line: self.nodes.len() + i + 2,
                    name: name.to_string(),
                })
            };
            let begin = endpoint(&edge.node1)?;
            let end = endpoint(&edge.node2)?;
            let weight = match naming {
                WeightNaming::Positional => Expr::symbol(Symbol::indexed(POSITIONAL_PREFIX, i)),
                WeightNaming::EdgeNames => {
                    Expr::parse(&edge.name).map_err(|source| GraphFileError::InvalidWeight {
                        name: edge.name.clone(),
                        source,
                    })?
                }
            };
            graph.add_edge(begin, end, weight)?;
        }
        Ok((self.nodes.len(), self.edges.len(), graph))
    }
}

impl fmt::Display for GraphLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.nodes.len(), self.edges.len())?;
        for node in &self.nodes {
            writeln!(f, "{} {} {}", node.x, node.y, node.name)?;
        }
        for edge in &self.edges {
            writeln!(f, "{} {} {}", edge.node1, edge.node2, edge.name)?;
        }
        Ok(())
    }
}

fn parse_header(header: &str) -> Result<(usize, usize), GraphFileError> {
    let invalid = || GraphFileError::InvalidHeader(header.to_string());
    let mut fields = header.split_whitespace();
    let nodes = fields.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let edges = fields.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    Ok((nodes, edges))
}

fn three_fields(line: &str) -> Option<[&str; 3]> {
    let mut fields = line.split_whitespace();
    let out = [fields.next()?, fields.next()?, fields.next()?];
    fields.next().is_none().then_some(out)
}

fn round_position(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}
