//! Bounded-multiplicity route enumeration.
//!
//! A walk from the source may cross every edge at most twice. Each time the
//! walk stands on the target, the parity of every edge's crossing count is
//! recorded: an odd count contributes the edge length once, an even count
//! (including zero) contributes it twice. Walks with the same parity pattern
//! are one route.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::algebra::Expr;
use crate::types::{Edge, EdgeId, Graph, VertexId};

/// Crossing cap per edge.
const MAX_USES: u8 = 2;

/// Multiplicity of an edge length in a route length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coefficient {
    /// Crossed an odd number of times.
    Once,
    /// Crossed an even number of times.
    Twice,
}

impl Coefficient {
    /// Coefficient for a crossing count: `2 - uses % 2`.
    pub fn from_uses(uses: u8) -> Self {
        if uses % 2 == 1 {
            Self::Once
        } else {
            Self::Twice
        }
    }

    /// Numeric value, 1 or 2.
    pub fn value(self) -> i64 {
        match self {
            Self::Once => 1,
            Self::Twice => 2,
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One edge of a route with its coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTerm {
    /// Representative arc of the edge, for its id and weight.
    pub edge: Edge,
    /// How often the edge length counts.
    pub coefficient: Coefficient,
}

/// A reflection signature: one coefficient per edge of the subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Terms by ascending edge id.
    pub terms: Vec<RouteTerm>,
}

impl Route {
    /// Coefficient of an edge, if the edge belongs to the route's graph.
    pub fn coefficient(&self, id: EdgeId) -> Option<Coefficient> {
        self.terms
            .iter()
            .find(|term| term.edge.id == id)
            .map(|term| term.coefficient)
    }

    /// Coefficients by ascending edge id.
    pub fn signature(&self) -> Vec<Coefficient> {
        self.terms.iter().map(|term| term.coefficient).collect()
    }

    /// `Σ coefficient · weight` over all edges except `excluded`.
    pub fn inward_length(&self, excluded: Option<EdgeId>) -> Expr {
        self.terms
            .iter()
            .filter(|term| Some(term.edge.id) != excluded)
            .map(|term| term.edge.weight.scale_int(term.coefficient.value()))
            .sum()
    }

    /// `Σ weight` over the coefficient-1 edges except `excluded`.
    pub fn outward_length(&self, excluded: Option<EdgeId>) -> Expr {
        self.terms
            .iter()
            .filter(|term| term.coefficient == Coefficient::Once && Some(term.edge.id) != excluded)
            .map(|term| term.edge.weight.clone())
            .sum()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", term.edge.id, term.coefficient)?;
        }
        f.write_str("}")
    }
}

struct Frame {
    vertex: VertexId,
    next: usize,
    via: Option<usize>,
}

/// All distinct routes from `source` to `target` in `graph`.
///
/// Routes come in discovery order of a depth-first search that visits arcs
/// in adjacency order. When `source == target` the empty walk is the first
/// route (every coefficient 2).
pub fn all_routes(graph: &Graph, source: VertexId, target: VertexId) -> Vec<Route> {
    let ids: Vec<EdgeId> = graph.edge_ids().collect();
    let slots: BTreeMap<EdgeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut usage = vec![0u8; ids.len()];

    let mut seen: BTreeSet<Vec<Coefficient>> = BTreeSet::new();
    let mut routes = Vec::new();
    let mut record = |usage: &[u8]| {
        let signature: Vec<Coefficient> = usage.iter().map(|&u| Coefficient::from_uses(u)).collect();
        if seen.insert(signature.clone()) {
            let terms = ids
                .iter()
                .zip(signature)
                .filter_map(|(id, coefficient)| {
                    graph.edge(*id).map(|edge| RouteTerm {
                        edge: edge.clone(),
                        coefficient,
                    })
                })
                .collect();
            routes.push(Route { terms });
        }
    };

    if !graph.contains_vertex(source) {
        return Vec::new();
    }
    if source == target {
        record(&usage);
    }

    let mut stack = vec![Frame {
        vertex: source,
        next: 0,
        via: None,
    }];
    while let Some(frame) = stack.last_mut() {
        let arcs = graph.connectors(frame.vertex);
        let Some(arc) = arcs.get(frame.next) else {
            if let Some(slot) = frame.via {
                usage[slot] -= 1;
            }
            stack.pop();
            continue;
        };
        frame.next += 1;

        let Some(&slot) = slots.get(&arc.id) else {
            continue;
        };
        if usage[slot] >= MAX_USES {
            continue;
        }
        usage[slot] += 1;
        if arc.end == target {
            record(&usage);
        }
        stack.push(Frame {
            vertex: arc.end,
            next: 0,
            via: Some(slot),
        });
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    fn t(i: usize) -> Expr {
        Expr::symbol(format!("t_{i}"))
    }

    #[test]
    fn test_single_edge_routes() {
        let mut g = Graph::new();
        let e = g.add_edge(v(0), v(1), t(0)).unwrap();

        let home = all_routes(&g, v(0), v(0));
        assert_eq!(home.len(), 1);
        assert_eq!(home[0].coefficient(e), Some(Coefficient::Twice));

        let far = all_routes(&g, v(0), v(1));
        assert_eq!(far.len(), 1);
        assert_eq!(far[0].coefficient(e), Some(Coefficient::Once));
        assert_eq!(far[0].inward_length(None), t(0));
        assert_eq!(far[0].outward_length(None), t(0));
    }

    #[test]
    fn test_path_routes() {
        let mut g = Graph::new();
        let a = g.add_edge(v(0), v(1), t(0)).unwrap();
        let b = g.add_edge(v(1), v(2), t(1)).unwrap();

        let middle = all_routes(&g, v(0), v(1));
        assert_eq!(middle.len(), 1);
        assert_eq!(middle[0].signature(), vec![Coefficient::Once, Coefficient::Twice]);
        assert_eq!(middle[0].inward_length(None), t(0) + t(1).scale_int(2));
        assert_eq!(middle[0].outward_length(None), t(0));
        assert_eq!(middle[0].inward_length(Some(b)), t(0));
        assert_eq!(middle[0].coefficient(a), Some(Coefficient::Once));
    }

    #[test]
    fn test_parallel_edges_give_distinct_parities() {
        let mut g = Graph::new();
        g.add_edge(v(0), v(1), t(0)).unwrap();
        g.add_edge(v(0), v(1), t(1)).unwrap();

        let far = all_routes(&g, v(0), v(1));
        let signatures: BTreeSet<_> = far.iter().map(Route::signature).collect();
        assert_eq!(signatures.len(), far.len());
        assert!(signatures.contains(&vec![Coefficient::Once, Coefficient::Twice]));
        assert!(signatures.contains(&vec![Coefficient::Twice, Coefficient::Once]));
        // an odd number of odd edges is needed to end on the far side
        assert_eq!(far.len(), 2);

        let home = all_routes(&g, v(0), v(0));
        assert_eq!(home.len(), 2);
    }

    #[test]
    fn test_loop_parity() {
        let mut g = Graph::new();
        let l = g.add_edge(v(0), v(0), t(0)).unwrap();
        let home = all_routes(&g, v(0), v(0));
        let coefficients: BTreeSet<_> = home.iter().filter_map(|r| r.coefficient(l)).collect();
        assert_eq!(coefficients.len(), 2);
    }

    #[test]
    fn test_unknown_source() {
        let g = Graph::new();
        assert!(all_routes(&g, v(0), v(0)).is_empty());
    }
}
