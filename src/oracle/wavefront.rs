//! Discrete-event wavefront simulator.
//!
//! At time 0 one point leaves the source along every outgoing arc. Points
//! move at unit speed; when a point reaches the end of its arc it is
//! replaced by one new point on every arc leaving that vertex, the way
//! back included. Points reaching the same vertex at the same moment
//! (within [`MERGE_EPSILON`]) merge before spawning. The count at `T` is
//! the number of points alive after every event at or before `T`.
//!
//! Simultaneous arrivals at *different* vertices are all processed: each
//! of those vertices spawns its own points. An event loop that only
//! advances the single closest point and discards the other points due at
//! the same instant undercounts here. The two agree whenever no two
//! arrivals coincide, which holds for rationally independent lengths.

use std::collections::{BTreeMap, BTreeSet};

use super::OracleError;
use crate::algebra::Symbol;
use crate::types::{Graph, VertexId};

/// Time tolerance for simultaneous arrivals and for events at `T`.
pub const MERGE_EPSILON: f64 = 1e-9;

struct Segment {
    end: VertexId,
    length: f64,
}

/// Wavefront simulator over numeric edge lengths.
#[derive(Debug, Clone, Copy)]
pub struct WavefrontSimulator {
    epsilon: f64,
}

impl WavefrontSimulator {
    /// Create a simulator with the default tolerance.
    pub fn new() -> Self {
        Self {
            epsilon: MERGE_EPSILON,
        }
    }

    /// Use a different tolerance.
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Number of points alive at time `horizon`.
    ///
    /// `lengths` binds every symbol of the edge weights.
    pub fn count_at(
        &self,
        graph: &Graph,
        source: VertexId,
        lengths: &BTreeMap<Symbol, f64>,
        horizon: f64,
    ) -> Result<usize, OracleError> {
        if !graph.contains_vertex(source) {
            return Err(OracleError::SourceNotFound(source));
        }

        let mut edge_lengths = BTreeMap::new();
        for edge in graph.edges() {
            let length = edge.weight.evaluate(lengths)?;
            if !(length.is_finite() && length > 0.0) {
                return Err(OracleError::NonPositiveLength {
                    edge: edge.id,
                    length,
                });
            }
            edge_lengths.insert(edge.id, length);
        }

        let mut arcs = Vec::new();
        let mut outgoing: BTreeMap<VertexId, Vec<usize>> = BTreeMap::new();
        for vertex in graph.vertices() {
            let slots = outgoing.entry(vertex).or_default();
            for arc in graph.connectors(vertex) {
                slots.push(arcs.len());
                arcs.push(Segment {
                    end: arc.end,
                    length: edge_lengths.get(&arc.id).copied().unwrap_or(f64::INFINITY),
                });
            }
        }
        let spawn = |vertex: VertexId, into: &mut Vec<(usize, f64)>| {
            for &slot in outgoing.get(&vertex).map_or(&[][..], Vec::as_slice) {
                into.push((slot, arcs[slot].length));
            }
        };

        let mut points = Vec::new();
        spawn(source, &mut points);
        let mut clock = 0.0;
        let mut events = 0usize;
        while let Some(dt) = points.iter().map(|&(_, left)| left).reduce(f64::min) {
            if clock + dt > horizon + self.epsilon {
                break;
            }
            clock += dt;
            events += 1;

            let mut arrived = BTreeSet::new();
            let mut moving = Vec::with_capacity(points.len());
            for (slot, left) in points {
                if left - dt < self.epsilon {
                    arrived.insert(arcs[slot].end);
                } else {
                    moving.push((slot, left - dt));
                }
            }
            for vertex in arrived {
                spawn(vertex, &mut moving);
            }
            points = moving;
        }

        tracing::trace!(horizon, events, points = points.len(), "Wavefront simulated");
        Ok(points.len())
    }
}

impl Default for WavefrontSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Expr;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    fn unit_lengths(count: usize) -> BTreeMap<Symbol, f64> {
        (0..count).map(|i| (Symbol::indexed("t", i), 1.0)).collect()
    }

    fn graph(edges: &[(u32, u32)]) -> Graph {
        let mut g = Graph::new();
        for (i, &(a, b)) in edges.iter().enumerate() {
            g.add_edge(v(a), v(b), Expr::symbol(Symbol::indexed("t", i))).unwrap();
        }
        g
    }

    #[test]
    fn test_single_edge_keeps_one_point() {
        let g = graph(&[(0, 1)]);
        let sim = WavefrontSimulator::new();
        for horizon in [0.5, 1.0, 2.0, 5.0] {
            assert_eq!(sim.count_at(&g, v(0), &unit_lengths(1), horizon).unwrap(), 1);
        }
    }

    #[test]
    fn test_star_branches() {
        // three leaves: each reflection keeps one point per edge
        let g = graph(&[(0, 1), (0, 2), (0, 3)]);
        let sim = WavefrontSimulator::new();
        assert_eq!(sim.count_at(&g, v(0), &unit_lengths(3), 0.5).unwrap(), 3);
        assert_eq!(sim.count_at(&g, v(0), &unit_lengths(3), 1.5).unwrap(), 3);
        // all three return together and merge into one burst of three
        assert_eq!(sim.count_at(&g, v(0), &unit_lengths(3), 2.5).unwrap(), 3);
    }

    #[test]
    fn test_coincident_arrivals_at_distinct_vertices_all_spawn() {
        // leaves 1 and 2 are reached together at t = 1; the long edge to 3
        // still carries its first point
        let g = graph(&[(0, 1), (0, 2), (0, 3)]);
        let mut lengths = unit_lengths(3);
        lengths.insert(Symbol::indexed("t", 2), 2.0);
        let sim = WavefrontSimulator::new();
        assert_eq!(sim.count_at(&g, v(0), &lengths, 1.5).unwrap(), 3);
        // 1 and 2 return to 0 together and merge; 3 is reached at the same time
        assert_eq!(sim.count_at(&g, v(0), &lengths, 2.5).unwrap(), 4);
    }

    #[test]
    fn test_path_splits_at_middle() {
        let g = graph(&[(0, 1), (1, 2)]);
        let sim = WavefrontSimulator::new();
        assert_eq!(sim.count_at(&g, v(0), &unit_lengths(2), 0.5).unwrap(), 1);
        assert_eq!(sim.count_at(&g, v(0), &unit_lengths(2), 1.5).unwrap(), 2);
    }

    #[test]
    fn test_errors() {
        let g = graph(&[(0, 1)]);
        let sim = WavefrontSimulator::new();
        assert!(matches!(
            sim.count_at(&g, v(0), &BTreeMap::new(), 1.0),
            Err(OracleError::Algebra(_))
        ));
        let mut zero = unit_lengths(1);
        zero.insert(Symbol::indexed("t", 0), 0.0);
        assert!(matches!(
            sim.count_at(&g, v(0), &zero, 1.0),
            Err(OracleError::NonPositiveLength { .. })
        ));
        assert_eq!(
            sim.count_at(&g, v(7), &unit_lengths(1), 1.0),
            Err(OracleError::SourceNotFound(v(7)))
        );
    }
}
