//! Counting polynomial assembly.
//!
//! The assembler walks every connected sub-multigraph `S` of the input
//! containing the source and adds two families of terms:
//!
//! 1. **Primary**: for every vertex `v` of `S` and every route to `v`,
//!    `R_k` over the doubled weights of `S`, evaluated at the route's λ,
//!    times the number of edges at `v` that lie outside `S`.
//! 2. **Bridge**: for every vertex `v` of `S` cut off by a bridge `b`,
//!    `R_{k−1}` over the doubled weights of `S − b`, evaluated at the
//!    route's λ with `b` counted once.
//!
//! ## Algorithm
//!
//! ```text
//! Graph → connected_subgraphs → { all_routes, find_bridge } → R_k → N(T)
//! ```
//!
//! Both families are exact; no partial result is ever returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::algebra::{Expr, ExprError};
use crate::bridge::find_bridge;
use crate::canonical::Fingerprint;
use crate::policy::{AssemblyPolicy, CountingMode};
use crate::polynomial::CountingPolynomial;
use crate::routes::{all_routes, Route};
use crate::subgraphs::{connected_subgraphs, EnumerationError};
use crate::todd::{CacheStats, RkTable, ToddError, ToddPolynomial};
use crate::types::{Edge, EdgeId, Graph, GraphError, VertexId};

/// Error type for assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    /// Malformed graph.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    /// Todd engine failure, e.g. a zero edge weight.
    #[error("Todd engine error: {0}")]
    Todd(#[from] ToddError),
    /// Algebra failure.
    #[error("Algebra error: {0}")]
    Algebra(#[from] ExprError),
    /// Subgraph enumeration failure.
    #[error("Enumeration error: {0}")]
    Enumeration(#[from] EnumerationError),
    /// The policy's edge limit is exceeded.
    #[error("Graph has {edges} edges, policy allows at most {limit}")]
    TooManyEdges {
        /// Edges in the graph.
        edges: usize,
        /// Policy limit.
        limit: usize,
    },
    /// The source vertex is missing.
    #[error("Source vertex not found: {0}")]
    SourceNotFound(VertexId),
}

/// Counters collected during one assembly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Connected sub-multigraphs visited.
    pub subgraphs: usize,
    /// Routes evaluated, over all subgraphs and vertices.
    pub routes: usize,
    /// (subgraph, vertex) pairs with a bridge term.
    pub bridge_vertices: usize,
    /// Largest `R_k` order used.
    pub max_order: usize,
}

/// A counting polynomial with the provenance of its computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyReport {
    /// The result.
    pub polynomial: CountingPolynomial,
    /// Counting variant used.
    pub mode: CountingMode,
    /// Fingerprint of the input graph.
    pub graph_fingerprint: Fingerprint,
    /// Policy identifier.
    pub policy_id: String,
    /// Hash of the policy parameters.
    pub policy_hash: String,
    /// Counters.
    pub stats: AssemblyStats,
    /// When the computation finished.
    pub computed_at: DateTime<Utc>,
}

/// Assembles counting polynomials under a fixed policy.
///
/// Owns the `R_k` cache, so reusing one assembler across graphs reuses the
/// generic Todd polynomials.
#[derive(Debug)]
pub struct PolynomialAssembler {
    policy: AssemblyPolicy,
    rk: RkTable,
}

impl PolynomialAssembler {
    /// Create an assembler.
    pub fn new(policy: AssemblyPolicy) -> Self {
        let rk = RkTable::new(policy.rk_cache_capacity);
        Self { policy, rk }
    }

    /// Get the policy.
    pub fn policy(&self) -> &AssemblyPolicy {
        &self.policy
    }

    /// Statistics of the `R_k` cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.rk.stats()
    }

    /// Compute N(T) for `graph`.
    pub fn build(&self, graph: &Graph) -> Result<CountingPolynomial, AssemblyError> {
        self.assemble(graph).map(|(polynomial, _)| polynomial)
    }

    /// Compute N(T) together with its report.
    pub fn build_report(&self, graph: &Graph) -> Result<AssemblyReport, AssemblyError> {
        let (polynomial, stats) = self.assemble(graph)?;
        Ok(AssemblyReport {
            polynomial,
            mode: self.policy.mode,
            graph_fingerprint: graph.fingerprint(),
            policy_id: self.policy.policy_id().to_string(),
            policy_hash: self.policy.params_hash(),
            stats,
            computed_at: Utc::now(),
        })
    }

    fn check(&self, graph: &Graph) -> Result<(), AssemblyError> {
        if !graph.contains_vertex(self.policy.source) {
            return Err(AssemblyError::SourceNotFound(self.policy.source));
        }
        if let Some(limit) = self.policy.edge_limit {
            if graph.num_edges() > limit {
                return Err(AssemblyError::TooManyEdges {
                    edges: graph.num_edges(),
                    limit,
                });
            }
        }
        Ok(())
    }

    fn assemble(&self, graph: &Graph) -> Result<(CountingPolynomial, AssemblyStats), AssemblyError> {
        self.check(graph)?;
        let started = Instant::now();
        let source = self.policy.source;
        let length = Expr::from(&self.policy.length_symbol);

        let subgraphs = connected_subgraphs(graph, source)?;
        let mut stats = AssemblyStats {
            subgraphs: subgraphs.len(),
            ..AssemblyStats::default()
        };

        let mut primary = Expr::zero();
        let mut bridged = Expr::zero();
        for sub in &subgraphs {
            let rk = self.specialized(sub, None)?;
            stats.max_order = stats.max_order.max(rk.order());
            let mut sub_routes = 0;

            for vertex in sub.vertices() {
                let extra = graph.degree(vertex).saturating_sub(sub.degree(vertex));
                let bridge = find_bridge(sub, source, vertex);
                if extra == 0 && bridge.is_none() {
                    continue;
                }
                let routes = all_routes(sub, source, vertex);
                sub_routes += routes.len();

                if extra > 0 {
                    let total: Expr = routes
                        .iter()
                        .map(|route| rk.evaluate(&self.lambda(&length, route, None)))
                        .sum();
                    primary += total.scale_int(extra as i64);
                }

                if let Some(bridge) = bridge {
                    stats.bridge_vertices += 1;
                    let reduced = self.specialized(sub, Some(bridge.id))?;
                    for route in &routes {
                        let lambda = self.lambda(&length, route, Some(bridge));
                        bridged += reduced.evaluate(&lambda);
                    }
                }
            }

            stats.routes += sub_routes;
            tracing::debug!(
                signature = %sub.signature(),
                order = rk.order(),
                routes = sub_routes,
                "Processed sub-multigraph"
            );
        }

        let polynomial = CountingPolynomial::new(self.policy.length_symbol.clone(), primary + bridged);
        tracing::info!(
            mode = %self.policy.mode,
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            subgraphs = stats.subgraphs,
            routes = stats.routes,
            bridge_vertices = stats.bridge_vertices,
            degree = ?polynomial.degree(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Assembled counting polynomial"
        );
        Ok((polynomial, stats))
    }

    /// `R_k` over the doubled weights of `sub`, leaving out `skip`.
    fn specialized(&self, sub: &Graph, skip: Option<EdgeId>) -> Result<ToddPolynomial, AssemblyError> {
        let weights: Vec<Expr> = sub
            .edges()
            .filter(|edge| Some(edge.id) != skip)
            .map(|edge| edge.weight.scale_int(2))
            .collect();
        let generic = self.rk.get(weights.len())?;
        Ok(generic.specialize(&weights)?)
    }

    /// λ for a route; a bridge always counts its own weight once.
    fn lambda(&self, length: &Expr, route: &Route, bridge: Option<&Edge>) -> Expr {
        let skip = bridge.map(|b| b.id);
        let mut lambda = match self.policy.mode {
            CountingMode::Inward => length - &route.inward_length(skip),
            CountingMode::Outward => length + &route.outward_length(skip),
        };
        if let Some(bridge) = bridge {
            lambda -= &bridge.weight;
        }
        lambda
    }
}

impl Default for PolynomialAssembler {
    fn default() -> Self {
        Self::new(AssemblyPolicy::default())
    }
}

/// Compute the inward N(T) of a graph with source vertex 0.
///
/// `vertex_count` and `edge_count` are the sizes the caller declared when
/// building the graph; a disagreement is logged and otherwise ignored.
pub fn build(vertex_count: usize, edge_count: usize, graph: &Graph) -> Result<CountingPolynomial, AssemblyError> {
    if vertex_count != graph.num_vertices() || edge_count != graph.num_edges() {
        tracing::warn!(
            declared_vertices = vertex_count,
            declared_edges = edge_count,
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            "Declared graph size differs from the graph"
        );
    }
    PolynomialAssembler::default().build(graph)
}
