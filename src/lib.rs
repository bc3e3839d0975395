//! # pc-polynomial
//!
//! Closed-form reflection-point counting for metric graphs.
//!
//! A wavefront leaves a source vertex and reflects at every vertex it
//! reaches. The number of wavefront points whose travelled distance is at
//! most `T` is, for generic edge lengths, a polynomial `N(T)` whose
//! coefficients are rational functions of the lengths. This crate computes
//! that polynomial exactly.
//!
//! ## Pipeline
//!
//! ```text
//! Graph → connected_subgraphs → { all_routes, find_bridge } → R_k (Todd) → N(T)
//! ```
//!
//! ## Guarantees
//!
//! - All arithmetic is exact (`Expr`, rational Laurent polynomials)
//! - Same graph + same policy → identical polynomial and fingerprint
//! - No partial results: any failure aborts the whole computation
//!
//! ## Limits
//!
//! Subgraph enumeration is exponential in the edge count. Graphs beyond
//! [`RECOMMENDED_EDGE_CEILING`] edges are accepted but slow; set
//! [`AssemblyPolicy::edge_limit`] to refuse them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algebra;
pub mod types;
pub mod canonical;
pub mod subgraphs;
pub mod routes;
pub mod bridge;
pub mod todd;
pub mod policy;
pub mod polynomial;
pub mod assembler;
pub mod tutte;
pub mod io;
pub mod oracle;
pub mod families;

// Re-exports
pub use algebra::{Expr, ExprError, Monomial, Symbol};
pub use types::{Edge, EdgeId, Graph, GraphError, GraphSignature, VertexId};
pub use canonical::{canonical_hash_hex, Fingerprint};
pub use subgraphs::{connected_subgraphs, EnumerationError, PowersetIterator};
pub use routes::{all_routes, Coefficient, Route, RouteTerm};
pub use bridge::find_bridge;
pub use todd::{build_rk, td, CacheStats, RkTable, ToddError, ToddPolynomial};
pub use policy::{AssemblyPolicy, CountingMode};
pub use polynomial::CountingPolynomial;
pub use assembler::{build, AssemblyError, AssemblyReport, AssemblyStats, PolynomialAssembler};
pub use tutte::{critical_polynomial, ehrhart_polynomial, tutte_polynomial};
pub use io::{GraphFileError, GraphLayout, PolyFileError, WeightNaming};
pub use oracle::{lattice_count, OracleError, WavefrontSimulator};
pub use families::Family;

/// Default assembly policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "assembly_policy_v1";

/// Source vertex used when none is configured.
pub const DEFAULT_SOURCE: VertexId = VertexId::new(0);

/// Name of the distance variable of N.
pub const LENGTH_SYMBOL: &str = "T";

/// Name of the free variable of `R_k`.
pub const LAMBDA_SYMBOL: &str = "lambda";

/// Largest edge count with interactive running times.
pub const RECOMMENDED_EDGE_CEILING: usize = 10;
