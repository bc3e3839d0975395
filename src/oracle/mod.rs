//! Ground-truth oracles for validating counting polynomials.
//!
//! Both oracles work on concrete numeric lengths and are independent of the
//! assembly pipeline.

pub mod simplex;
pub mod wavefront;

use crate::algebra::ExprError;
use crate::types::{EdgeId, VertexId};

pub use simplex::lattice_count;
pub use wavefront::{WavefrontSimulator, MERGE_EPSILON};

/// Error type for the oracles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    /// An edge length could not be evaluated.
    #[error("Cannot evaluate edge length: {0}")]
    Algebra(#[from] ExprError),
    /// An edge length is zero, negative or not finite.
    #[error("Edge {edge} has non-positive length {length}")]
    NonPositiveLength {
        /// The offending edge.
        edge: EdgeId,
        /// Its evaluated length.
        length: f64,
    },
    /// A simplex weight is zero or negative.
    #[error("Weight {index} is not positive")]
    NonPositiveWeight {
        /// Position of the weight.
        index: usize,
    },
    /// The source vertex is missing.
    #[error("Source vertex not found: {0}")]
    SourceNotFound(VertexId),
}
