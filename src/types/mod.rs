//! Core graph types.

pub mod ids;
pub mod edge;
pub mod graph;

pub use ids::{VertexId, EdgeId};
pub use edge::Edge;
pub use graph::{Graph, GraphError, GraphSignature, GraphRecord, EdgeRecord};
