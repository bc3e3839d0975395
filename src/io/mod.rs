//! File adapters: editor layouts in, polynomial artifacts out.

pub mod graph_file;
pub mod poly_file;

pub use graph_file::{GraphFileError, GraphLayout, LayoutEdge, LayoutNode, WeightNaming};
pub use poly_file::{poly_path_for, read_poly, write_poly, PolyFileError};
