//! Exact symbolic scalars.

pub mod symbol;
pub mod expr;
pub mod parse;
pub mod render;

pub use symbol::Symbol;
pub use expr::{Expr, ExprError, Monomial};
pub use parse::parse_rational;
