//! Assembly policy definitions.

pub mod v1;

pub use v1::{AssemblyPolicy, CountingMode, DEFAULT_RK_CACHE_CAPACITY};
