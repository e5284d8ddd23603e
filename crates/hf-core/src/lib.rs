//! hf-core: stable foundation for hydroflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - flow (scalar flow value with an explicit undefined state)
//! - ids (stable compact IDs for network elements)
//! - error (shared error types)

pub mod error;
pub mod flow;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HfError, HfResult};
pub use flow::Flow;
pub use ids::*;
pub use numeric::*;
