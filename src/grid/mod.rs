//! Mesh description, boundary predicate and field conversions.

pub mod field;
pub mod spec;

pub use field::{interior_vector, potential_field};
pub use spec::{GridSpec, Neighbors};
