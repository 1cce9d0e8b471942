//! Right-hand side construction.

pub mod plates;

pub use plates::{PlateLayout, SourceBuilder};
