//! Solve configuration.

pub mod options;

pub use options::{Method, MethodParams, SourceConfig};
