//! poisson-sor: finite-difference Poisson solves over Faer
//!
//! This crate discretizes Lu = g on the unit square with homogeneous Dirichlet
//! boundaries, assembles the five-point Laplacian and solves the system with
//! successive over-relaxation, or with a dense LU factorization as reference.

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod solver;
pub mod source;
pub mod utils;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::context::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::grid::*;
pub use crate::matrix::*;
pub use crate::solver::*;
pub use crate::source::*;

// Re-export SolveStats at the crate root for convenience
pub use utils::convergence::{SolveStats, Termination};
