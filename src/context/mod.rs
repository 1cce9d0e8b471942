//! Context module: configuring and running a complete Poisson solve.
//!
//! A context pairs the problem description (mesh and plate geometry) with
//! the method selection, validates both up front and dispatches to the
//! SOR or LU solver.
//!
//! Modules:
//! - [`poisson_context`]: `PoissonContext`, the `solve` entry point and `compare`.
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems. SIAM.
//! - Yang, S. & Gobbert, M. K. (2009). The optimal relaxation parameter for the SOR method applied to the Poisson equation in any space dimensions.

pub mod poisson_context;
pub use poisson_context::{Comparison, Diagnostics, PoissonContext, Solution, compare, solve};
