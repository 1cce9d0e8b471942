//! Operator representations of the five-point Laplacian.

pub mod operator;
pub mod sparse;
pub mod stencil;

pub use operator::OperatorBuilder;
pub use sparse::{CsrMatrix, SparseMatrix};
pub use stencil::Laplacian5;
