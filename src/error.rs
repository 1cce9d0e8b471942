use thiserror::Error;

// Unified error type for the Poisson solvers

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoissonError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no convergence after {sweeps} sweeps (residual {residual:e})")]
    NonConvergence { sweeps: usize, residual: f64 },
    #[error("singular matrix: {0}")]
    SingularMatrix(String),
    #[error("numeric instability: {0}")]
    NumericInstability(String),
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
