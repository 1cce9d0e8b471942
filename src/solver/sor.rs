//! Successive over-relaxation.
//!
//! One sweep visits the unknowns in increasing index order and overwrites
//! each in place with
//!
//! ```text
//! x[i] ← (1 − ω)·x[i] + (ω / a_ii)·(b[i] − σ_i),    σ_i = Σ_{j≠i} a_ij·x[j]
//! ```
//!
//! Because the update is in place, σ_i reads values already relaxed in this
//! sweep for j < i and values from the previous sweep for j > i. For the
//! five-point Laplacian in row-major order that means fresh north/west and
//! stale south/east neighbours. The chain of dependencies makes a sweep
//! inherently sequential.
//!
//! ω = 1 is Gauss–Seidel. For the model problem the optimal factor is
//! 2/(1 + sin(πh)); see `GridSpec::optimal_omega`. The solver does not
//! restrict ω, so a diverging choice shows up as a growing residual or,
//! eventually, a `NumericInstability` error.

use std::fmt;

use num_traits::Float;

use crate::core::traits::{Indexing, InnerProduct, MatVec, RowSweep};
use crate::error::PoissonError;
use crate::solver::LinearSolver;
use crate::utils::convergence::{Convergence, SolveStats, Termination, residual_norm};

pub struct SorSolver<T> {
    omega: T,
    pub termination: Termination<T>,
}

impl<T: Float> SorSolver<T> {
    pub fn new(omega: T, termination: Termination<T>) -> Self {
        Self { omega, termination }
    }

    /// Exactly `sweeps` sweeps.
    pub fn fixed(omega: T, sweeps: usize) -> Self {
        Self::new(omega, Termination::Fixed(sweeps))
    }

    /// Sweep until ‖A·x − b‖ < `tol`, at most `max_iters` times.
    pub fn until_residual(omega: T, tol: T, max_iters: usize) -> Self {
        Self::new(omega, Termination::Residual(Convergence { tol, max_iters }))
    }

    pub fn omega(&self) -> T {
        self.omega
    }

    pub fn set_omega(&mut self, omega: T) {
        self.omega = omega;
    }

    /// One in-place sweep over `x`. `sweep` only labels errors.
    pub fn sweep<A>(&self, a: &A, b: &[T], x: &mut [T], sweep: usize) -> Result<(), PoissonError>
    where
        A: RowSweep<T> + Indexing,
    {
        let n = a.nrows();
        for len in [b.len(), x.len()] {
            if len != n {
                return Err(PoissonError::DimensionMismatch { expected: n, found: len });
            }
        }
        let keep = T::one() - self.omega;
        for i in 0..x.len() {
            let sigma = a.off_diagonal_dot(i, x);
            let updated = keep * x[i] + self.omega / a.diagonal(i) * (b[i] - sigma);
            if !updated.is_finite() {
                return Err(PoissonError::NumericInstability(format!(
                    "unknown {i} became non-finite during sweep {sweep}"
                )));
            }
            x[i] = updated;
        }
        Ok(())
    }
}

impl<T> fmt::Display for SorSolver<T>
where
    T: Float + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.termination {
            Termination::Fixed(k) => write!(f, "SOR(omega={}, sweeps={})", self.omega, k),
            Termination::Residual(c) => write!(
                f,
                "SOR(omega={}, tol={}, max_sweeps={})",
                self.omega, c.tol, c.max_iters
            ),
        }
    }
}

fn check_diagonal<A, T>(a: &A, n: usize) -> Result<(), PoissonError>
where
    A: RowSweep<T>,
    T: Float,
{
    match (0..n).find(|&i| a.diagonal(i) == T::zero()) {
        Some(i) => Err(PoissonError::ZeroPivot(i)),
        None => Ok(()),
    }
}

impl<A, T> LinearSolver<A, Vec<T>> for SorSolver<T>
where
    A: RowSweep<T> + MatVec<Vec<T>> + Indexing,
    (): InnerProduct<Vec<T>, Scalar = T>,
    T: Float + From<f64> + fmt::LowerExp,
{
    type Error = PoissonError;
    type Scalar = T;

    /// Relaxes `x` in place, starting from its current contents.
    fn solve(&mut self, a: &A, b: &Vec<T>, x: &mut Vec<T>) -> Result<SolveStats<T>, PoissonError> {
        let n = a.nrows();
        for len in [b.len(), x.len()] {
            if len != n {
                return Err(PoissonError::DimensionMismatch { expected: n, found: len });
            }
        }
        check_diagonal(a, n)?;

        match self.termination {
            Termination::Fixed(sweeps) => {
                for k in 1..=sweeps {
                    self.sweep(a, b, x, k)?;
                }
                log::debug!("sor: {sweeps} fixed sweeps on {n} unknowns");
                Ok(SolveStats { iterations: sweeps, final_residual: None, converged: false })
            }
            Termination::Residual(conv) => {
                let mut r = vec![T::zero(); n];
                let res0 = residual_norm(a, b, x, &mut r)?;
                let mut stats = SolveStats {
                    iterations: 0,
                    final_residual: Some(res0),
                    converged: res0 < conv.tol,
                };
                if !stats.converged {
                    for k in 1..=conv.max_iters {
                        self.sweep(a, b, x, k)?;
                        let res = residual_norm(a, b, x, &mut r)?;
                        log::trace!("sor: sweep {k} residual {res:e}");
                        let (stop, s) = conv.check(res, k);
                        stats = s;
                        if stop {
                            break;
                        }
                    }
                }
                if stats.converged {
                    log::debug!("sor: converged after {} sweeps on {n} unknowns", stats.iterations);
                } else {
                    log::warn!(
                        "sor: no convergence after {} sweeps (residual {:e}, tol {:e})",
                        stats.iterations,
                        res_or_nan(&stats),
                        conv.tol
                    );
                }
                Ok(stats)
            }
        }
    }
}

fn res_or_nan<T: Float>(stats: &SolveStats<T>) -> T {
    stats.final_residual.unwrap_or_else(T::nan)
}
