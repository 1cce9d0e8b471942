//! Termination policies, residual evaluation and solve statistics.

use num_traits::Float;

use crate::core::traits::{InnerProduct, MatVec};
use crate::error::PoissonError;

/// Absolute residual criterion with a sweep cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: usize,
}

/// When an iterative solve stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination<T> {
    /// Exactly this many sweeps, residual never evaluated.
    Fixed(usize),
    /// Stop once ‖A·x − b‖ < tol, or give up after `max_iters` sweeps.
    Residual(Convergence<T>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveStats<T> {
    pub iterations: usize,
    /// ‖A·x − b‖ at exit; `None` when the policy never evaluated it.
    pub final_residual: Option<T>,
    /// Whether the residual criterion was met. Always `false` for fixed budgets.
    pub converged: bool,
}

impl<T: Float> SolveStats<T> {
    /// Turns an unconverged residual-driven run into `NonConvergence`.
    pub fn ensure_converged(&self) -> Result<(), PoissonError> {
        match self.final_residual {
            Some(res) if !self.converged => Err(PoissonError::NonConvergence {
                sweeps: self.iterations,
                residual: res.to_f64().unwrap_or(f64::NAN),
            }),
            _ => Ok(()),
        }
    }
}

impl<T: Copy + Float> Convergence<T> {
    /// Returns (should_stop, stats) given current `res_norm` after sweep `i`.
    pub fn check(&self, res_norm: T, i: usize) -> (bool, SolveStats<T>) {
        let converged = res_norm < self.tol;
        (
            converged || i >= self.max_iters,
            SolveStats {
                iterations: i,
                final_residual: Some(res_norm),
                converged,
            },
        )
    }
}

/// ‖A·x − b‖₂, using `r` as scratch. Fails on a non-finite result.
pub fn residual_norm<M, T>(a: &M, b: &Vec<T>, x: &Vec<T>, r: &mut Vec<T>) -> Result<T, PoissonError>
where
    M: MatVec<Vec<T>>,
    (): InnerProduct<Vec<T>, Scalar = T>,
    T: Float,
{
    a.matvec(x, r);
    for (ri, &bi) in r.iter_mut().zip(b) {
        *ri = *ri - bi;
    }
    let res = ().norm(r);
    if res.is_finite() {
        Ok(res)
    } else {
        Err(PoissonError::NumericInstability("residual is not finite".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_stops_on_tolerance_or_cap() {
        let conv = Convergence { tol: 1e-8, max_iters: 10 };
        let (stop, s) = conv.check(1e-9, 3);
        assert!(stop && s.converged);
        let (stop, s) = conv.check(1e-3, 3);
        assert!(!stop && !s.converged);
        let (stop, s) = conv.check(1e-3, 10);
        assert!(stop && !s.converged);
        assert!(matches!(
            s.ensure_converged(),
            Err(PoissonError::NonConvergence { sweeps: 10, .. })
        ));
    }

    #[test]
    fn fixed_budget_stats_are_never_escalated() {
        let s = SolveStats::<f64> { iterations: 5, final_residual: None, converged: false };
        assert!(s.ensure_converged().is_ok());
    }
}
