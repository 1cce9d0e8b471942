//! Direct dense solve using Faer's full-pivoting LU.
//!
//! This is the reference path: it assembles nothing itself, factors the
//! dense operator it is handed and solves in place. Cost is O(N³) in the
//! number of unknowns, so it is meant for validating SOR on small meshes.
//!
//! # References
//! - Faer documentation: https://github.com/sarah-ek/faer-rs
//! - Golub & Van Loan, Matrix Computations

use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::traits::{ComplexField, RealField};
use faer::{Conj, Mat, MatMut};
use num_traits::{Float, Zero};

use crate::core::traits::InnerProduct;
use crate::error::PoissonError;
use crate::solver::LinearSolver;
use crate::utils::convergence::{SolveStats, residual_norm};

/// LU solver using full pivoting from Faer.
///
/// Keeps the last factorization so further right-hand sides can reuse it.
pub struct LuSolver<T> {
    factor: Option<FullPivLu<T>>,
}

impl<T: ComplexField + RealField> LuSolver<T> {
    pub fn new() -> Self {
        LuSolver { factor: None }
    }

    /// Whether a factorization is cached.
    pub fn is_factored(&self) -> bool {
        self.factor.is_some()
    }
}

impl<T> LuSolver<T>
where
    T: ComplexField + RealField + Float,
{
    /// Solve against the cached factorization.
    pub fn solve_cached(&self, b: &[T], x: &mut [T]) -> Result<(), PoissonError> {
        let factor = self
            .factor
            .as_ref()
            .ok_or_else(|| PoissonError::SingularMatrix("no factorization cached".into()))?;
        if b.len() != x.len() {
            return Err(PoissonError::DimensionMismatch { expected: b.len(), found: x.len() });
        }
        x.copy_from_slice(b);
        let n = x.len();
        factor.solve_in_place_with_conj(Conj::No, MatMut::from_column_major_slice_mut(x, n, 1));
        match x.iter().position(|v| !Float::is_finite(*v)) {
            Some(i) => Err(PoissonError::SingularMatrix(format!(
                "solution component {i} is not finite"
            ))),
            None => Ok(()),
        }
    }
}

/// Rejects matrices with an all-zero row or column.
fn check_structure<T: Float>(a: &Mat<T>) -> Result<(), PoissonError> {
    let (m, n) = (a.nrows(), a.ncols());
    if let Some(i) = (0..m).find(|&i| (0..n).all(|j| a[(i, j)] == T::zero())) {
        return Err(PoissonError::SingularMatrix(format!("row {i} is zero")));
    }
    if let Some(j) = (0..n).find(|&j| (0..m).all(|i| a[(i, j)] == T::zero())) {
        return Err(PoissonError::SingularMatrix(format!("column {j} is zero")));
    }
    Ok(())
}

/// Rejects a factorization whose smallest pivot is negligible next to the largest.
///
/// Full pivoting leaves a roundoff-sized pivot, not an exact zero, when the
/// matrix is numerically rank deficient.
fn check_pivots<T>(factor: &FullPivLu<T>) -> Result<(), PoissonError>
where
    T: ComplexField + RealField + Float + From<f64> + std::fmt::LowerExp,
{
    let u = factor.U();
    let n = u.nrows().min(u.ncols());
    if n == 0 {
        return Ok(());
    }
    let pivots: Vec<T> = (0..n).map(|i| Float::abs(u[(i, i)])).collect();
    let largest = pivots.iter().copied().fold(<T as Zero>::zero(), Float::max);
    let (k, smallest) = pivots
        .iter()
        .copied()
        .enumerate()
        .fold((0, largest), |acc, (i, p)| if p < acc.1 { (i, p) } else { acc });
    let cutoff = <T as From<f64>>::from(n as f64) * <T as Float>::epsilon() * largest;
    if largest == <T as Zero>::zero() || smallest <= cutoff {
        return Err(PoissonError::SingularMatrix(format!(
            "pivot {k} is {smallest:e} against a largest pivot of {largest:e}"
        )));
    }
    Ok(())
}

impl<T> LinearSolver<Mat<T>, Vec<T>> for LuSolver<T>
where
    T: ComplexField + RealField + Float + Copy + PartialOrd + From<f64> + std::fmt::LowerExp,
    (): InnerProduct<Vec<T>, Scalar = T>,
{
    type Error = PoissonError;
    type Scalar = T;

    /// Factor `a` and solve; `x` is overwritten. Reports the true residual.
    fn solve(&mut self, a: &Mat<T>, b: &Vec<T>, x: &mut Vec<T>) -> Result<SolveStats<T>, PoissonError> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(PoissonError::DimensionMismatch { expected: n, found: a.ncols() });
        }
        if b.len() != n {
            return Err(PoissonError::DimensionMismatch { expected: n, found: b.len() });
        }
        self.factor = None;
        check_structure(a)?;
        let factor = FullPivLu::new(a.as_ref());
        check_pivots(&factor)?;
        self.factor = Some(factor);
        x.resize(n, <T as Zero>::zero());
        self.solve_cached(b, x)?;
        let mut r = vec![<T as Zero>::zero(); n];
        let res = residual_norm(a, b, x, &mut r)?;
        let b_norm = ().norm(b);
        if res > Float::sqrt(<T as Float>::epsilon()) * b_norm {
            self.factor = None;
            return Err(PoissonError::SingularMatrix(format!(
                "residual {res:e} is large against |b| = {b_norm:e}"
            )));
        }
        log::debug!("lu: solved {n} unknowns directly");
        Ok(SolveStats {
            iterations: 1,
            final_residual: Some(res),
            converged: true,
        })
    }
}

impl<T: ComplexField + RealField> Default for LuSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}
