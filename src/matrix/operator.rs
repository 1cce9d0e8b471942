//! Assembly of the five-point Laplacian on the interior unknowns.
//!
//! The operator is block tridiagonal: diagonal blocks D are tridiagonal
//! with −4 on the diagonal and 1 beside it, and identity blocks couple
//! neighbouring mesh rows at offset M−2. Grid spacing is not folded in;
//! the right-hand side carries the h² factor instead.
//!
//! Three representations are available and agree entry for entry:
//! a dense `faer::Mat` for the LU reference solve, a `CsrMatrix`, and
//! the matrix-free `Laplacian5` used by SOR and residual checks.

use faer::Mat;
use num_traits::Float;

use crate::error::PoissonError;
use crate::grid::{GridSpec, Neighbors};
use crate::matrix::sparse::CsrMatrix;
use crate::matrix::stencil::Laplacian5;

const DIRECTIONS: [Neighbors; 4] = [Neighbors::NORTH, Neighbors::WEST, Neighbors::EAST, Neighbors::SOUTH];

#[derive(Debug, Clone, Copy)]
pub struct OperatorBuilder {
    grid: GridSpec,
}

impl OperatorBuilder {
    pub fn new(grid: GridSpec) -> Self {
        Self { grid }
    }

    /// A[i, j].
    pub fn entry(&self, i: usize, j: usize) -> f64 {
        if i == j {
            -4.0
        } else if DIRECTIONS.iter().any(|&d| self.grid.neighbor(i, d) == Some(j)) {
            1.0
        } else {
            0.0
        }
    }

    /// Dense N×N operator.
    pub fn dense<T: Float + From<f64>>(&self) -> Mat<T> {
        let n = self.grid.unknowns();
        if n > 10_000 {
            log::warn!("assembling a dense {n}x{n} operator");
        }
        Mat::from_fn(n, n, |i, j| self.entry(i, j).into())
    }

    /// Sparse operator, columns sorted within each row.
    pub fn csr<T: Float + From<f64>>(&self) -> Result<CsrMatrix<T>, PoissonError> {
        let n = self.grid.unknowns();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::with_capacity(5 * n);
        let mut values = Vec::with_capacity(5 * n);
        row_ptr.push(0);
        let (one, diag): (T, T) = (1.0_f64.into(), (-4.0_f64).into());
        for i in 0..n {
            let mut cols: Vec<usize> = DIRECTIONS
                .iter()
                .filter_map(|&d| self.grid.neighbor(i, d))
                .chain(std::iter::once(i))
                .collect();
            cols.sort_unstable();
            for j in cols {
                col_idx.push(j);
                values.push(if j == i { diag } else { one });
            }
            row_ptr.push(col_idx.len());
        }
        CsrMatrix::from_csr(n, n, row_ptr, col_idx, values)
    }

    /// Matrix-free operator.
    pub fn stencil(&self) -> Laplacian5 {
        Laplacian5::new(self.grid)
    }
}
