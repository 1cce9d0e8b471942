// SparseMatrix trait and a compressed sparse row implementation

use faer::Mat;
use num_traits::Float;

use crate::core::traits::{Indexing, MatVec, RowSweep};
use crate::error::PoissonError;

/// A read‐only sparse matrix supporting y = A * x.
pub trait SparseMatrix<T> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Number of stored entries.
    fn nnz(&self) -> usize;
    /// Compute y = A * x.  `x.len() == ncols()`, `y.len() == nrows()`.
    fn spmv(&self, x: &[T], y: &mut [T]);
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, PoissonError> {
        if row_ptr.len() != nrows + 1 {
            return Err(PoissonError::DimensionMismatch { expected: nrows + 1, found: row_ptr.len() });
        }
        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz || values.len() != nnz {
            return Err(PoissonError::DimensionMismatch {
                expected: nnz,
                found: col_idx.len().min(values.len()),
            });
        }
        if row_ptr.windows(2).any(|w| w[0] > w[1]) || row_ptr[0] != 0 {
            return Err(PoissonError::InvalidConfiguration("row pointers must start at 0 and not decrease".into()));
        }
        if let Some(&j) = col_idx.iter().find(|&&j| j >= ncols) {
            return Err(PoissonError::InvalidConfiguration(format!("column index {j} out of range")));
        }
        Ok(Self { nrows, ncols, row_ptr, col_idx, values })
    }

    /// Stored (column, value) pairs of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let span = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[span.clone()].iter().copied().zip(self.values[span].iter().copied())
    }

    /// Entry (i, j), zero when not stored.
    pub fn get(&self, i: usize, j: usize) -> T {
        self.row(i)
            .filter(|&(c, _)| c == j)
            .fold(T::zero(), |acc, (_, v)| acc + v)
    }

    pub fn to_dense(&self) -> Mat<T> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.get(i, j))
    }

    fn row_dot(&self, i: usize, x: &[T]) -> T {
        self.row(i).fold(T::zero(), |acc, (j, v)| acc + v * x[j])
    }
}

impl<T: Float + Send + Sync> SparseMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
    fn nnz(&self) -> usize {
        self.values.len()
    }
    fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols);
        assert_eq!(y.len(), self.nrows);
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            y.par_iter_mut()
                .enumerate()
                .for_each(|(i, yi)| *yi = self.row_dot(i, x));
        }
        #[cfg(not(feature = "rayon"))]
        {
            for (i, yi) in y.iter_mut().enumerate() {
                *yi = self.row_dot(i, x);
            }
        }
    }
}

impl<T: Float + Send + Sync> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        self.spmv(x, y);
    }
}

impl<T: Float> RowSweep<T> for CsrMatrix<T> {
    fn diagonal(&self, i: usize) -> T {
        self.get(i, i)
    }

    fn off_diagonal_dot(&self, i: usize, x: &[T]) -> T {
        self.row(i)
            .filter(|&(j, _)| j != i)
            .fold(T::zero(), |acc, (j, v)| acc + v * x[j])
    }
}

impl<T> Indexing for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_spmv() {
        // 3×3 identity in CSR: row_ptr=[0,1,2,3], col_idx=[0,1,2], vals=[1,1,1]
        let m = CsrMatrix::from_csr(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![1.0, 1.0, 1.0]).unwrap();
        let x = vec![2.0, 3.0, 5.0];
        let mut y = vec![0.0; 3];
        m.spmv(&x, &mut y);
        assert_eq!(y, x);
    }

    #[test]
    fn rectangular_pattern() {
        // 2×3 matrix [[1,2,0],[0,3,4]]
        let m = CsrMatrix::from_csr(2, 3, vec![0, 2, 4], vec![0, 1, 1, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut y = vec![0.0; 2];
        m.spmv(&[1.0, 1.0, 1.0], &mut y);
        assert_eq!(y, vec![3.0, 7.0]);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.to_dense()[(1, 2)], 4.0);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(CsrMatrix::<f64>::from_csr(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
        assert!(CsrMatrix::<f64>::from_csr(1, 2, vec![0, 1], vec![5], vec![1.0]).is_err());
        assert!(CsrMatrix::<f64>::from_csr(1, 2, vec![0, 2], vec![0], vec![1.0]).is_err());
    }
}
