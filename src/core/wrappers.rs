//! Trait implementations for `faer::Mat` and `Vec<T>`.
//!
//! Dense matrices act as operators (mat-vec and row access for relaxation),
//! and `()` supplies the Euclidean inner product used by residual checks.
//! With the `rayon` feature the reductions run in parallel over fixed
//! chunks, so the summation order and the result do not depend on scheduling.

use crate::core::traits::{Indexing, InnerProduct, MatVec, RowSweep};
use faer::Mat;
use num_traits::Float;

/// Elements per partial sum in the dot product.
pub(crate) const DOT_CHUNK: usize = 4096;

/// Dense product `y = A * x`.
impl<T: Float> MatVec<Vec<T>> for Mat<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.nrows(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.ncols(), x.len(), "Input vector x has incorrect length");
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = (0..self.ncols()).fold(T::zero(), |acc, j| acc + self[(i, j)] * x[j]);
        }
    }
}

/// Row access over a dense matrix; every off-diagonal entry takes part.
impl<T: Float> RowSweep<T> for Mat<T> {
    fn diagonal(&self, i: usize) -> T {
        self[(i, i)]
    }

    fn off_diagonal_dot(&self, i: usize, x: &[T]) -> T {
        let mut sigma = T::zero();
        for j in (0..i).chain(i + 1..self.ncols()) {
            sigma = sigma + self[(i, j)] * x[j];
        }
        sigma
    }
}

/// Euclidean inner product and norm for vectors.
impl<T: Float + From<f64> + Send + Sync> InnerProduct<Vec<T>> for () {
    type Scalar = T;

    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            let partial: Vec<T> = x
                .par_chunks(DOT_CHUNK)
                .zip(y.par_chunks(DOT_CHUNK))
                .map(|(xc, yc)| {
                    xc.iter()
                        .zip(yc)
                        .fold(T::zero(), |acc, (xi, yi)| acc + *xi * *yi)
                })
                .collect();
            partial.into_iter().fold(T::zero(), |acc, v| acc + v)
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.chunks(DOT_CHUNK)
                .zip(y.chunks(DOT_CHUNK))
                .map(|(xc, yc)| {
                    xc.iter()
                        .zip(yc)
                        .fold(T::zero(), |acc, (xi, yi)| acc + *xi * *yi)
                })
                .fold(T::zero(), |acc, v| acc + v)
        }
    }

    fn norm(&self, x: &Vec<T>) -> T {
        self.dot(x, x).sqrt()
    }
}

impl<T> Indexing for Mat<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_off_diagonal_dot_skips_the_diagonal() {
        let a = Mat::from_fn(3, 3, |i, j| if i == j { -4.0 } else { 1.0 });
        let x = vec![1.0, 2.0, 3.0];
        assert_eq!(a.off_diagonal_dot(1, &x), 4.0);
        assert_eq!(RowSweep::diagonal(&a, 2), -4.0);
    }

    #[test]
    fn dot_sums_fixed_chunks_in_order() {
        let n = 3 * DOT_CHUNK + 17;
        let x: Vec<f64> = (0..n).map(|i| ((i * 7919) % 1013) as f64 * 1e-3 - 0.5).collect();
        let y: Vec<f64> = (0..n).map(|i| 1.0 / (1.0 + i as f64)).collect();
        let expected = x
            .chunks(DOT_CHUNK)
            .zip(y.chunks(DOT_CHUNK))
            .map(|(xc, yc)| xc.iter().zip(yc).fold(0.0, |acc, (a, b)| acc + a * b))
            .fold(0.0, |acc, v| acc + v);
        let ip = ();
        for _ in 0..10 {
            assert_eq!(ip.dot(&x, &y).to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn norm_matches_dot() {
        let x = vec![3.0, 4.0];
        let ip = ();
        assert_eq!(ip.dot(&x, &x), 25.0);
        assert_eq!(ip.norm(&x), 5.0);
    }
}
