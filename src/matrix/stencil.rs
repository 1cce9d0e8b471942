//! Matrix-free five-point Laplacian.
//!
//! `Laplacian5` applies the same operator that `OperatorBuilder` assembles,
//! but straight from the mesh: −4 on the unknown itself and 1 for every
//! interior N/S/W/E neighbour. Boundary neighbours hold the Dirichlet value
//! 0 and are skipped, so a product costs O(N) instead of O(N²).

use num_traits::Float;

use crate::core::traits::{Indexing, MatVec, RowSweep};
use crate::grid::{GridSpec, Neighbors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Laplacian5 {
    grid: GridSpec,
}

impl Laplacian5 {
    pub fn new(grid: GridSpec) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Sum of `x` over the interior stencil neighbours of unknown `i`.
    pub fn neighbor_sum<T: Float>(&self, i: usize, x: &[T]) -> T {
        let n = self.grid.interior_side();
        let present = self.grid.neighbors(i);
        let mut sum = T::zero();
        if present.contains(Neighbors::NORTH) {
            sum = sum + x[i - n];
        }
        if present.contains(Neighbors::WEST) {
            sum = sum + x[i - 1];
        }
        if present.contains(Neighbors::EAST) {
            sum = sum + x[i + 1];
        }
        if present.contains(Neighbors::SOUTH) {
            sum = sum + x[i + n];
        }
        sum
    }

    fn row<T: Float + From<f64>>(&self, i: usize, x: &[T]) -> T {
        let diag: T = (-4.0_f64).into();
        diag * x[i] + self.neighbor_sum(i, x)
    }
}

impl<T: Float + From<f64> + Send + Sync> MatVec<Vec<T>> for Laplacian5 {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        let n = self.grid.unknowns();
        assert_eq!(x.len(), n, "Input vector x has incorrect length");
        assert_eq!(y.len(), n, "Output vector y has incorrect length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            y.par_iter_mut()
                .enumerate()
                .for_each(|(i, yi)| *yi = self.row(i, x));
        }
        #[cfg(not(feature = "rayon"))]
        {
            for (i, yi) in y.iter_mut().enumerate() {
                *yi = self.row(i, x);
            }
        }
    }
}

/// North and west neighbours precede `i` in unknown order, south and east
/// follow it; relaxing in place therefore reads fresh values for the former
/// and previous-sweep values for the latter.
impl<T: Float + From<f64>> RowSweep<T> for Laplacian5 {
    fn diagonal(&self, _i: usize) -> T {
        (-4.0_f64).into()
    }

    fn off_diagonal_dot(&self, i: usize, x: &[T]) -> T {
        self.neighbor_sum(i, x)
    }
}

impl Indexing for Laplacian5 {
    fn nrows(&self) -> usize {
        self.grid.unknowns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_vector_sees_boundary_deficit() {
        // A·1 counts the missing neighbours: corners -2, edges -1, centre 0
        let op = Laplacian5::new(GridSpec::new(5).unwrap());
        let x = vec![1.0_f64; 9];
        let mut y = vec![0.0; 9];
        op.matvec(&x, &mut y);
        assert_eq!(y, vec![-2.0, -1.0, -2.0, -1.0, 0.0, -1.0, -2.0, -1.0, -2.0]);
    }

    #[test]
    fn neighbour_sum_does_not_wrap_rows() {
        let op = Laplacian5::new(GridSpec::new(5).unwrap());
        let x: Vec<f64> = (0..9).map(|v| v as f64).collect();
        // unknown 3 is the first in its row: north 0, east 4, south 6
        assert_eq!(op.neighbor_sum(3, &x), 10.0);
        // unknown 2 ends its row: west 1, south 5
        assert_eq!(op.neighbor_sum(2, &x), 6.0);
    }
}
