//! Core linear-algebra traits for the Poisson solvers.

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Inner products & norms.
pub trait InnerProduct<V> {
    /// Associated scalar type.
    type Scalar: Copy + PartialOrd + From<f64>;
    /// Compute dot(x, y).
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    /// Compute ‖x‖₂.
    fn norm(&self, x: &V) -> Self::Scalar;
}

/// Uniform indexing into vectors and operators.
pub trait Indexing {
    /// Number of rows (or length for a vector).
    fn nrows(&self) -> usize;
}

/// Row access needed by a Gauss–Seidel style relaxation.
///
/// A sweep visits rows in increasing order and overwrites `x[i]` in place,
/// so when `off_diagonal_dot(i, x)` runs, entries `j < i` already hold this
/// sweep's values and entries `j > i` still hold the previous sweep's.
pub trait RowSweep<T> {
    /// a_ii.
    fn diagonal(&self, i: usize) -> T;
    /// Σ_{j ≠ i} a_ij · x_j.
    fn off_diagonal_dot(&self, i: usize, x: &[T]) -> T;
}
