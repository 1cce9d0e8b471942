//! Conversions between full M×M fields and interior unknown vectors.

use faer::Mat;

use crate::error::PoissonError;
use crate::grid::spec::GridSpec;

/// Interior of `field` in unknown order, each value multiplied by `scale`.
pub fn interior_vector(grid: &GridSpec, field: &Mat<f64>, scale: f64) -> Result<Vec<f64>, PoissonError> {
    check_shape(grid, field)?;
    let n = grid.interior_side();
    Ok((0..grid.unknowns())
        .map(|i| field[(1 + i / n, 1 + i % n)] * scale)
        .collect())
}

/// Embeds a solution vector into an M×M field.
///
/// The boundary is zero and the interior holds `-x`, since the linear system
/// is solved for the negated potential.
pub fn potential_field(grid: &GridSpec, x: &[f64]) -> Result<Mat<f64>, PoissonError> {
    if x.len() != grid.unknowns() {
        return Err(PoissonError::DimensionMismatch {
            expected: grid.unknowns(),
            found: x.len(),
        });
    }
    let m = grid.side();
    Ok(Mat::from_fn(m, m, |row, col| match grid.interior_index(row, col) {
        Some(i) => -x[i],
        None => 0.0,
    }))
}

fn check_shape(grid: &GridSpec, field: &Mat<f64>) -> Result<(), PoissonError> {
    let m = grid.side();
    if field.nrows() != m {
        return Err(PoissonError::DimensionMismatch { expected: m, found: field.nrows() });
    }
    if field.ncols() != m {
        return Err(PoissonError::DimensionMismatch { expected: m, found: field.ncols() });
    }
    Ok(())
}
