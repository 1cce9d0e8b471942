//! Charge-plate source term.
//!
//! Two vertical plates of opposite sign sit inside a horizontal band
//! centred on the square. Along its height each plate carries the quartic
//! profile `0.3 + c·(row − (M−1)/2)⁴` with `c = (2/(bottom − top))⁴`, so the
//! charge is 0.3 at the mesh centre row and grows towards the band edges.

use faer::Mat;

use crate::config::SourceConfig;
use crate::error::PoissonError;
use crate::grid::{GridSpec, interior_vector};

/// Plate placement resolved to mesh indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateLayout {
    /// First column of the positive plate.
    pub left: usize,
    /// First column of the negative plate.
    pub right: usize,
    /// First row of the band.
    pub top: usize,
    /// Last row of the band (inclusive).
    pub bottom: usize,
    /// Columns per plate.
    pub thickness: usize,
}

impl PlateLayout {
    /// Maps ratios on the unit square to mesh indices and checks they fit.
    pub fn resolve(grid: &GridSpec, config: &SourceConfig) -> Result<Self, PoissonError> {
        let invalid = |msg: String| Err(PoissonError::InvalidConfiguration(msg));
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(config.left) || !in_unit(config.right) || config.left >= config.right {
            return invalid(format!(
                "plate positions must satisfy 0 <= left < right <= 1, got {} and {}",
                config.left, config.right
            ));
        }
        if !(config.height.is_finite() && config.height > 0.0 && config.height <= 1.0) {
            return invalid(format!("plate height must lie in (0, 1], got {}", config.height));
        }
        if config.thickness == 0 {
            return invalid("plate thickness must be at least one column".into());
        }

        let span = (grid.side() - 1) as f64;
        let left = (span * config.left).floor() as usize;
        let right = (span * config.right).floor() as usize;
        let top = (span * (1.0 - config.height) / 2.0).floor() as usize;
        let bottom = top + (span * config.height).floor() as usize;

        if bottom <= top {
            return invalid(format!(
                "plate band collapses to a single row on a {0}x{0} mesh",
                grid.side()
            ));
        }
        if bottom >= grid.side() {
            return invalid(format!("plate band ends at row {bottom}, outside the mesh"));
        }
        if right + config.thickness > grid.side() {
            return invalid(format!(
                "negative plate spans columns {right}..{}, outside the mesh",
                right + config.thickness
            ));
        }
        if left + config.thickness > right {
            return invalid(format!(
                "plates overlap: columns {left}..{} and {right}..{}",
                left + config.thickness,
                right + config.thickness
            ));
        }
        Ok(Self { left, right, top, bottom, thickness: config.thickness })
    }

    fn in_band(&self, row: usize) -> bool {
        (self.top..=self.bottom).contains(&row)
    }
}

/// Builds the source field g and the right-hand side b = h²·g.
#[derive(Debug, Clone, Copy)]
pub struct SourceBuilder {
    grid: GridSpec,
    layout: PlateLayout,
}

impl SourceBuilder {
    pub fn new(grid: GridSpec, config: &SourceConfig) -> Result<Self, PoissonError> {
        let layout = PlateLayout::resolve(&grid, config)?;
        log::debug!("source: plates {:?} on a {}x{} mesh", layout, grid.side(), grid.side());
        Ok(Self { grid, layout })
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn layout(&self) -> PlateLayout {
        self.layout
    }

    /// Plate charge on `row`; meaningful only inside the band.
    pub fn profile(&self, row: usize) -> f64 {
        let normalizer = (2.0 / (self.layout.bottom - self.layout.top) as f64).powi(4);
        let centre = (self.grid.side() - 1) as f64 / 2.0;
        0.3 + normalizer * (row as f64 - centre).powi(4)
    }

    /// g at mesh point (row, col).
    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        let PlateLayout { left, right, thickness, .. } = self.layout;
        if !self.layout.in_band(row) {
            0.0
        } else if (left..left + thickness).contains(&col) {
            self.profile(row)
        } else if (right..right + thickness).contains(&col) {
            -self.profile(row)
        } else {
            0.0
        }
    }

    /// The full M×M source field.
    pub fn field(&self) -> Mat<f64> {
        let m = self.grid.side();
        Mat::from_fn(m, m, |row, col| self.value_at(row, col))
    }

    /// Right-hand side for the unscaled five-point operator: interior of g times h².
    pub fn rhs(&self) -> Result<Vec<f64>, PoissonError> {
        let h = self.grid.spacing();
        interior_vector(&self.grid, &self.field(), h * h)
    }
}
