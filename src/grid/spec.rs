//! Mesh geometry and the interior index map.
//!
//! A `GridSpec` describes an M×M mesh over the unit square with spacing
//! h = 1/(M−1). Only the (M−2)² interior points are unknowns; they are
//! numbered row-major, so unknown `i` sits at interior row `i / (M−2)` and
//! interior column `i % (M−2)`. Boundary points carry the homogeneous
//! Dirichlet value 0 and never appear in the unknown vector.

use std::f64::consts::PI;

use bitflags::bitflags;

use crate::error::PoissonError;

bitflags! {
    /// Interior neighbours of an unknown under the five-point stencil.
    ///
    /// A direction is absent when the neighbour lies on the boundary.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Neighbors: u8 {
        const NORTH = 0b0001;
        const SOUTH = 0b0010;
        const WEST  = 0b0100;
        const EAST  = 0b1000;
        const ALL   = Self::NORTH.bits() | Self::SOUTH.bits() | Self::WEST.bits() | Self::EAST.bits();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    side: usize,
}

impl GridSpec {
    /// Mesh with `side` points per edge, boundary included.
    pub fn new(side: usize) -> Result<Self, PoissonError> {
        if side < 3 {
            return Err(PoissonError::InvalidConfiguration(format!(
                "grid side must be at least 3, got {side}"
            )));
        }
        Ok(Self { side })
    }

    /// M.
    pub fn side(&self) -> usize {
        self.side
    }

    /// M − 2.
    pub fn interior_side(&self) -> usize {
        self.side - 2
    }

    /// N = (M − 2)².
    pub fn unknowns(&self) -> usize {
        self.interior_side() * self.interior_side()
    }

    /// h = 1/(M − 1).
    pub fn spacing(&self) -> f64 {
        1.0 / (self.side - 1) as f64
    }

    /// Optimal relaxation parameter for the five-point Laplacian: 2 / (1 + sin(πh)).
    pub fn optimal_omega(&self) -> f64 {
        2.0 / (1.0 + (PI * self.spacing()).sin())
    }

    /// Interior (row, col) of unknown `i`.
    pub fn coords(&self, i: usize) -> (usize, usize) {
        assert!(i < self.unknowns(), "unknown {i} out of range");
        let n = self.interior_side();
        (i / n, i % n)
    }

    /// Unknown index of interior point (row, col).
    pub fn index(&self, row: usize, col: usize) -> usize {
        let n = self.interior_side();
        assert!(row < n && col < n, "interior point ({row}, {col}) out of range");
        row * n + col
    }

    /// Unknown index of the full-mesh point (row, col), or `None` on the boundary.
    pub fn interior_index(&self, row: usize, col: usize) -> Option<usize> {
        let last = self.side - 1;
        if row == 0 || col == 0 || row >= last || col >= last {
            None
        } else {
            Some(self.index(row - 1, col - 1))
        }
    }

    /// Which stencil neighbours of `i` are unknowns.
    pub fn neighbors(&self, i: usize) -> Neighbors {
        let (row, col) = self.coords(i);
        let last = self.interior_side() - 1;
        let mut set = Neighbors::empty();
        set.set(Neighbors::NORTH, row > 0);
        set.set(Neighbors::SOUTH, row < last);
        set.set(Neighbors::WEST, col > 0);
        set.set(Neighbors::EAST, col < last);
        set
    }

    /// Unknown index of the neighbour of `i` in direction `dir`; `None` when it is boundary.
    ///
    /// `dir` must be a single direction.
    pub fn neighbor(&self, i: usize, dir: Neighbors) -> Option<usize> {
        if !self.neighbors(i).contains(dir) {
            return None;
        }
        let n = self.interior_side();
        if dir == Neighbors::NORTH {
            Some(i - n)
        } else if dir == Neighbors::SOUTH {
            Some(i + n)
        } else if dir == Neighbors::WEST {
            Some(i - 1)
        } else if dir == Neighbors::EAST {
            Some(i + 1)
        } else {
            None
        }
    }
}
