//! Options for the source term and the solution method.
//!
//! `SourceConfig` places the two charge plates on the unit square and
//! `MethodParams` carries the knobs of the selected `Method`. Both are plain
//! values handed to each solve; nothing here is process-wide.

use std::fmt;
use std::str::FromStr;

use crate::error::PoissonError;

/// Dipole plate geometry, as fractions of the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceConfig {
    /// Horizontal position of the positive plate.
    pub left: f64,
    /// Horizontal position of the negative plate.
    pub right: f64,
    /// Vertical extent of both plates, centred on the square.
    pub height: f64,
    /// Plate thickness in grid columns.
    pub thickness: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            left: 7.0 / 16.0,
            right: 9.0 / 16.0,
            height: 0.5,
            thickness: 1,
        }
    }
}

/// Solution method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// SOR with a fixed number of sweeps and no residual checks.
    SorFixed,
    /// SOR until the residual drops below a threshold.
    SorResidual,
    /// Dense LU solve of the assembled operator.
    Direct,
}

impl FromStr for Method {
    type Err = PoissonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "sor-fixed" => Ok(Method::SorFixed),
            "sor-residual" | "sor" => Ok(Method::SorResidual),
            "direct" | "lu" => Ok(Method::Direct),
            other => Err(PoissonError::InvalidConfiguration(format!(
                "unknown method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::SorFixed => "sor-fixed",
            Method::SorResidual => "sor-residual",
            Method::Direct => "direct",
        };
        f.write_str(name)
    }
}

/// Method parameters; fields a method does not use are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodParams {
    /// Relaxation factor ω; `None` selects the optimal value for the grid.
    pub omega: Option<f64>,
    /// Sweep count for `Method::SorFixed`.
    pub sweeps: usize,
    /// Absolute residual threshold for `Method::SorResidual`.
    pub threshold: f64,
    /// Sweep cap for `Method::SorResidual`.
    pub max_sweeps: usize,
}

impl Default for MethodParams {
    fn default() -> Self {
        Self {
            omega: None,
            sweeps: 100,
            threshold: 2.0 * f64::EPSILON,
            max_sweeps: 10_000,
        }
    }
}

impl MethodParams {
    pub fn with_omega(mut self, omega: f64) -> Self {
        self.omega = Some(omega);
        self
    }

    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    pub fn with_threshold(mut self, threshold: f64, max_sweeps: usize) -> Self {
        self.threshold = threshold;
        self.max_sweeps = max_sweeps;
        self
    }

    /// Rejects parameters `method` cannot run with.
    pub fn validate(&self, method: Method) -> Result<(), PoissonError> {
        if method == Method::Direct {
            return Ok(());
        }
        if let Some(omega) = self.omega {
            if !(omega > 0.0 && omega < 2.0) {
                return Err(PoissonError::InvalidConfiguration(format!(
                    "relaxation factor must lie in (0, 2), got {omega}"
                )));
            }
        }
        if method == Method::SorResidual {
            if !(self.threshold.is_finite() && self.threshold > 0.0) {
                return Err(PoissonError::InvalidConfiguration(format!(
                    "residual threshold must be positive and finite, got {}",
                    self.threshold
                )));
            }
            if self.max_sweeps == 0 {
                return Err(PoissonError::InvalidConfiguration(
                    "sweep cap must be at least 1".into(),
                ));
            }
        }
        Ok(())
    }
}
