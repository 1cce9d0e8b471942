//! Solve entry point for the dipole-plate Poisson problem.
//!
//! `PoissonContext` bundles the mesh, the plate geometry, the chosen
//! [`Method`] and its [`MethodParams`]. Construction validates all of them,
//! so configuration errors surface before any assembly or iteration.
//! [`PoissonContext::solve`] then builds the right-hand side, runs the
//! selected solver and returns the potential field with diagnostics.
//!
//! # Usage
//!
//! ```rust,ignore
//! let grid = GridSpec::new(65)?;
//! let ctx = PoissonContext::new(grid, SourceConfig::default(), Method::SorResidual, MethodParams::default())?;
//! let solution = ctx.solve()?;
//! println!("{} sweeps in {:?}", solution.diagnostics.sweeps, solution.diagnostics.elapsed);
//! ```

use std::time::{Duration, Instant};

use faer::Mat;

use crate::config::{Method, MethodParams, SourceConfig};
use crate::error::PoissonError;
use crate::grid::{GridSpec, potential_field};
use crate::matrix::OperatorBuilder;
use crate::solver::{LinearSolver, LuSolver, SorSolver};
use crate::source::SourceBuilder;
use crate::utils::convergence::SolveStats;

/// What a solve reports besides the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub method: Method,
    /// Relaxation factor used; `None` for the direct solve.
    pub omega: Option<f64>,
    /// SOR sweeps performed (1 for the direct solve).
    pub sweeps: usize,
    /// ‖A·x − b‖ at exit, when it was evaluated.
    pub residual: Option<f64>,
    /// `false` when a residual-driven run hit its sweep cap.
    pub converged: bool,
    /// Wall time of the solver alone, excluding source assembly.
    pub elapsed: Duration,
}

impl Diagnostics {
    fn new(method: Method, omega: Option<f64>, stats: SolveStats<f64>, elapsed: Duration) -> Self {
        Self {
            method,
            omega,
            sweeps: stats.iterations,
            residual: stats.final_residual,
            converged: stats.converged,
            elapsed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    /// M×M potential: zero boundary, interior `-x`.
    pub field: Mat<f64>,
    /// Interior unknowns in row-major order.
    pub x: Vec<f64>,
    pub diagnostics: Diagnostics,
}

/// Context and configuration for one Poisson solve.
#[derive(Debug, Clone, Copy)]
///
/// Fields are only set through [`PoissonContext::new`], which validates them.
pub struct PoissonContext {
    grid: GridSpec,
    source: SourceConfig,
    method: Method,
    params: MethodParams,
}

impl PoissonContext {
    pub fn new(
        grid: GridSpec,
        source: SourceConfig,
        method: Method,
        params: MethodParams,
    ) -> Result<Self, PoissonError> {
        params.validate(method)?;
        SourceBuilder::new(grid, &source)?;
        Ok(Self { grid, source, method, params })
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn params(&self) -> &MethodParams {
        &self.params
    }

    /// ω for SOR runs: the configured value or the optimum for the mesh.
    pub fn omega(&self) -> f64 {
        self.params.omega.unwrap_or_else(|| self.grid.optimal_omega())
    }

    /// b = h²·g on the interior unknowns.
    pub fn rhs(&self) -> Result<Vec<f64>, PoissonError> {
        SourceBuilder::new(self.grid, &self.source)?.rhs()
    }

    pub fn solve(&self) -> Result<Solution, PoissonError> {
        let b = self.rhs()?;
        self.solve_rhs(&b)
    }

    /// Solves A·x = b for a caller-supplied right-hand side.
    pub fn solve_rhs(&self, b: &Vec<f64>) -> Result<Solution, PoissonError> {
        let ops = OperatorBuilder::new(self.grid);
        let mut x = vec![0.0; self.grid.unknowns()];
        let (omega, stats, elapsed) = match self.method {
            Method::SorFixed | Method::SorResidual => {
                let omega = self.omega();
                let mut solver = match self.method {
                    Method::SorFixed => SorSolver::fixed(omega, self.params.sweeps),
                    _ => SorSolver::until_residual(omega, self.params.threshold, self.params.max_sweeps),
                };
                log::debug!("solve: {} on {} unknowns", solver, self.grid.unknowns());
                let op = ops.stencil();
                let start = Instant::now();
                let stats = solver.solve(&op, b, &mut x)?;
                (Some(omega), stats, start.elapsed())
            }
            Method::Direct => {
                let a: Mat<f64> = ops.dense();
                let mut solver = LuSolver::new();
                let start = Instant::now();
                let stats = solver.solve(&a, b, &mut x)?;
                (None, stats, start.elapsed())
            }
        };
        let diagnostics = Diagnostics::new(self.method, omega, stats, elapsed);
        log::debug!(
            "solve: {} finished in {:?} ({} sweeps, residual {:?})",
            self.method,
            diagnostics.elapsed,
            diagnostics.sweeps,
            diagnostics.residual
        );
        Ok(Solution {
            field: potential_field(&self.grid, &x)?,
            x,
            diagnostics,
        })
    }
}

/// Validates the configuration, then solves; see [`PoissonContext::solve`].
pub fn solve(
    grid: GridSpec,
    source: SourceConfig,
    method: Method,
    params: MethodParams,
) -> Result<Solution, PoissonError> {
    PoissonContext::new(grid, source, method, params)?.solve()
}

/// Residual-driven SOR and the direct solve on the same system.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub sor: Solution,
    pub direct: Solution,
    /// max_i |x_sor[i] − x_direct[i]|.
    pub max_abs_diff: f64,
}

/// Runs SOR (residual mode) and LU side by side; with `rayon` they run concurrently.
pub fn compare(
    grid: GridSpec,
    source: SourceConfig,
    params: MethodParams,
) -> Result<Comparison, PoissonError> {
    let sor_ctx = PoissonContext::new(grid, source, Method::SorResidual, params)?;
    let direct_ctx = PoissonContext { method: Method::Direct, ..sor_ctx };
    let b = sor_ctx.rhs()?;

    #[cfg(feature = "rayon")]
    let (sor, direct) = rayon::join(|| sor_ctx.solve_rhs(&b), || direct_ctx.solve_rhs(&b));
    #[cfg(not(feature = "rayon"))]
    let (sor, direct) = (sor_ctx.solve_rhs(&b), direct_ctx.solve_rhs(&b));

    let (sor, direct) = (sor?, direct?);
    let max_abs_diff = sor
        .x
        .iter()
        .zip(&direct.x)
        .map(|(s, d)| (s - d).abs())
        .fold(0.0, f64::max);
    Ok(Comparison { sor, direct, max_abs_diff })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_omega_outside_zero_two() {
        let grid = GridSpec::new(9).unwrap();
        for omega in [0.0, 2.0, 3.0, f64::NAN] {
            let params = MethodParams::default().with_omega(omega);
            let ctx = PoissonContext::new(grid, SourceConfig::default(), Method::SorFixed, params);
            assert!(matches!(ctx, Err(PoissonError::InvalidConfiguration(_))), "omega {omega}");
        }
    }

    #[test]
    fn accessors_report_validated_configuration() {
        let grid = GridSpec::new(9).unwrap();
        let params = MethodParams::default().with_omega(1.5);
        let ctx = PoissonContext::new(grid, SourceConfig::default(), Method::SorResidual, params).unwrap();
        assert_eq!(ctx.grid().side(), 9);
        assert_eq!(ctx.method(), Method::SorResidual);
        assert_eq!(ctx.params().omega, Some(1.5));
        assert_eq!(ctx.source().thickness, 1);
        assert_eq!(ctx.omega(), 1.5);
    }
}
