//! SOR against the direct LU reference.
//!
//! Covers the termination policies, the fixed-point and monotonicity
//! properties at the optimal relaxation factor, divergence detection, and
//! the `solve`/`compare` entry points on the dipole-plate problem.

use approx::assert_abs_diff_eq;
use faer::Mat;
use poisson_sor::config::{Method, MethodParams, SourceConfig};
use poisson_sor::context::{compare, solve};
use poisson_sor::error::PoissonError;
use poisson_sor::grid::GridSpec;
use poisson_sor::matrix::{CsrMatrix, OperatorBuilder};
use poisson_sor::solver::{LinearSolver, LuSolver, SorSolver};
use poisson_sor::source::SourceBuilder;
use poisson_sor::utils::convergence::residual_norm;

fn dipole_rhs(side: usize) -> (GridSpec, Vec<f64>) {
    let grid = GridSpec::new(side).unwrap();
    let b = SourceBuilder::new(grid, &SourceConfig::default()).unwrap().rhs().unwrap();
    (grid, b)
}

fn direct(grid: GridSpec, b: &Vec<f64>) -> Vec<f64> {
    let a: Mat<f64> = OperatorBuilder::new(grid).dense();
    let mut x = vec![0.0; grid.unknowns()];
    LuSolver::new().solve(&a, b, &mut x).unwrap();
    x
}

/// M = 5 with a hand-written right-hand side: SOR to 1e-10 matches LU to 1e-8.
#[test]
fn sor_matches_direct_on_five_point_mesh() {
    let grid = GridSpec::new(5).unwrap();
    let b = vec![1.0, -2.0, 0.5, 0.0, 3.0, 0.0, -1.0, 0.0, 2.0];
    let x_direct = direct(grid, &b);

    let op = OperatorBuilder::new(grid).stencil();
    let mut x = vec![0.0; 9];
    let mut solver = SorSolver::until_residual(grid.optimal_omega(), 1e-10, 1_000);
    let stats = solver.solve(&op, &b, &mut x).unwrap();
    assert!(stats.converged);
    assert!(stats.final_residual.unwrap() < 1e-10);
    for i in 0..9 {
        assert_abs_diff_eq!(x[i], x_direct[i], epsilon = 1e-8);
    }
}

/// b = 0 from x = 0 is already solved: no sweeps, zero residual.
#[test]
fn zero_source_terminates_immediately() {
    let grid = GridSpec::new(9).unwrap();
    let op = OperatorBuilder::new(grid).stencil();
    let b = vec![0.0; grid.unknowns()];
    let mut x = vec![0.0; grid.unknowns()];
    let mut solver = SorSolver::until_residual(grid.optimal_omega(), 2.0 * f64::EPSILON, 100);
    let stats = solver.solve(&op, &b, &mut x).unwrap();
    assert_eq!(stats.iterations, 0);
    assert_eq!(stats.final_residual, Some(0.0));
    assert!(stats.converged);
    assert!(x.iter().all(|&v| v == 0.0));
}

/// One more sweep on a converged iterate changes nothing.
#[test]
fn converged_iterate_is_a_fixed_point() {
    let (grid, b) = dipole_rhs(9);
    let op = OperatorBuilder::new(grid).stencil();
    let omega = grid.optimal_omega();
    let mut x = vec![0.0; grid.unknowns()];
    let stats = SorSolver::until_residual(omega, 1e-13, 1_000).solve(&op, &b, &mut x).unwrap();
    assert!(stats.converged);

    let before = x.clone();
    SorSolver::fixed(omega, 1).sweep(&op, &b, &mut x, 1).unwrap();
    for (after, prev) in x.iter().zip(&before) {
        assert_abs_diff_eq!(*after, *prev, epsilon = 1e-12);
    }
}

/// At ω* the residual never grows from one sweep to the next.
#[test]
fn residual_decreases_monotonically_at_optimal_omega() {
    let (grid, b) = dipole_rhs(17);
    let op = OperatorBuilder::new(grid).stencil();
    let solver = SorSolver::fixed(grid.optimal_omega(), 1);
    let n = grid.unknowns();
    let (mut x, mut r) = (vec![0.0; n], vec![0.0; n]);
    let mut prev = residual_norm(&op, &b, &x, &mut r).unwrap();
    let mut sweeps = 0;
    while prev > 1e-12 {
        sweeps += 1;
        assert!(sweeps <= 500, "no convergence");
        solver.sweep(&op, &b, &mut x, sweeps).unwrap();
        let res = residual_norm(&op, &b, &x, &mut r).unwrap();
        assert!(res <= prev * (1.0 + 1e-9), "sweep {sweeps}: {res:e} > {prev:e}");
        prev = res;
    }
}

/// Stencil, dense and CSR operators produce the same SOR iterates.
#[test]
fn operator_representations_relax_identically() {
    let (grid, b) = dipole_rhs(8);
    let ops = OperatorBuilder::new(grid);
    let dense: Mat<f64> = ops.dense();
    let csr: CsrMatrix<f64> = ops.csr().unwrap();
    let stencil = ops.stencil();
    let n = grid.unknowns();
    let (mut x_s, mut x_d, mut x_c) = (vec![0.0; n], vec![0.0; n], vec![0.0; n]);
    let omega = 1.7;
    SorSolver::fixed(omega, 10).solve(&stencil, &b, &mut x_s).unwrap();
    SorSolver::fixed(omega, 10).solve(&dense, &b, &mut x_d).unwrap();
    SorSolver::fixed(omega, 10).solve(&csr, &b, &mut x_c).unwrap();
    for i in 0..n {
        assert_abs_diff_eq!(x_s[i], x_d[i], epsilon = 1e-14);
        assert_abs_diff_eq!(x_s[i], x_c[i], epsilon = 1e-14);
    }
}

/// ω beyond 2 diverges; the residual check exposes it.
#[test]
fn diverging_omega_is_reported_not_converged() {
    let (grid, b) = dipole_rhs(9);
    let op = OperatorBuilder::new(grid).stencil();
    let mut x = vec![0.0; grid.unknowns()];
    let mut r = vec![0.0; grid.unknowns()];
    let res0 = residual_norm(&op, &b, &x, &mut r).unwrap();
    let stats = SorSolver::until_residual(2.5, 1e-10, 200).solve(&op, &b, &mut x).unwrap();
    assert!(!stats.converged);
    assert_eq!(stats.iterations, 200);
    assert!(stats.final_residual.unwrap() > 1e6 * res0);
    assert!(matches!(
        stats.ensure_converged(),
        Err(PoissonError::NonConvergence { sweeps: 200, .. })
    ));
}

/// Left running long enough, divergence overflows and is caught.
#[test]
fn overflow_is_numeric_instability() {
    let (grid, b) = dipole_rhs(9);
    let op = OperatorBuilder::new(grid).stencil();
    let mut x = vec![0.0; grid.unknowns()];
    let err = SorSolver::fixed(2.5, 5_000).solve(&op, &b, &mut x).unwrap_err();
    assert!(matches!(err, PoissonError::NumericInstability(_)));
}

#[test]
fn fixed_budget_runs_exactly_k_sweeps() {
    let grid = GridSpec::new(11).unwrap();
    let params = MethodParams::default().with_sweeps(25);
    let solution = solve(grid, SourceConfig::default(), Method::SorFixed, params).unwrap();
    let d = &solution.diagnostics;
    assert_eq!(d.sweeps, 25);
    assert_eq!(d.residual, None);
    assert!(!d.converged);
    assert_abs_diff_eq!(d.omega.unwrap(), grid.optimal_omega(), epsilon = 1e-15);
}

/// Field layout: zero boundary, interior −x, and the dipole symmetries.
#[test]
fn direct_field_is_antisymmetric_dipole() {
    let grid = GridSpec::new(17).unwrap();
    let solution = solve(grid, SourceConfig::default(), Method::Direct, MethodParams::default()).unwrap();
    let u = &solution.field;
    assert_eq!((u.nrows(), u.ncols()), (17, 17));
    for k in 0..17 {
        assert_eq!(u[(0, k)], 0.0);
        assert_eq!(u[(16, k)], 0.0);
        assert_eq!(u[(k, 0)], 0.0);
        assert_eq!(u[(k, 16)], 0.0);
    }
    for i in 0..grid.unknowns() {
        let (row, col) = grid.coords(i);
        assert_eq!(u[(row + 1, col + 1)], -solution.x[i]);
    }
    // positive plate at column 7, negative plate mirrored at column 9
    assert!(u[(8, 7)] > 0.0);
    assert!(u[(8, 9)] < 0.0);
    for row in 1..16 {
        for col in 1..16 {
            assert_abs_diff_eq!(u[(row, col)], -u[(row, 16 - col)], epsilon = 1e-12);
            assert_abs_diff_eq!(u[(row, col)], u[(16 - row, col)], epsilon = 1e-12);
        }
    }
    assert!(solution.diagnostics.residual.unwrap() < 1e-12);
    assert_eq!(solution.diagnostics.omega, None);
}

#[test]
fn compare_agrees_on_dipole() {
    let grid = GridSpec::new(17).unwrap();
    let params = MethodParams::default().with_threshold(1e-12, 2_000);
    let cmp = compare(grid, SourceConfig::default(), params).unwrap();
    assert!(cmp.sor.diagnostics.converged);
    assert!(cmp.sor.diagnostics.sweeps > 1);
    assert_eq!(cmp.direct.diagnostics.method, Method::Direct);
    assert!(cmp.max_abs_diff < 1e-8, "max diff {}", cmp.max_abs_diff);
}

#[test]
fn invalid_configuration_is_rejected_before_solving() {
    let grid = GridSpec::new(9).unwrap();
    let bad_omega = MethodParams::default().with_omega(2.0);
    assert!(matches!(
        solve(grid, SourceConfig::default(), Method::SorResidual, bad_omega),
        Err(PoissonError::InvalidConfiguration(_))
    ));
    let bad_plates = SourceConfig { left: 0.9, right: 0.1, ..SourceConfig::default() };
    assert!(matches!(
        solve(grid, bad_plates, Method::Direct, MethodParams::default()),
        Err(PoissonError::InvalidConfiguration(_))
    ));
}

#[test]
fn singular_system_fails_only_the_direct_path() {
    let a = Mat::from_fn(3, 3, |i, j| if j == 2 { 0.0 } else { (i * 3 + j + 1) as f64 });
    let mut x = vec![0.0; 3];
    let err = LuSolver::new().solve(&a, &vec![1.0, 2.0, 3.0], &mut x).unwrap_err();
    assert!(matches!(err, PoissonError::SingularMatrix(_)));
}

/// Numerically rank-deficient: no zero row or column, but a roundoff-sized pivot.
#[test]
fn rank_deficient_dense_matrix_is_singular() {
    let a = Mat::from_fn(3, 3, |i, j| (3 * i + j + 1) as f64);
    let mut x = vec![0.0; 3];
    let err = LuSolver::new().solve(&a, &vec![1.0, 2.0, 4.0], &mut x).unwrap_err();
    assert!(matches!(err, PoissonError::SingularMatrix(_)), "{err:?}");

    // the same check leaves the Laplacian alone
    let grid = GridSpec::new(17).unwrap();
    let lap: Mat<f64> = OperatorBuilder::new(grid).dense();
    let b = vec![1.0; grid.unknowns()];
    let mut x = vec![0.0; grid.unknowns()];
    assert!(LuSolver::new().solve(&lap, &b, &mut x).unwrap().converged);
}
