use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use faer::Mat;
use poisson_sor::config::SourceConfig;
use poisson_sor::grid::GridSpec;
use poisson_sor::matrix::OperatorBuilder;
use poisson_sor::solver::{LinearSolver, LuSolver, SorSolver};
use poisson_sor::source::SourceBuilder;

fn bench_sor_vs_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("dipole");
    for side in [17, 33] {
        let grid = GridSpec::new(side).unwrap();
        let b = SourceBuilder::new(grid, &SourceConfig::default()).unwrap().rhs().unwrap();
        let ops = OperatorBuilder::new(grid);
        let stencil = ops.stencil();
        let dense: Mat<f64> = ops.dense();
        let n = grid.unknowns();

        group.bench_with_input(BenchmarkId::new("sor", side), &side, |ben, _| {
            let mut solver = SorSolver::until_residual(grid.optimal_omega(), 1e-12, 10_000);
            ben.iter(|| {
                let mut x = vec![0.0; n];
                solver.solve(black_box(&stencil), black_box(&b), &mut x).unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("lu", side), &side, |ben, _| {
            let mut solver = LuSolver::new();
            ben.iter(|| {
                let mut x = vec![0.0; n];
                solver.solve(black_box(&dense), black_box(&b), &mut x).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sor_vs_direct);
criterion_main!(benches);
