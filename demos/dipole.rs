use std::env;

use poisson_sor::config::{Method, MethodParams, SourceConfig};
use poisson_sor::context::solve;
use poisson_sor::grid::GridSpec;

// usage: cargo run --example dipole -- [side] [sor-fixed|sor-residual|direct]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let side: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(65);
    let method: Method = args.next().map(|s| s.parse()).transpose()?.unwrap_or(Method::SorResidual);

    let grid = GridSpec::new(side)?;
    let solution = solve(grid, SourceConfig::default(), method, MethodParams::default())?;
    let d = &solution.diagnostics;
    println!(
        "{method} on {side}x{side}: {} sweeps, residual {:?}, converged {}, {:.3?}",
        d.sweeps, d.residual, d.converged, d.elapsed
    );

    // coarse look at the potential along the centre row
    let centre = side / 2;
    let step = (side / 16).max(1);
    let row: Vec<String> = (0..side)
        .step_by(step)
        .map(|c| format!("{:+.2e}", solution.field[(centre, c)]))
        .collect();
    println!("u[{centre}, ::{step}] = [{}]", row.join(", "));
    Ok(())
}
