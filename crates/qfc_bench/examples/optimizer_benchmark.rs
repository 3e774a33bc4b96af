//! QFC Optimizer Benchmark
//!
//! Runs the direction optimizer over standard shapes and seeded random
//! lattices, then prints the markdown report.

use qfc_bench::prelude::*;
use qfc_engine::CollisionConfig;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                 QFC Direction Optimizer Benchmark                    ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let seed = 42u64;
    let sizes = [8usize, 12, 16];

    println!("Configuration:");
    println!("  • Seed: {}", seed);
    println!("  • Random lattice sizes: {:?}", sizes);
    println!("  • Frequency band: {} GHz", DEFAULT_BAND);
    println!();

    let mut suite = OptimizerSuite::with_seed(seed)
        .with_config(CollisionConfig::gate_err_half_pct().with_quiet_diagnostics(true));

    if let Err(e) = suite.run_shapes() {
        eprintln!("shape benchmark failed: {}", e);
        return;
    }
    for &n in &sizes {
        if let Err(e) = suite.run_random(10, n, n / 2, 0.05) {
            eprintln!("random benchmark ({} qubits) failed: {}", n, e);
            return;
        }
    }

    println!("{}", Reporter::to_markdown(suite.results()));

    let stats = suite.statistics();
    println!(
        "Removed {:.1}% of targeted collisions across {} cases",
        stats.reduction_rate() * 100.0,
        stats.count
    );
}
