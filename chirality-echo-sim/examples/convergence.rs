//! Convergence study: λ versus pre-inflation grid size N.
//!
//! Outputs CSV: size,lambda
//! followed by the spread across sizes.
//!
//! Run with:
//!   cargo run --release --example convergence

use chirality_echo_sim::prelude::*;

fn main() {
    let config = CycleConfig::default();
    let points = match convergence_sweep(&config, &DEFAULT_CONVERGENCE_SIZES, 42) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("sweep failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("size,lambda");
    for p in &points {
        println!("{},{:.6}", p.size, p.lambda);
    }

    let lambdas: Vec<f64> = points.iter().map(|p| p.lambda).collect();
    let mean = lambdas.iter().sum::<f64>() / lambdas.len() as f64;
    let spread = lambdas
        .iter()
        .map(|l| (l - mean).abs())
        .fold(0.0_f64, f64::max);
    println!();
    println!("# mean λ = {:.4}, max deviation = {:.4}", mean, spread);
}
