//! Five-cycle ensemble with the reference parameters.
//!
//! Prints each cycle's λ, v_peak, helicity and net L, then the ensemble
//! mean and spread of λ, and the per-phase net L history of the first cycle.
//!
//! Run with:
//!   cargo run --release --example five_cycles

use chirality_echo_sim::prelude::*;
use chirality_echo_sim::report::cycle_line;

fn main() {
    let config = CycleConfig::default();
    let ensemble = EnsembleConfig::default();

    let result = match run_ensemble(&config, &ensemble) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    for (i, cycle) in result.cycles.iter().enumerate() {
        println!("{}", cycle_line(i, cycle));
    }
    println!();
    println!("Mean λ = {:.4} ± {:.4}", result.mean_lambda, result.std_lambda);
    println!();

    let first = &result.cycles[0];
    println!("Net L through cycle 1:");
    println!("  {:>24}  {:>14}", "Phase", "Net L");
    println!("  {:─>24}  {:─>14}", "", "");
    for (phase, net) in &first.phases.history {
        println!("  {:>24}  {:>14.4}", phase.to_string(), net);
    }
}
