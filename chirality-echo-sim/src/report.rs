//! Human-readable and JSON reports of ensemble runs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::simulation::{ConvergencePoint, CycleConfig, CycleResult, EnsembleConfig, EnsembleResult};

/// Everything needed to reproduce and inspect an ensemble run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleReport {
    pub config: CycleConfig,
    pub ensemble: EnsembleConfig,
    pub cycles: Vec<CycleResult>,
    pub mean_lambda: f64,
    pub std_lambda: f64,
    pub mean_v_peak: f64,
    pub positive_fraction: f64,
}

impl EnsembleReport {
    pub fn new(config: &CycleConfig, ensemble: &EnsembleConfig, result: EnsembleResult) -> Self {
        Self {
            config: config.clone(),
            ensemble: ensemble.clone(),
            mean_lambda: result.mean_lambda,
            std_lambda: result.std_lambda,
            mean_v_peak: result.mean_v_peak,
            positive_fraction: result.positive_fraction,
            cycles: result.cycles,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One summary line per cycle, numbered from 1.
pub fn cycle_line(index: usize, cycle: &CycleResult) -> String {
    format!(
        "Cycle {}: λ={:.4}, v_peak={:.0} km/s, Helicity={}, Net L={:.1}",
        index + 1,
        cycle.lambda,
        cycle.v_peak,
        cycle.helicity,
        cycle.net_l_post_reheat
    )
}

impl fmt::Display for EnsembleReport {
    /// Banner, per-cycle table and ensemble statistics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let foam = &self.config.foam;
        let reheating = &self.config.reheating;
        writeln!(f, "╔══════════════════════════════════════════════════════════╗")?;
        writeln!(f, "║     Chirality Echo Protocol: 3D String Network Cycle     ║")?;
        writeln!(f, "╚══════════════════════════════════════════════════════════╝")?;
        writeln!(f)?;
        writeln!(
            f,
            "  Grid:      {}³ → {}³ ({} strings, σ = {}, δχ = {:e})",
            foam.size,
            self.config.final_size(),
            foam.num_strings,
            foam.sigma,
            foam.delta_chi
        )?;
        writeln!(
            f,
            "  Reheating: {} steps, ε = {}, ω = {:.4}",
            reheating.num_steps, reheating.epsilon, reheating.omega
        )?;
        writeln!(
            f,
            "  Ensemble:  {} cycles, base seed {}",
            self.ensemble.cycles, self.ensemble.base_seed
        )?;
        writeln!(f)?;

        for (i, cycle) in self.cycles.iter().enumerate() {
            writeln!(f, "{}", cycle_line(i, cycle))?;
        }

        writeln!(f)?;
        writeln!(f, "Mean λ = {:.4} ± {:.4}", self.mean_lambda, self.std_lambda)?;
        writeln!(f, "Mean v_peak = {:.0} km/s", self.mean_v_peak)?;
        writeln!(f, "Positive helicity: {:.0}%", self.positive_fraction * 100.0)
    }
}

/// Render the banner, per-cycle table and ensemble statistics.
pub fn render_table(report: &EnsembleReport) -> String {
    report.to_string()
}

/// CSV of a convergence sweep: `size,lambda`.
pub fn render_convergence_csv(points: &[ConvergencePoint]) -> String {
    let mut out = String::from("size,lambda\n");
    for p in points {
        out.push_str(&format!("{},{:.6}\n", p.size, p.lambda));
    }
    out
}
