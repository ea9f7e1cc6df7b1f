//! Cycle and ensemble runner.
//!
//! One cycle:
//! 1. Generate the biased string foam on an n³ grid
//! 2. Contract (uniform scale)
//! 3. Big Flash reset (white-noise re-seeding)
//! 4. Inflate to (a·n)³ with 1/a^p dilution
//! 5. Reheat (parametric amplification + chiral injection)
//! 6. Measure net L, λ, v_peak and helicity
//!
//! Ensembles run independent cycles from derived seeds and report the mean
//! and population standard deviation of λ.

use std::fmt;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::foam::{generate_vorticity_grid, FoamConfig};
use crate::grid::{voxel_count, VorticityGrid};
use crate::observables::{Helicity, SpinImprint};
use crate::phases::{
    big_flash_reset, ekpyrotic_contraction, inflation_stretch, reheating_oscillations,
    InflationConfig, ReheatingConfig,
};

/// Seed stride between consecutive cycles of an ensemble.
const SEED_STRIDE: u64 = 7919;

/// Full configuration of a single CEP cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    pub foam: FoamConfig,
    /// Uniform scale applied during ekpyrotic contraction.
    pub ekpyrotic_scale: f64,
    /// White-noise amplitude of the Big Flash reset.
    pub flash_amplitude: f64,
    pub inflation: InflationConfig,
    pub reheating: ReheatingConfig,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            foam: FoamConfig::default(),
            ekpyrotic_scale: 1.0,
            flash_amplitude: 1e-8,
            inflation: InflationConfig::default(),
            reheating: ReheatingConfig::default(),
        }
    }
}

impl CycleConfig {
    /// Same configuration on a different pre-inflation grid size.
    pub fn with_size(&self, size: usize) -> Self {
        let mut config = self.clone();
        config.foam.size = size;
        config
    }

    pub fn validate(&self) -> Result<()> {
        self.foam.validate()?;
        self.inflation.validate()?;
        self.reheating.validate()?;
        if !self.ekpyrotic_scale.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "ekpyrotic_scale must be finite, got {}",
                self.ekpyrotic_scale
            )));
        }
        if !(self.flash_amplitude >= 0.0 && self.flash_amplitude.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "flash_amplitude must be non-negative and finite, got {}",
                self.flash_amplitude
            )));
        }
        let final_side = self
            .foam
            .size
            .checked_mul(self.inflation.stretch_factor)
            .filter(|&n| voxel_count(n).is_some());
        if final_side.is_none() {
            return Err(SimError::InvalidConfig(format!(
                "inflated grid {}×{} is too large",
                self.foam.size, self.inflation.stretch_factor
            )));
        }
        Ok(())
    }

    /// Side length of the grid after inflation, saturating for configs that
    /// fail [`validate`](Self::validate).
    pub fn final_size(&self) -> usize {
        self.foam.size.saturating_mul(self.inflation.stretch_factor)
    }
}

/// Named stages of a cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Foam,
    Contraction,
    Flash,
    Inflation,
    Reheating,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Foam => "pre-inflation foam",
            Phase::Contraction => "ekpyrotic contraction",
            Phase::Flash => "big flash reset",
            Phase::Inflation => "inflation stretch",
            Phase::Reheating => "reheating",
        };
        f.write_str(name)
    }
}

/// Records the net angular momentum after each phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTracker {
    pub history: Vec<(Phase, f64)>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the grid's net L at the end of `phase`.
    pub fn record(&mut self, phase: Phase, grid: &VorticityGrid) -> f64 {
        let net = grid.net_angular_momentum();
        debug!("{}: net L = {:.6e}", phase, net);
        self.history.push((phase, net));
        net
    }

    /// Net L recorded for `phase`, if that phase has run.
    pub fn net_after(&self, phase: Phase) -> Option<f64> {
        self.history
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|&(_, net)| net)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Outcome of one CEP cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Net L of the foam.
    pub net_l_pre: f64,
    /// Net L after the Big Flash reset.
    pub net_l_post_flash: f64,
    /// Net L after inflation.
    pub net_l_post_infl: f64,
    /// Net L after reheating.
    pub net_l_post_reheat: f64,
    pub lambda: f64,
    /// Peak rotation velocity (km/s).
    pub v_peak: f64,
    pub helicity: Helicity,
    /// Side length of the final grid.
    pub final_size: usize,
    /// Seed the cycle was run with, when seeded.
    pub seed: Option<u64>,
    /// Net L after each of the five phases, in execution order.
    pub phases: PhaseTracker,
}

/// Run one cycle, returning its summary and the final grid.
pub fn run_cycle<R: Rng>(config: &CycleConfig, rng: &mut R) -> Result<(CycleResult, VorticityGrid)> {
    config.validate()?;
    let mut tracker = PhaseTracker::new();

    let mut grid = generate_vorticity_grid(&config.foam, rng)?;
    let net_l_pre = tracker.record(Phase::Foam, &grid);

    ekpyrotic_contraction(&mut grid, config.ekpyrotic_scale);
    tracker.record(Phase::Contraction, &grid);

    big_flash_reset(&mut grid, config.flash_amplitude, rng);
    let net_l_post_flash = tracker.record(Phase::Flash, &grid);

    let mut grid = inflation_stretch(&grid, &config.inflation)?;
    let net_l_post_infl = tracker.record(Phase::Inflation, &grid);

    reheating_oscillations(&mut grid, &config.reheating, rng)?;
    tracker.record(Phase::Reheating, &grid);

    let imprint = SpinImprint::measure(&grid);
    let result = CycleResult {
        net_l_pre,
        net_l_post_flash,
        net_l_post_infl,
        net_l_post_reheat: imprint.net_l,
        lambda: imprint.lambda,
        v_peak: imprint.v_peak,
        helicity: imprint.helicity,
        final_size: grid.size(),
        seed: None,
        phases: tracker,
    };
    Ok((result, grid))
}

/// Run one cycle from a fixed seed.
pub fn run_cycle_seeded(config: &CycleConfig, seed: u64) -> Result<(CycleResult, VorticityGrid)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut result, grid) = run_cycle(config, &mut rng)?;
    result.seed = Some(seed);
    Ok((result, grid))
}

/// Ensemble parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Number of independent cycles.
    pub cycles: usize,
    /// Seed of the first cycle; cycle c uses `base_seed + c·7919`.
    pub base_seed: u64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            cycles: 5,
            base_seed: 42,
        }
    }
}

impl EnsembleConfig {
    pub fn seed_for(&self, cycle: usize) -> u64 {
        self.base_seed
            .wrapping_add((cycle as u64).wrapping_mul(SEED_STRIDE))
    }
}

/// Results and statistics of an ensemble of cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub cycles: Vec<CycleResult>,
    pub mean_lambda: f64,
    /// Population standard deviation of λ.
    pub std_lambda: f64,
    pub mean_v_peak: f64,
    /// Fraction of cycles with positive helicity.
    pub positive_fraction: f64,
}

impl EnsembleResult {
    /// Compute ensemble statistics from per-cycle results.
    pub fn from_cycles(cycles: Vec<CycleResult>) -> Result<Self> {
        if cycles.is_empty() {
            return Err(SimError::NoCycles);
        }
        let n = cycles.len() as f64;
        let mean_lambda = cycles.iter().map(|c| c.lambda).sum::<f64>() / n;
        let variance = cycles
            .iter()
            .map(|c| (c.lambda - mean_lambda).powi(2))
            .sum::<f64>()
            / n;
        let mean_v_peak = cycles.iter().map(|c| c.v_peak).sum::<f64>() / n;
        let positive = cycles
            .iter()
            .filter(|c| c.helicity == Helicity::Positive)
            .count();

        Ok(Self {
            mean_lambda,
            std_lambda: variance.sqrt(),
            mean_v_peak,
            positive_fraction: positive as f64 / n,
            cycles,
        })
    }
}

/// Run a single ensemble member and log its summary line.
fn run_member(config: &CycleConfig, ensemble: &EnsembleConfig, cycle: usize) -> Result<(CycleResult, VorticityGrid)> {
    let (result, grid) = run_cycle_seeded(config, ensemble.seed_for(cycle))?;
    info!(
        "cycle {}: λ={:.4}, v_peak={:.0} km/s, helicity={}, net L={:.1}",
        cycle + 1,
        result.lambda,
        result.v_peak,
        result.helicity,
        result.net_l_post_reheat
    );
    Ok((result, grid))
}

/// Run an ensemble, keeping every final grid alongside its result.
///
/// Grids are returned in cycle order regardless of scheduling.
pub fn run_ensemble_with_grids(
    config: &CycleConfig,
    ensemble: &EnsembleConfig,
) -> Result<(EnsembleResult, Vec<VorticityGrid>)> {
    if ensemble.cycles == 0 {
        return Err(SimError::NoCycles);
    }
    config.validate()?;

    #[cfg(feature = "parallel")]
    let members: Vec<(CycleResult, VorticityGrid)> = (0..ensemble.cycles)
        .into_par_iter()
        .map(|c| run_member(config, ensemble, c))
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let members: Vec<(CycleResult, VorticityGrid)> = (0..ensemble.cycles)
        .map(|c| run_member(config, ensemble, c))
        .collect::<Result<_>>()?;

    let (results, grids): (Vec<_>, Vec<_>) = members.into_iter().unzip();
    Ok((EnsembleResult::from_cycles(results)?, grids))
}

/// Run an ensemble and keep only the summaries.
pub fn run_ensemble(config: &CycleConfig, ensemble: &EnsembleConfig) -> Result<EnsembleResult> {
    run_ensemble_with_grids(config, ensemble).map(|(result, _)| result)
}

/// λ measured at one pre-inflation grid size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub size: usize,
    pub lambda: f64,
}

/// Grid sizes of the standard convergence study.
pub const DEFAULT_CONVERGENCE_SIZES: [usize; 4] = [15, 20, 25, 30];

/// Rerun one cycle at each grid size with the same seed.
pub fn convergence_sweep(
    config: &CycleConfig,
    sizes: &[usize],
    seed: u64,
) -> Result<Vec<ConvergencePoint>> {
    sizes
        .iter()
        .map(|&size| {
            let (result, _) = run_cycle_seeded(&config.with_size(size), seed)?;
            info!("convergence: N={} λ={:.4}", size, result.lambda);
            Ok(ConvergencePoint {
                size,
                lambda: result.lambda,
            })
        })
        .collect()
}
