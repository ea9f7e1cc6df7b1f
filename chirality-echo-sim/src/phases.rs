//! Phases 2–5 of a CEP cycle: contraction, flash, inflation, reheating.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::grid::{voxel_count, VorticityGrid};
use crate::noise::NoiseChannel;
use crate::units::{REHEAT_DT, REHEAT_OMEGA};

/// Phase 2: ekpyrotic contraction.
///
/// Modelled as a uniform rescaling of the field. The default scale of 1.0
/// preserves the foam exactly.
pub fn ekpyrotic_contraction(grid: &mut VorticityGrid, scale: f64) {
    if scale != 1.0 {
        grid.scale(scale);
    }
}

/// Phase 3: Big Flash reset. Re-seeds every voxel with white noise.
pub fn big_flash_reset<R: Rng>(grid: &mut VorticityGrid, amplitude: f64, rng: &mut R) {
    NoiseChannel::FlashReset { amplitude }.apply(grid, 0.0, rng);
}

/// Inflationary stretch parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflationConfig {
    /// Integer scale factor a: the grid side grows from n to a·n.
    pub stretch_factor: usize,
    /// Dilution exponent p: values are multiplied by 1/a^p.
    pub dilution_power: i32,
}

impl Default for InflationConfig {
    fn default() -> Self {
        Self {
            stretch_factor: 4,
            dilution_power: 3,
        }
    }
}

impl InflationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.stretch_factor == 0 {
            return Err(SimError::InvalidConfig(
                "stretch_factor must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Multiplier applied to every voxel: 1/a^p.
    pub fn dilution(&self) -> f64 {
        1.0 / (self.stretch_factor as f64).powi(self.dilution_power)
    }
}

/// Phase 4: inflationary stretch.
///
/// Nearest-neighbour upsampling by the stretch factor a, followed by
/// 1/a^p dilution. Each old voxel becomes an a×a×a block, so the net
/// angular momentum changes by a³/a^p and is conserved for p = 3.
pub fn inflation_stretch(grid: &VorticityGrid, config: &InflationConfig) -> Result<VorticityGrid> {
    config.validate()?;
    let a = config.stretch_factor;
    let old_n = grid.size();
    let new_n = old_n
        .checked_mul(a)
        .filter(|&n| voxel_count(n).is_some())
        .ok_or_else(|| {
            SimError::InvalidConfig(format!("inflated grid {}×{} is too large", old_n, a))
        })?;
    let dilution = config.dilution();

    let mut out = VorticityGrid::zeros(new_n);
    for i in 0..new_n {
        let oi = i / a;
        for j in 0..new_n {
            let oj = j / a;
            let row = out.index(i, j, 0);
            let dst = &mut out.as_mut_slice()[row..row + new_n];
            for (k, v) in dst.iter_mut().enumerate() {
                *v = grid.get(oi, oj, k / a) * dilution;
            }
        }
    }

    debug!(
        "inflation: {}³ → {}³, dilution {:.3e}",
        old_n, new_n, dilution
    );
    Ok(out)
}

/// Reheating resonance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReheatingConfig {
    /// Number of oscillation steps.
    pub num_steps: usize,
    /// Parametric amplification depth ε: each step multiplies by 1 + ε·cos(ωt).
    pub epsilon: f64,
    /// Drive frequency ω.
    pub omega: f64,
    /// Chiral injection strength δχ.
    pub delta_chi: f64,
    /// Time step between oscillations.
    pub dt: f64,
}

impl Default for ReheatingConfig {
    fn default() -> Self {
        Self {
            num_steps: 50,
            epsilon: 0.01,
            omega: REHEAT_OMEGA,
            delta_chi: 1e-8,
            dt: REHEAT_DT,
        }
    }
}

impl ReheatingConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("omega", self.omega),
            ("delta_chi", self.delta_chi),
            ("dt", self.dt),
        ] {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "reheating {} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Amplification factor at step `step`.
    pub fn amplification(&self, step: usize) -> f64 {
        let t = step as f64 * self.dt;
        1.0 + self.epsilon * (self.omega * t).cos()
    }

    /// Product of all per-step amplification factors.
    pub fn total_amplification(&self) -> f64 {
        (0..self.num_steps).map(|s| self.amplification(s)).product()
    }
}

/// Phase 5: reheating oscillations.
///
/// Each step first amplifies the whole field by 1 + ε·cos(ωt), then adds a
/// chiral injection δχ·sin(ωt)·N(0,1) per voxel.
pub fn reheating_oscillations<R: Rng>(
    grid: &mut VorticityGrid,
    config: &ReheatingConfig,
    rng: &mut R,
) -> Result<()> {
    config.validate()?;
    let injection = NoiseChannel::ChiralInjection {
        delta_chi: config.delta_chi,
        omega: config.omega,
    };

    for step in 0..config.num_steps {
        let t = step as f64 * config.dt;
        grid.scale(config.amplification(step));
        injection.apply(grid, t, rng);
    }

    debug!(
        "reheating: {} steps, total amplification {:.6}",
        config.num_steps,
        config.total_amplification()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ramp(n: usize) -> VorticityGrid {
        let data = (0..n * n * n).map(|v| v as f64 - 3.0).collect();
        VorticityGrid::from_vec(n, data).unwrap()
    }

    #[test]
    fn contraction_default_preserves_field() {
        let mut g = ramp(3);
        let before = g.clone();
        ekpyrotic_contraction(&mut g, 1.0);
        assert_eq!(g, before);
        ekpyrotic_contraction(&mut g, 2.0);
        assert!((g.net_angular_momentum() - 2.0 * before.net_angular_momentum()).abs() < 1e-9);
    }

    #[test]
    fn stretch_grows_side_by_factor() {
        let g = ramp(3);
        let out = inflation_stretch(&g, &InflationConfig::default()).unwrap();
        assert_eq!(out.size(), 12);
        assert_eq!(out.len(), 12 * 12 * 12);
    }

    #[test]
    fn stretch_uses_nearest_neighbour_blocks() {
        let g = ramp(2);
        let cfg = InflationConfig { stretch_factor: 2, dilution_power: 0 };
        let out = inflation_stretch(&g, &cfg).unwrap();
        assert_eq!(out.get(0, 0, 0), g.get(0, 0, 0));
        assert_eq!(out.get(1, 1, 1), g.get(0, 0, 0));
        assert_eq!(out.get(2, 0, 3), g.get(1, 0, 1));
        assert_eq!(out.get(3, 3, 3), g.get(1, 1, 1));
    }

    #[test]
    fn cubic_dilution_conserves_net_angular_momentum() {
        let g = ramp(4);
        let out = inflation_stretch(&g, &InflationConfig::default()).unwrap();
        let before = g.net_angular_momentum();
        let after = out.net_angular_momentum();
        assert!((after - before).abs() < 1e-9 * before.abs().max(1.0));
    }

    #[test]
    fn other_dilution_powers_scale_net_l() {
        let g = ramp(3);
        let cfg = InflationConfig { stretch_factor: 2, dilution_power: 1 };
        let out = inflation_stretch(&g, &cfg).unwrap();
        // a³/a^p = 8/2 = 4
        let expected = 4.0 * g.net_angular_momentum();
        assert!((out.net_angular_momentum() - expected).abs() < 1e-9);
    }

    #[test]
    fn unit_stretch_is_identity() {
        let g = ramp(3);
        let cfg = InflationConfig { stretch_factor: 1, dilution_power: 3 };
        assert_eq!(inflation_stretch(&g, &cfg).unwrap(), g);
    }

    #[test]
    fn zero_stretch_rejected() {
        let g = ramp(2);
        let cfg = InflationConfig { stretch_factor: 0, dilution_power: 3 };
        assert!(inflation_stretch(&g, &cfg).is_err());
    }

    #[test]
    fn oversized_stretch_rejected() {
        let g = ramp(2);
        let cfg = InflationConfig { stretch_factor: 1 << 22, dilution_power: 3 };
        assert!(matches!(
            inflation_stretch(&g, &cfg),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn reheating_without_injection_is_deterministic_amplification() {
        let mut g = ramp(3);
        let before = g.net_angular_momentum();
        let cfg = ReheatingConfig { delta_chi: 0.0, ..ReheatingConfig::default() };
        let mut rng = StdRng::seed_from_u64(0);
        reheating_oscillations(&mut g, &cfg, &mut rng).unwrap();
        let expected = before * cfg.total_amplification();
        assert!((g.net_angular_momentum() - expected).abs() < 1e-9);
    }

    #[test]
    fn total_amplification_of_default_config_is_modest() {
        let amp = ReheatingConfig::default().total_amplification();
        // 50 steps at dt = 0.1 cover ωt ∈ [0, 0.98π], where the cosines
        // nearly cancel.
        assert!(amp > 0.9 && amp < 1.2, "amplification {}", amp);
    }

    #[test]
    fn zero_steps_leaves_grid_untouched() {
        let mut g = ramp(2);
        let before = g.clone();
        let cfg = ReheatingConfig { num_steps: 0, ..ReheatingConfig::default() };
        reheating_oscillations(&mut g, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn non_finite_reheating_rejected() {
        let cfg = ReheatingConfig { omega: f64::INFINITY, ..ReheatingConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
