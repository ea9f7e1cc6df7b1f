//! Stochastic field injections implemented via per-voxel Gaussian sampling.
//!
//! Two channels perturb the vorticity field:
//!
//! 1. **Flash reset**: at the Big Flash bounce every voxel is re-seeded with
//!    a tiny white-noise component, `A · N(0, 1)`.
//! 2. **Chiral injection**: during reheating, an oscillating source adds
//!    `δχ · sin(ω t) · N(0, 1)` per voxel at each step.
//!
//! Both draw one standard normal per voxel in row-major order, so a seeded
//! RNG reproduces the same field.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::grid::VorticityGrid;

/// A noise source applied uniformly to every voxel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NoiseChannel {
    /// White noise of fixed amplitude: A · N(0,1).
    FlashReset { amplitude: f64 },

    /// Oscillating chiral source: δχ · sin(ω t) · N(0,1).
    ChiralInjection { delta_chi: f64, omega: f64 },
}

impl NoiseChannel {
    /// Standard deviation of the noise added at time `t`.
    ///
    /// May be negative for the chiral channel; the sign is carried into the
    /// sample, matching a signed source term.
    pub fn coefficient(&self, t: f64) -> f64 {
        match *self {
            NoiseChannel::FlashReset { amplitude } => amplitude,
            NoiseChannel::ChiralInjection { delta_chi, omega } => delta_chi * (omega * t).sin(),
        }
    }

    /// Add one independent noise sample to every voxel of the grid.
    pub fn apply<R: Rng>(&self, grid: &mut VorticityGrid, t: f64, rng: &mut R) {
        let coeff = self.coefficient(t);
        for v in grid.as_mut_slice() {
            let z: f64 = rng.sample(StandardNormal);
            *v += coeff * z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn flash_coefficient_is_constant() {
        let ch = NoiseChannel::FlashReset { amplitude: 1e-8 };
        assert_eq!(ch.coefficient(0.0), 1e-8);
        assert_eq!(ch.coefficient(3.7), 1e-8);
    }

    #[test]
    fn chiral_coefficient_vanishes_at_t_zero() {
        let ch = NoiseChannel::ChiralInjection { delta_chi: 1e-8, omega: 1.0 };
        assert_eq!(ch.coefficient(0.0), 0.0);
        let t = std::f64::consts::FRAC_PI_2;
        assert!((ch.coefficient(t) - 1e-8).abs() < 1e-20);
    }

    #[test]
    fn zero_amplitude_is_identity() {
        let mut grid = VorticityGrid::from_vec(3, vec![1.25; 27]).unwrap();
        let before = grid.clone();
        let mut rng = StdRng::seed_from_u64(5);
        NoiseChannel::FlashReset { amplitude: 0.0 }.apply(&mut grid, 0.0, &mut rng);
        assert_eq!(grid, before);
    }

    #[test]
    fn flash_noise_has_expected_spread() {
        let mut grid = VorticityGrid::zeros(20);
        let mut rng = StdRng::seed_from_u64(1234);
        NoiseChannel::FlashReset { amplitude: 2.0 }.apply(&mut grid, 0.0, &mut rng);

        let n = grid.len() as f64;
        let mean = grid.net_angular_momentum() / n;
        let var = grid.as_slice().iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        // 8000 samples: mean ≈ 0, std ≈ 2.
        assert!(mean.abs() < 0.15, "mean {} too far from 0", mean);
        assert!((var.sqrt() - 2.0).abs() < 0.15, "std {} too far from 2", var.sqrt());
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let ch = NoiseChannel::ChiralInjection { delta_chi: 0.5, omega: 2.0 };
        let mut a = VorticityGrid::zeros(4);
        let mut b = VorticityGrid::zeros(4);
        ch.apply(&mut a, 0.3, &mut StdRng::seed_from_u64(8));
        ch.apply(&mut b, 0.3, &mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
    }
}
