//! Phase 1: pre-inflation foam.
//!
//! Planck-scale topological loops are modelled as straight cosmic-string
//! segments with random endpoints. Each string carries a handedness χ = ±1,
//! drawn with a slight right-handed bias `0.5 + δχ/2`. Strings are
//! rasterised onto the grid as Gaussian vorticity tubes of width σ,
//! truncated at 3σ.
//!
//! The tube is deposited from `samples_per_string` evenly spaced sample
//! points: every voxel inside a sample point's cutoff box receives
//! χ·exp(−d²/2σ²), where d is the distance to the whole segment. Voxels near
//! the string lie inside several boxes and so accumulate several deposits.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::geometry::{point_to_segment_distance, Vec3};
use crate::grid::{voxel_count, VorticityGrid};
use crate::units::KERNEL_CUTOFF_SIGMAS;

/// Handedness of a string loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    /// +1 for right-handed, −1 for left-handed.
    pub fn sign(self) -> f64 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// Configuration of the pre-inflation string network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamConfig {
    /// Grid side length before inflation.
    pub size: usize,
    /// Number of string segments.
    pub num_strings: usize,
    /// Chirality bias δχ: P(right-handed) = 0.5 + δχ/2.
    pub delta_chi: f64,
    /// Gaussian tube width σ (voxels).
    pub sigma: f64,
    /// Sample points along each segment used for deposition.
    pub samples_per_string: usize,
}

impl Default for FoamConfig {
    fn default() -> Self {
        Self {
            size: 20,
            num_strings: 50,
            delta_chi: 1e-8,
            sigma: 1.0,
            samples_per_string: 10,
        }
    }
}

impl FoamConfig {
    /// Probability that a string is right-handed.
    pub fn right_bias(&self) -> f64 {
        0.5 + self.delta_chi / 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SimError::InvalidConfig("foam size must be at least 1".into()));
        }
        if voxel_count(self.size).is_none() {
            return Err(SimError::InvalidConfig(format!(
                "foam size {} is too large",
                self.size
            )));
        }
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "sigma must be positive and finite, got {}",
                self.sigma
            )));
        }
        if self.samples_per_string == 0 {
            return Err(SimError::InvalidConfig(
                "samples_per_string must be at least 1".into(),
            ));
        }
        if !(self.delta_chi.abs() <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "delta_chi must lie in [-1, 1], got {}",
                self.delta_chi
            )));
        }
        Ok(())
    }
}

/// A straight cosmic-string segment with handedness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StringSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub handedness: Handedness,
}

fn uniform_point<R: Rng>(rng: &mut R, size: f64) -> Vec3 {
    let x = rng.gen_range(0.0..size);
    let y = rng.gen_range(0.0..size);
    let z = rng.gen_range(0.0..size);
    Vec3::new(x, y, z)
}

/// Draw one string segment with endpoints uniform in `[0, size)³`.
pub fn sample_segment<R: Rng>(rng: &mut R, size: usize, right_bias: f64) -> StringSegment {
    let size = size as f64;
    let start = uniform_point(rng, size);
    let end = uniform_point(rng, size);
    let handedness = if rng.gen::<f64>() < right_bias {
        Handedness::Right
    } else {
        Handedness::Left
    };
    StringSegment {
        start,
        end,
        handedness,
    }
}

/// Half-open voxel range `[lo, hi)` covered by the cutoff box around `center`.
fn axis_range(center: f64, cutoff: f64, n: usize) -> std::ops::Range<usize> {
    let lo = ((center - cutoff).trunc() as i64).max(0);
    let hi = ((center + cutoff + 1.0).trunc() as i64).min(n as i64);
    if hi <= lo {
        return 0..0;
    }
    lo as usize..hi as usize
}

/// Deposit one string segment onto the grid as a Gaussian tube.
pub fn rasterize_segment(
    grid: &mut VorticityGrid,
    segment: &StringSegment,
    sigma: f64,
    samples: usize,
) {
    let n = grid.size();
    let chi = segment.handedness.sign();
    let cutoff = KERNEL_CUTOFF_SIGMAS * sigma;
    let two_sigma_sqr = 2.0 * sigma * sigma;

    for s in 0..samples {
        let t = if samples > 1 {
            s as f64 / (samples - 1) as f64
        } else {
            0.0
        };
        let center = segment.start.lerp(segment.end, t);

        for i in axis_range(center.x, cutoff, n) {
            for j in axis_range(center.y, cutoff, n) {
                for k in axis_range(center.z, cutoff, n) {
                    let p = Vec3::new(i as f64, j as f64, k as f64);
                    let dist = point_to_segment_distance(p, segment.start, segment.end);
                    if dist < cutoff {
                        *grid.get_mut(i, j, k) += chi * (-dist * dist / two_sigma_sqr).exp();
                    }
                }
            }
        }
    }
}

/// Sample the whole string network.
pub fn sample_network<R: Rng>(config: &FoamConfig, rng: &mut R) -> Vec<StringSegment> {
    let bias = config.right_bias();
    (0..config.num_strings)
        .map(|_| sample_segment(rng, config.size, bias))
        .collect()
}

/// Phase 1: build the biased vorticity foam.
///
/// Each string is drawn and deposited in turn, so the RNG stream is
/// (start, end, handedness) per string.
pub fn generate_vorticity_grid<R: Rng>(config: &FoamConfig, rng: &mut R) -> Result<VorticityGrid> {
    config.validate()?;
    let mut grid = VorticityGrid::zeros(config.size);
    let bias = config.right_bias();
    let mut right = 0usize;

    for _ in 0..config.num_strings {
        let segment = sample_segment(rng, config.size, bias);
        if segment.handedness == Handedness::Right {
            right += 1;
        }
        rasterize_segment(&mut grid, &segment, config.sigma, config.samples_per_string);
    }

    debug!(
        "foam: {} strings ({} right-handed), net L = {:.4}",
        config.num_strings,
        right,
        grid.net_angular_momentum()
    );
    Ok(grid)
}
