//! Phase 6: spin imprint observables.
//!
//! The net angular momentum L of the reheated field is mapped onto a
//! dimensionless spin parameter and a peak rotation velocity:
//!
//! ```text
//! λ      = (|L| / V)^(1/3) · λ_ref
//! v_peak = v_ref · λ / λ_ref
//! ```
//!
//! with λ_ref = 0.04 and v_ref = 220 km/s (M = 10¹² M☉, r = 10 kpc).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::VorticityGrid;
use crate::units::{lambda_to_velocity, LAMBDA_REF};

/// Spin parameter proxy from net angular momentum and grid volume.
///
/// Returns 0 for a non-positive volume.
pub fn compute_lambda(net_l: f64, volume: f64) -> f64 {
    if volume <= 0.0 {
        return 0.0;
    }
    (net_l.abs() / volume).cbrt() * LAMBDA_REF
}

/// Peak rotation velocity (km/s) for a spin parameter.
pub fn compute_v_peak(lambda: f64) -> f64 {
    lambda_to_velocity(lambda)
}

/// Sign of the net angular momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Helicity {
    Positive,
    Negative,
}

impl Helicity {
    /// Positive iff `net_l > 0`; zero counts as negative.
    pub fn of(net_l: f64) -> Self {
        if net_l > 0.0 {
            Helicity::Positive
        } else {
            Helicity::Negative
        }
    }
}

impl fmt::Display for Helicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Helicity::Positive => write!(f, "+"),
            Helicity::Negative => write!(f, "-"),
        }
    }
}

/// Galactic spin proxies measured from a final grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinImprint {
    pub net_l: f64,
    pub lambda: f64,
    pub v_peak: f64,
    pub helicity: Helicity,
}

impl SpinImprint {
    pub fn measure(grid: &VorticityGrid) -> Self {
        Self::from_net(grid.net_angular_momentum(), grid.volume())
    }

    pub fn from_net(net_l: f64, volume: f64) -> Self {
        let lambda = compute_lambda(net_l, volume);
        Self {
            net_l,
            lambda,
            v_peak: compute_v_peak(lambda),
            helicity: Helicity::of(net_l),
        }
    }
}
