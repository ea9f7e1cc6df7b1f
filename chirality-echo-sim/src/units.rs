//! Calibration constants for the galactic spin proxies.
//!
//! The simulation is dimensionless; these values only map the final grid
//! statistic onto Milky-Way-like numbers.

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Reference galactic spin parameter λ.
pub const LAMBDA_REF: f64 = 0.04;

/// Peak rotation velocity (km/s) at λ = `LAMBDA_REF`, for M = 10¹² M☉ at r = 10 kpc.
pub const V_REF_KMS: f64 = 220.0;

/// Default reheating drive frequency ω (rad per unit time).
pub const REHEAT_OMEGA: f64 = 0.2 * PI;

/// Default reheating time step.
pub const REHEAT_DT: f64 = 0.1;

/// Rasterisation cutoff in units of σ: tubes are truncated at 3σ.
pub const KERNEL_CUTOFF_SIGMAS: f64 = 3.0;

/// Convert a spin parameter to a peak rotation velocity (km/s).
pub fn lambda_to_velocity(lambda: f64) -> f64 {
    V_REF_KMS * (lambda / LAMBDA_REF)
}
