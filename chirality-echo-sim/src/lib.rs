//! # chirality-echo-sim
//!
//! Numerical simulation of the Chirality Echo Protocol (CEP) on a cubic
//! 3D vorticity grid, following one cycle of a cyclic cosmology from
//! Planck-scale string foam to a galactic spin proxy.
//!
//! ## Cycle
//!
//! ```text
//! Pre-inflation foam (biased string loops → Gaussian vorticity tubes)
//!   ↓
//! Ekpyrotic contraction (uniform scale, identity by default)
//!   ↓
//! Big Flash reset (tiny Gaussian re-seeding)
//!   ↓
//! Inflation stretch (nearest-neighbour upsampling, 1/a³ dilution)
//!   ↓
//! Reheating oscillations (parametric amplification + chiral injection)
//!   ↓
//! Spin imprint (net L → λ → v_peak, helicity sign)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use chirality_echo_sim::prelude::*;
//!
//! let result = run_ensemble(&CycleConfig::default(), &EnsembleConfig::default()).unwrap();
//! println!("Mean λ = {:.4} ± {:.4}", result.mean_lambda, result.std_lambda);
//! ```

pub mod error;
pub mod units;
pub mod geometry;
pub mod grid;
pub mod foam;
pub mod noise;
pub mod phases;
pub mod observables;
pub mod simulation;
pub mod npy;
pub mod files;
pub mod report;

pub mod prelude {
    pub use crate::error::SimError;
    pub use crate::geometry::*;
    pub use crate::grid::*;
    pub use crate::foam::*;
    pub use crate::noise::*;
    pub use crate::phases::*;
    pub use crate::observables::*;
    pub use crate::simulation::*;
}
