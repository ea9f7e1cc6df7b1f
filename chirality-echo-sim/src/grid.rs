//! Cubic 3D vorticity grid.
//!
//! The field lives on an n×n×n lattice of voxels stored as a flat,
//! row-major (C order) vector: voxel (i, j, k) sits at `(i·n + j)·n + k`.
//! This matches NumPy's default layout, so grids export to `.npy` without
//! reordering.

use crate::error::{Result, SimError};

/// A cubic scalar vorticity field.
#[derive(Debug, Clone, PartialEq)]
pub struct VorticityGrid {
    n: usize,
    data: Vec<f64>,
}

/// Number of voxels on an n³ grid, or `None` if the grid could not be
/// allocated as a single `Vec<f64>`.
pub fn voxel_count(n: usize) -> Option<usize> {
    let count = n.checked_mul(n)?.checked_mul(n)?;
    (count <= isize::MAX as usize / std::mem::size_of::<f64>()).then_some(count)
}

impl VorticityGrid {
    /// Create an n×n×n grid filled with zeros.
    ///
    /// Callers pass sizes already checked by a config `validate`.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n * n],
        }
    }

    /// Wrap existing row-major data. Fails if `n == 0` or `data.len() != n³`.
    pub fn from_vec(n: usize, data: Vec<f64>) -> Result<Self> {
        if n == 0 {
            return Err(SimError::InvalidConfig("grid side must be at least 1".into()));
        }
        let expected = voxel_count(n)
            .ok_or_else(|| SimError::InvalidConfig(format!("grid side {} overflows", n)))?;
        if data.len() != expected {
            return Err(SimError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { n, data })
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Total number of voxels (n³).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Volume of the grid in voxel units.
    pub fn volume(&self) -> f64 {
        self.data.len() as f64
    }

    /// Linear index of voxel (i, j, k).
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.n && j < self.n && k < self.n);
        (i * self.n + j) * self.n + k
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[self.index(i, j, k)]
    }

    pub fn get_mut(&mut self, i: usize, j: usize, k: usize) -> &mut f64 {
        let idx = self.index(i, j, k);
        &mut self.data[idx]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Net angular momentum proxy: the sum of all voxel vorticities.
    pub fn net_angular_momentum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Multiply every voxel by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.data {
            *v *= factor;
        }
    }

    /// Largest absolute voxel value (0 for an empty grid).
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// The `[i, :, :]` plane as rows indexed by j, columns by k, or `None`
    /// if `i` is out of range.
    pub fn slice_x(&self, i: usize) -> Option<Vec<Vec<f64>>> {
        if i >= self.n {
            return None;
        }
        let plane = (0..self.n)
            .map(|j| {
                let start = self.index(i, j, 0);
                self.data[start..start + self.n].to_vec()
            })
            .collect();
        Some(plane)
    }

    /// The middle `[n/2, :, :]` plane. `None` only for an empty grid.
    pub fn mid_slice(&self) -> Option<Vec<Vec<f64>>> {
        self.slice_x(self.n / 2)
    }
}
