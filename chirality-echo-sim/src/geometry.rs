//! Minimal 3D vector algebra for string segments.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point or displacement in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm_sqr(self) -> f64 {
        self.dot(self)
    }

    pub fn norm(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Point at parameter `t` along `self → other` (t = 0 gives `self`).
    pub fn lerp(self, other: Vec3, t: f64) -> Vec3 {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Distance from point `p` to the closed segment `ab`.
///
/// The projection of `p` onto the line is clamped to the segment. A
/// degenerate segment (`a == b`) collapses to the point distance `|p - a|`.
pub fn point_to_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len_sqr = ab.norm_sqr();
    if len_sqr == 0.0 {
        return ap.norm();
    }
    let t = (ap.dot(ab) / len_sqr).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}
