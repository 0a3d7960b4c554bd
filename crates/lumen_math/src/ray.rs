//! Ray type shared by the camera and the intersection scan.

use glam::Vec3;

/// A half-line in world space: a start point plus a travel direction.
///
/// Directions are stored as-is. The camera's cached primary rays happen
/// to be unit length, but nothing here requires that; intersection code
/// derives the general quadratic so a scaled direction simply rescales
/// the parametric distance.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point reached after traveling `t` direction-lengths from the origin.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
