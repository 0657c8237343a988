//! Ray type and operations

use crate::core::types::{Mat4, Vec3};

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform ray by matrix
    pub fn transform(&self, matrix: &Mat4) -> Ray {
        let new_origin = matrix.transform_point3(self.origin);
        let new_direction = matrix.transform_vector3(self.direction).normalize();
        Ray::new(new_origin, new_direction)
    }

    /// Translate the ray origin by `-offset` (move into an object's local frame)
    pub fn offset(&self, offset: Vec3) -> Ray {
        Ray::new(self.origin - offset, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.at(5.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_rotation() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let m = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let r = ray.transform(&m);
        assert!((r.direction - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_offset() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::X);
        let r = ray.offset(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(r.origin, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(r.direction, Vec3::X);
    }
}
