//! Axis-aligned ellipsoid volume and ray intersection

use crate::core::types::Vec3;
use super::ray::Ray;

/// An axis-aligned ellipsoid defined by center and semi-axes
#[derive(Clone, Copy, Debug)]
pub struct Ellipsoid {
    pub center: Vec3,
    pub semi_axes: Vec3,
}

impl Ellipsoid {
    pub fn new(center: Vec3, semi_axes: Vec3) -> Self {
        Self { center, semi_axes }
    }

    /// Ellipsoid with the given semi-axes, centered at the origin
    pub fn with_semi_axes(semi_axes: Vec3) -> Self {
        Self::new(Vec3::ZERO, semi_axes)
    }

    /// Ray-ellipsoid intersection.
    ///
    /// Solves the quadratic in the space where the ellipsoid is the unit
    /// sphere; the parameter stays valid for the original ray. Returns
    /// `Some((distance, cos_angle))` where `distance` is measured along the
    /// ray direction (0 when the origin is inside) and `cos_angle` is the
    /// cosine of the angle between the ray and the direction to the
    /// ellipsoid center.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let inv = Vec3::ONE / self.semi_axes;
        let sdir = ray.direction * inv;
        let sdiff = (ray.origin - self.center) * inv;

        let a = sdir.length_squared();
        let b = sdir.dot(sdiff);
        let c = sdiff.length_squared() - 1.0;

        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let mut t = (-b - sqrt_disc) / a;
        if t < 0.0 {
            // origin inside or behind the near hit
            t = (-b + sqrt_disc) / a;
        }
        if t < 0.0 {
            return None;
        }

        let to_center = self.center - ray.origin;
        let dist_to_center = to_center.length();
        let cos_angle = if dist_to_center > 0.0 {
            ray.direction.dot(to_center) / (dist_to_center * ray.direction.length())
        } else {
            1.0
        };

        Some((t.max(0.0), cos_angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit() {
        let e = Ellipsoid::with_semi_axes(Vec3::ONE);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let (t, cos_angle) = e.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!((cos_angle - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let e = Ellipsoid::with_semi_axes(Vec3::ONE);
        let ray = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::X);
        assert!(e.intersect(&ray).is_none());
    }

    #[test]
    fn test_flattened_axes() {
        // Disk-like ellipsoid: thin along y
        let e = Ellipsoid::with_semi_axes(Vec3::new(1.0, 0.1, 1.0));
        let from_above = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        let (t, _) = e.intersect(&from_above).unwrap();
        assert!((t - 4.9).abs() < 1e-4);

        // A ray that would hit the unit sphere misses the flattened one
        let grazing = Ray::new(Vec3::new(-5.0, 0.5, 0.0), Vec3::X);
        assert!(e.intersect(&grazing).is_none());
    }

    #[test]
    fn test_origin_inside() {
        let e = Ellipsoid::with_semi_axes(Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let (t, _) = e.intersect(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_behind_ray() {
        let e = Ellipsoid::with_semi_axes(Vec3::ONE);
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        assert!(e.intersect(&ray).is_none());
    }
}
