//! Galaxy instances: placement, classification, and picking

pub mod catalog;

pub use catalog::{GalaxyParams, load_catalog};

use glam::{Mat3, Quat, Vec3};

use crate::form::{FormCache, FormId, GalaxyType, MAX_SPIRAL_THICKNESS};
use crate::math::{Ellipsoid, Ray};

/// Bound padding compensating for blobs having size when drawn but none
/// when the forms were built
pub const RADIUS_CORRECTION: f32 = 0.025;

/// A renderable deep-sky object referencing a cached galactic form.
///
/// Created at catalog-load time, mutated only through the detail, type, and
/// form setters, and dropped with the catalog.
#[derive(Clone, Debug)]
pub struct Galaxy {
    position: Vec3,
    orientation: Quat,
    radius: f32,
    visible: bool,
    detail: f32,
    gtype: GalaxyType,
    form: FormId,
}

impl Galaxy {
    pub fn new(gtype: GalaxyType) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            radius: 1.0,
            visible: true,
            detail: 1.0,
            gtype,
            form: gtype.form_id(),
        }
    }

    /// Construct from a catalog record, resolving the form against the cache
    pub fn from_params(params: &GalaxyParams, cache: &mut FormCache) -> Self {
        let mut galaxy = Self::new(GalaxyType::parse(&params.kind));
        galaxy.set_detail(params.detail);
        galaxy.position = Vec3::from(params.position);
        galaxy.orientation = Quat::from_axis_angle(
            Vec3::from(params.axis).try_normalize().unwrap_or(Vec3::Y),
            params.angle.to_radians(),
        );
        galaxy.radius = params.radius;
        galaxy.set_form(&params.custom_template, cache);
        galaxy
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Fraction of the form's blobs rendered, in [0, 1]
    pub fn detail(&self) -> f32 {
        self.detail
    }

    pub fn set_detail(&mut self, detail: f32) {
        self.detail = detail;
    }

    pub fn galaxy_type(&self) -> GalaxyType {
        self.gtype
    }

    /// Set the Hubble type from a catalog string; unrecognized codes fall
    /// back to `Irr`. Does not touch the form id.
    pub fn set_type(&mut self, kind: &str) {
        self.gtype = GalaxyType::parse(kind);
    }

    pub fn form_id(&self) -> FormId {
        self.form
    }

    /// Bind the galaxy to its form: the standard form for its type, or a
    /// custom template resolved (and memoized) through the cache.
    pub fn set_form(&mut self, custom_template: &str, cache: &mut FormCache) {
        if custom_template.is_empty() {
            self.form = self.gtype.form_id();
        } else {
            self.form = cache.custom_form(custom_template);
        }
    }

    pub fn description(&self) -> String {
        format!("Galaxy (Hubble type: {})", self.gtype)
    }

    /// Test a world-space ray against the galaxy's bounding ellipsoid.
    ///
    /// The ellipsoid derives from the form scale padded by
    /// [`RADIUS_CORRECTION`]; spirals use the maximum disk thickness for the
    /// vertical semi-axis. Returns the distance along the ray and the cosine
    /// of the angle to the bound center.
    pub fn pick(&self, cache: &FormCache, ray: &Ray) -> Option<(f32, f32)> {
        if !self.visible {
            return None;
        }
        let form = cache.form(self.form)?;

        let yscale = if self.gtype.is_spiral() {
            MAX_SPIRAL_THICKNESS
        } else {
            form.scale.y + RADIUS_CORRECTION
        };
        let semi_axes = Vec3::new(
            self.radius * (form.scale.x + RADIUS_CORRECTION),
            self.radius * yscale,
            self.radius * (form.scale.z + RADIUS_CORRECTION),
        );

        let rotation = Mat3::from_quat(self.orientation);
        let local = Ray::new(
            rotation * (ray.origin - self.position),
            rotation * ray.direction,
        );
        Ellipsoid::with_semi_axes(semi_axes).intersect(&local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::GALAXY_TYPE_COUNT;

    fn empty_cache() -> (tempfile::TempDir, FormCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FormCache::new(dir.path());
        (dir, cache)
    }

    #[test]
    fn test_default_type_is_irr() {
        let (_dir, mut cache) = empty_cache();
        let params = GalaxyParams::default();
        let galaxy = Galaxy::from_params(&params, &mut cache);
        assert_eq!(galaxy.galaxy_type(), GalaxyType::Irr);
        assert_eq!(galaxy.form_id(), GalaxyType::Irr.form_id());
        assert_eq!(galaxy.detail(), 1.0);
    }

    #[test]
    fn test_form_follows_type() {
        let (_dir, mut cache) = empty_cache();
        let params = GalaxyParams {
            kind: "Sb".into(),
            ..Default::default()
        };
        let galaxy = Galaxy::from_params(&params, &mut cache);
        assert_eq!(galaxy.form_id(), GalaxyType::Sb.form_id());
    }

    #[test]
    fn test_custom_template_gets_cache_id() {
        let (_dir, mut cache) = empty_cache();
        let params = GalaxyParams {
            kind: "Sb".into(),
            custom_template: "ring.png".into(),
            ..Default::default()
        };
        let a = Galaxy::from_params(&params, &mut cache);
        let b = Galaxy::from_params(&params, &mut cache);
        assert!(a.form_id() >= GALAXY_TYPE_COUNT);
        assert_eq!(a.form_id(), b.form_id());
    }

    #[test]
    fn test_pick_hits_irregular_bound() {
        let (_dir, cache) = empty_cache();
        let galaxy = Galaxy::new(GalaxyType::Irr);
        // irregular scale is 0.5 everywhere; padded semi-axis = 0.525
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let (dist, cos_angle) = galaxy.pick(&cache, &ray).unwrap();
        assert!((dist - (5.0 - 0.525)).abs() < 1e-4);
        assert!((cos_angle - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pick_misses_off_axis() {
        let (_dir, cache) = empty_cache();
        let galaxy = Galaxy::new(GalaxyType::Irr);
        let ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);
        assert!(galaxy.pick(&cache, &ray).is_none());
    }

    #[test]
    fn test_pick_absent_form_is_none() {
        let (_dir, cache) = empty_cache();
        // no templates on disk, so every spiral form is absent
        let galaxy = Galaxy::new(GalaxyType::Sb);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(galaxy.pick(&cache, &ray).is_none());
    }

    #[test]
    fn test_pick_invisible_is_none() {
        let (_dir, cache) = empty_cache();
        let mut galaxy = Galaxy::new(GalaxyType::Irr);
        galaxy.set_visible(false);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(galaxy.pick(&cache, &ray).is_none());
    }

    #[test]
    fn test_description() {
        let galaxy = Galaxy::new(GalaxyType::SBc);
        assert_eq!(galaxy.description(), "Galaxy (Hubble type: SBc)");
    }
}
