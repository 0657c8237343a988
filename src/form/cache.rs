//! Registry of precomputed galactic forms
//!
//! The cache owns every blob catalog in the process: the 16 standard Hubble
//! forms built eagerly at construction, plus custom template forms built
//! lazily and memoized by path. Construction is synchronous and
//! single-threaded; entries live for the cache's lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::field::{BUILD_SEED, FieldSampler};
use super::blob::GalacticForm;
use super::builder::{DensityProfile, build_from_path, build_irregular};
use super::hubble::GALAXY_TYPE_COUNT;

/// Index into the form cache. Standard forms occupy `0..16` in
/// [`GalaxyType`](super::GalaxyType) order; custom forms follow.
pub type FormId = usize;

/// Elliptical color indices are compressed toward the ramp's warm end
const ELLIPTICAL_DESATURATION: f32 = 0.76;

const SPIRAL_TEMPLATES: [&str; 7] = ["S0", "Sa", "Sb", "Sc", "SBa", "SBb", "SBc"];

pub struct FormCache {
    forms: Vec<Option<GalacticForm>>,
    custom: HashMap<PathBuf, FormId>,
    assets_dir: PathBuf,
    sampler: FieldSampler,
}

impl FormCache {
    /// Build the cache, eagerly constructing all 16 standard forms from
    /// templates under `assets_dir`. Missing templates leave absent entries;
    /// they are logged by the builder and never abort construction.
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        let mut cache = Self {
            forms: Vec::with_capacity(GALAXY_TYPE_COUNT),
            custom: HashMap::new(),
            assets_dir: assets_dir.into(),
            sampler: FieldSampler::new(BUILD_SEED),
        };
        cache.initialize_standard_forms();
        cache
    }

    /// Look up a form. Absent when the template failed to build.
    ///
    /// Ids beyond the table are a caller contract violation: every valid id
    /// came from a type or from `custom_form`.
    pub fn form(&self, id: FormId) -> Option<&GalacticForm> {
        debug_assert!(id < self.forms.len(), "form id {} out of range", id);
        self.forms.get(id).and_then(|f| f.as_ref())
    }

    /// Number of cache slots (standard + custom, absent entries included)
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Id for a custom template, building the form on first request.
    ///
    /// The path resolves under the cache's asset directory and is memoized:
    /// the same template name always maps to the same id, whether or not the
    /// build succeeded.
    pub fn custom_form(&mut self, template: impl AsRef<Path>) -> FormId {
        let path = self.assets_dir.join(template);
        if let Some(&id) = self.custom.get(&path) {
            return id;
        }

        let id = self.forms.len();
        self.custom.insert(path.clone(), id);
        let form = build_from_path(&path, DensityProfile::Spiral, &mut self.sampler);
        self.forms.push(form);
        id
    }

    fn template_path(&self, name: &str) -> PathBuf {
        self.assets_dir.join(format!("{}.png", name))
    }

    fn initialize_standard_forms(&mut self) {
        // irregular first: procedural, always present
        self.forms.push(Some(build_irregular(&mut self.sampler)));

        // 7 classical spiral types
        for name in SPIRAL_TEMPLATES {
            let form = build_from_path(
                &self.template_path(name),
                DensityProfile::Spiral,
                &mut self.sampler,
            );
            self.forms.push(form);
        }

        // 8 elliptical types, each an independently resampled build of the
        // spherical E0 template flattened in x and y
        let e0 = self.template_path("E0");
        for eform in 0u32..=7 {
            let ell = 1.0 - eform as f32 / 8.0;
            let form = build_from_path(&e0, DensityProfile::Spherical, &mut self.sampler)
                .map(|mut form| {
                    form.scale = Vec3::new(ell, ell, 1.0);
                    for blob in &mut form.blobs {
                        blob.color_index =
                            (ELLIPTICAL_DESATURATION * blob.color_index as f32).ceil() as u8;
                    }
                    form
                });
            self.forms.push(form);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::GalaxyType;
    use crate::form::builder::IRREGULAR_POINT_COUNT;
    use image::GrayImage;

    fn write_template(dir: &Path, name: &str, size: u32) {
        let half = size as f32 / 2.0;
        let img = GrayImage::from_fn(size, size, |x, y| {
            let dx = (x as f32 - half) / half;
            let dy = (y as f32 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            image::Luma([(255.0 * (1.0 - d).max(0.0)) as u8])
        });
        img.save(dir.join(format!("{}.png", name))).unwrap();
    }

    fn full_assets() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in SPIRAL_TEMPLATES {
            write_template(dir.path(), name, 16);
        }
        write_template(dir.path(), "E0", 16);
        dir
    }

    #[test]
    fn test_standard_forms_built_in_order() {
        let assets = full_assets();
        let cache = FormCache::new(assets.path());
        assert_eq!(cache.len(), GALAXY_TYPE_COUNT);

        let irr = cache.form(GalaxyType::Irr.form_id()).unwrap();
        assert_eq!(irr.blobs.len(), IRREGULAR_POINT_COUNT);
        assert_eq!(irr.scale, Vec3::splat(0.5));

        for id in 1..GALAXY_TYPE_COUNT {
            assert!(cache.form(id).is_some(), "form {} missing", id);
        }
    }

    #[test]
    fn test_elliptical_scales_flatten() {
        let assets = full_assets();
        let cache = FormCache::new(assets.path());
        for eform in 0u32..=7 {
            let id = GalaxyType::E0.form_id() + eform as usize;
            let form = cache.form(id).unwrap();
            let ell = 1.0 - eform as f32 / 8.0;
            assert_eq!(form.scale, Vec3::new(ell, ell, 1.0));
        }
    }

    #[test]
    fn test_elliptical_colors_desaturated() {
        let assets = full_assets();
        let cache = FormCache::new(assets.path());
        let e0 = cache.form(GalaxyType::E0.form_id()).unwrap();
        // ceil(0.76 * 255) = 194 is the hottest index an elliptical can carry
        assert!(e0.blobs.iter().all(|b| b.color_index <= 194));
    }

    #[test]
    fn test_missing_templates_leave_absent_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FormCache::new(dir.path());
        assert_eq!(cache.len(), GALAXY_TYPE_COUNT);
        // procedural irregular never depends on assets
        assert!(cache.form(GalaxyType::Irr.form_id()).is_some());
        for id in 1..GALAXY_TYPE_COUNT {
            assert!(cache.form(id).is_none());
        }
    }

    #[test]
    fn test_custom_form_memoized() {
        let assets = full_assets();
        write_template(assets.path(), "ring", 16);
        let mut cache = FormCache::new(assets.path());

        let id = cache.custom_form("ring.png");
        assert_eq!(id, GALAXY_TYPE_COUNT);
        assert!(cache.form(id).is_some());
        assert_eq!(cache.custom_form("ring.png"), id);
        assert_eq!(cache.len(), GALAXY_TYPE_COUNT + 1);
    }

    #[test]
    fn test_custom_form_failure_is_absent_and_stable() {
        let assets = full_assets();
        let mut cache = FormCache::new(assets.path());
        let id = cache.custom_form("missing.png");
        assert!(cache.form(id).is_none());
        assert_eq!(cache.custom_form("missing.png"), id);
    }

    #[test]
    fn test_builds_are_reproducible_across_caches() {
        let assets = full_assets();
        let a = FormCache::new(assets.path());
        let b = FormCache::new(assets.path());
        for id in 0..GALAXY_TYPE_COUNT {
            match (a.form(id), b.form(id)) {
                (Some(fa), Some(fb)) => assert_eq!(fa.blobs, fb.blobs, "form {} differs", id),
                (None, None) => {}
                _ => panic!("form {} present in only one cache", id),
            }
        }
    }
}
