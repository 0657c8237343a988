//! Galaxy form synthesis, caching, and level-of-detail

pub mod blob;
pub mod builder;
pub mod cache;
pub mod hubble;
pub mod lod;

pub use blob::{Blob, GalacticForm};
pub use builder::{DensityProfile, MAX_SPIRAL_THICKNESS};
pub use cache::{FormCache, FormId};
pub use hubble::{GALAXY_TYPE_COUNT, GalaxyType};
