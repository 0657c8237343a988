//! Seeded random field sampling for point-cloud synthesis

pub mod sampler;

pub use sampler::{FieldSampler, BUILD_SEED};
