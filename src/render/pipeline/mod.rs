//! Draw-path pipelines

pub mod points;
pub mod quads;

pub use points::PointPipeline;
pub use quads::QuadPipeline;
