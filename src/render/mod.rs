//! Rendering system and GPU interfaces

pub mod batch;
pub mod context;
pub mod path;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use context::GpuContext;
pub use path::RenderPath;
pub use renderer::{FrameParams, GalaxyRenderer};
