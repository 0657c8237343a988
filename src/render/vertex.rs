//! Vertex formats for the galaxy draw paths

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One corner of a camera-facing quad (batched-quad path).
///
/// `attrs` packs (u corner flag, v corner flag, color index, alpha) as
/// normalized bytes, mirroring the per-vertex layout the quad shader reads.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: Vec3,
    pub attrs: [u8; 4],
}

impl QuadVertex {
    pub fn new(position: Vec3, u: u8, v: u8, color_index: u8, alpha: u8) -> Self {
        Self {
            position,
            attrs: [u, v, color_index, alpha],
        }
    }
}

/// Six indices per four-vertex quad
pub const fn required_index_count(vertex_count: usize) -> usize {
    (vertex_count + 3) / 4 * 6
}

/// Staging capacity: one megabyte of vertex data
pub const MAX_VERTICES: usize = 1024 * 1024 / std::mem::size_of::<QuadVertex>();
pub const MAX_INDICES: usize = required_index_count(MAX_VERTICES);
