//! Bounded quad staging for the batched-quad path
//!
//! Vertices accumulate into a fixed one-megabyte staging area; whenever the
//! next quad would overflow it, the accumulated range is flushed into a GPU
//! buffer from a reusable pool and recorded as a draw range. Memory and
//! per-upload size stay bounded no matter how many blobs a galaxy holds.

use super::vertex::{MAX_INDICES, MAX_VERTICES, QuadVertex};

/// CPU-side staging arrays with the fixed one-megabyte capacity
pub struct QuadStaging {
    vertices: Vec<QuadVertex>,
    indices: Vec<u16>,
}

impl QuadStaging {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(MAX_VERTICES),
            indices: Vec::with_capacity(MAX_INDICES),
        }
    }

    /// Would pushing one more quad exceed capacity?
    pub fn would_overflow(&self) -> bool {
        self.vertices.len() + 4 > MAX_VERTICES
    }

    /// Append a quad's four corners and six indices.
    /// Caller must flush first when [`would_overflow`](Self::would_overflow).
    pub fn push_quad(&mut self, corners: [QuadVertex; 4]) {
        debug_assert!(!self.would_overflow());
        let base = self.vertices.len() as u16;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

impl Default for QuadStaging {
    fn default() -> Self {
        Self::new()
    }
}

struct FlushBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl FlushBuffers {
    fn new(device: &wgpu::Device) -> Self {
        let vertices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy_quad_vertices"),
            size: (MAX_VERTICES * std::mem::size_of::<QuadVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let indices = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("galaxy_quad_indices"),
            size: (MAX_INDICES * std::mem::size_of::<u16>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { vertices, indices }
    }
}

/// A recorded flush: which pool slot to bind and how many indices to draw
#[derive(Clone, Copy, Debug)]
pub struct DrawRange {
    pub slot: usize,
    pub index_count: u32,
}

/// Owned, reusable quad batcher: staging arrays plus a lazily grown pool of
/// GPU buffers. The pool reaches the frame's peak flush count once and is
/// reused from then on.
pub struct QuadBatch {
    staging: QuadStaging,
    pool: Vec<FlushBuffers>,
    draws: Vec<DrawRange>,
    used: usize,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self {
            staging: QuadStaging::new(),
            pool: Vec::new(),
            draws: Vec::new(),
            used: 0,
        }
    }

    /// Start a fresh accumulation, keeping pooled GPU buffers
    pub fn begin(&mut self) {
        self.staging.reset();
        self.draws.clear();
        self.used = 0;
    }

    /// Push a quad, flushing first if it would overflow the staging area
    pub fn push_quad(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        corners: [QuadVertex; 4],
    ) {
        if self.staging.would_overflow() {
            self.flush(device, queue);
        }
        self.staging.push_quad(corners);
    }

    /// Upload the staged range into the next pool slot and record its draw
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.staging.is_empty() {
            return;
        }
        if self.used == self.pool.len() {
            self.pool.push(FlushBuffers::new(device));
        }
        let buffers = &self.pool[self.used];
        queue.write_buffer(&buffers.vertices, 0, bytemuck::cast_slice(self.staging.vertices()));
        queue.write_buffer(&buffers.indices, 0, bytemuck::cast_slice(self.staging.indices()));
        self.draws.push(DrawRange {
            slot: self.used,
            index_count: self.staging.index_count() as u32,
        });
        self.used += 1;
        self.staging.reset();
    }

    pub fn draws(&self) -> &[DrawRange] {
        &self.draws
    }

    /// Vertex and index buffers for a recorded slot
    pub fn buffers(&self, slot: usize) -> (&wgpu::Buffer, &wgpu::Buffer) {
        let b = &self.pool[slot];
        (&b.vertices, &b.indices)
    }
}

impl Default for QuadBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn quad(i: u8) -> [QuadVertex; 4] {
        [
            QuadVertex::new(Vec3::ZERO, 0, 0, i, 255),
            QuadVertex::new(Vec3::X, 255, 0, i, 255),
            QuadVertex::new(Vec3::ONE, 255, 255, i, 255),
            QuadVertex::new(Vec3::Y, 0, 255, i, 255),
        ]
    }

    #[test]
    fn test_index_pattern() {
        let mut staging = QuadStaging::new();
        staging.push_quad(quad(0));
        staging.push_quad(quad(1));
        assert_eq!(staging.vertex_count(), 8);
        assert_eq!(staging.indices(), &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_capacity_detection() {
        let mut staging = QuadStaging::new();
        for _ in 0..MAX_VERTICES / 4 {
            assert!(!staging.would_overflow());
            staging.push_quad(quad(0));
        }
        assert!(staging.would_overflow());
        assert_eq!(staging.vertex_count(), MAX_VERTICES);
        assert_eq!(staging.index_count(), MAX_INDICES);
    }

    #[test]
    fn test_reset() {
        let mut staging = QuadStaging::new();
        staging.push_quad(quad(0));
        assert!(!staging.is_empty());
        staging.reset();
        assert!(staging.is_empty());
        assert_eq!(staging.vertex_count(), 0);
        // indices restart from zero after a reset, like a fresh flush
        staging.push_quad(quad(0));
        assert_eq!(staging.indices()[0], 0);
    }
}
