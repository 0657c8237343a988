//! Render strategy selection

/// Which of the two mutually exclusive draw strategies a renderer uses.
///
/// Selected once at setup and never re-evaluated mid-frame. The point-sprite
/// path uploads each blob catalog to the GPU once and defers per-bucket
/// sizing to the shader; the batched-quad path builds camera-facing quads on
/// the CPU and streams them through a bounded staging buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPath {
    /// Legacy path: CPU-billboarded quads, batched uploads
    BatchedQuads,
    /// Modern path: per-form instance buffers, per-point attributes
    PointSprites,
}

impl RenderPath {
    /// Pick a strategy from adapter capability.
    ///
    /// Downlevel (GL-class) adapters take the batched-quad path; anything
    /// WebGPU-compliant gets point sprites.
    pub fn detect(adapter: &wgpu::Adapter) -> Self {
        if adapter.get_downlevel_capabilities().is_webgpu_compliant() {
            RenderPath::PointSprites
        } else {
            RenderPath::BatchedQuads
        }
    }
}
