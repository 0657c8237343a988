//! GPU context management using wgpu

use crate::core::error::Error;

/// Headless GPU rendering context.
///
/// The renderer draws into caller-supplied texture views, so no surface or
/// window is involved; presentation belongs to the embedding application.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Create a new GPU context
    pub async fn new() -> Result<Self, Error> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Gpu(format!("No suitable adapter found: {:?}", e)))?;

        let device_desc = wgpu::DeviceDescriptor {
            label: Some("deepsky_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            experimental_features: Default::default(),
            trace: Default::default(),
        };

        let (device, queue) = adapter
            .request_device(&device_desc)
            .await
            .map_err(|e| Error::Gpu(e.to_string()))?;

        log::info!(
            "GPU adapter: {} (webgpu compliant: {})",
            adapter.get_info().name,
            adapter.get_downlevel_capabilities().is_webgpu_compliant()
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Create a new GPU context, blocking on adapter and device acquisition
    pub fn new_blocking() -> Result<Self, Error> {
        pollster::block_on(Self::new())
    }
}
