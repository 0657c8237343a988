//! Procedural textures shared by both galaxy draw paths
//!
//! Two small process-lifetime textures: the radial sprite falloff every blob
//! is stamped with, and a 256-entry hue ramp indexed by blob color. The hue
//! profile follows true-color imaging of spirals: warm core indices bending
//! to a fixed blue past index 27.

use wgpu::util::DeviceExt as _;

pub const SPRITE_TEXTURE_SIZE: u32 = 128;
pub const COLOR_RAMP_SIZE: u32 = 256;

/// Radial falloff, R8: max(0, 0.9 - hypot(u, v)) over [-1, 1]^2
pub fn sprite_texture_data() -> Vec<u8> {
    let n = SPRITE_TEXTURE_SIZE;
    let mut data = Vec::with_capacity((n * n) as usize);
    for y in 0..n {
        for x in 0..n {
            let u = (2 * x + 1) as f32 / n as f32 - 1.0;
            let v = (2 * y + 1) as f32 / n as f32 - 1.0;
            let r = (0.9 - u.hypot(v)).max(0.0);
            data.push((r * 255.99) as u8);
        }
    }
    data
}

/// Hue ramp, RGBA8: hue = 25 * tanh(0.0615 * (27 - i)) for i < 28, else 245
pub fn color_ramp_data() -> Vec<u8> {
    let mut data = Vec::with_capacity((COLOR_RAMP_SIZE * 4) as usize);
    for i in 0..COLOR_RAMP_SIZE as i32 {
        let hue = if i < 28 {
            25.0 * (0.0615 * (27 - i) as f32).tanh()
        } else {
            245.0
        };
        let (r, g, b) = hsv_to_rgb(hue, 0.20, 1.0);
        data.push((r * 255.99) as u8);
        data.push((g * 255.99) as u8);
        data.push((b * 255.99) as u8);
        data.push(255);
    }
    data
}

/// HSV to RGB, hue in degrees
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let h = (h.rem_euclid(360.0)) / 60.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// GPU objects for the shared textures, bound as one group in both pipelines
pub struct GalaxyTextures {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GalaxyTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let sprite = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("galaxy_sprite_tex"),
                size: wgpu::Extent3d {
                    width: SPRITE_TEXTURE_SIZE,
                    height: SPRITE_TEXTURE_SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &sprite_texture_data(),
        );

        let ramp = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("galaxy_color_ramp"),
                size: wgpu::Extent3d {
                    width: COLOR_RAMP_SIZE,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &color_ramp_data(),
        );

        let sprite_view = sprite.create_view(&wgpu::TextureViewDescriptor::default());
        let ramp_view = ramp.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("galaxy_tex_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("galaxy_textures_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("galaxy_textures"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&sprite_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&ramp_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
