//! Galaxy draw orchestration
//!
//! [`GalaxyRenderer`] owns everything the two draw strategies share: the
//! procedural textures, the pipelines, the quad staging batch, the per-form
//! GPU catalogs, and the light gain. Strategy is fixed at construction;
//! per-frame work is culling, brightness correction, matrix setup, and
//! dispatch to the selected path.

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::form::{FormCache, FormId, GalacticForm, GalaxyType, lod};
use crate::galaxy::Galaxy;

use super::batch::QuadBatch;
use super::context::GpuContext;
use super::path::RenderPath;
use super::pipeline::points::PointUniforms;
use super::pipeline::{PointPipeline, QuadPipeline};
use super::texture::GalaxyTextures;
use super::vertex::QuadVertex;

/// Sprites whose apparent half-size exceeds this fraction of their distance
/// are culled; below it the fraction drives the alpha fade
const MAX_SCREEN_FRAC: f32 = 0.1;

const LIGHT_GAIN_STEP: f32 = 0.05;

/// Per-frame view parameters for one galaxy draw
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// Galaxy position relative to the viewer
    pub offset: Vec3,
    pub viewer_orientation: Quat,
    /// Global brightness scalar
    pub brightness: f32,
    /// Angular size of one pixel at unit distance
    pub pixel_size: f32,
    pub projection: Mat4,
    pub view: Mat4,
}

pub struct GalaxyRenderer {
    path: RenderPath,
    textures: GalaxyTextures,
    quads: QuadPipeline,
    points: PointPipeline,
    batch: QuadBatch,
    light_gain: f32,
}

impl GalaxyRenderer {
    pub fn new(gpu: &GpuContext, target_format: wgpu::TextureFormat, path: RenderPath) -> Self {
        let textures = GalaxyTextures::new(&gpu.device, &gpu.queue);
        let quads = QuadPipeline::new(&gpu.device, target_format, &textures);
        let points = PointPipeline::new(&gpu.device, target_format, &textures);
        Self {
            path,
            textures,
            quads,
            points,
            batch: QuadBatch::new(),
            light_gain: 0.0,
        }
    }

    pub fn path(&self) -> RenderPath {
        self.path
    }

    pub fn light_gain(&self) -> f32 {
        self.light_gain
    }

    pub fn set_light_gain(&mut self, gain: f32) {
        self.light_gain = gain.clamp(0.0, 1.0);
    }

    pub fn increase_light_gain(&mut self) {
        self.light_gain = (self.light_gain + LIGHT_GAIN_STEP).min(1.0);
    }

    pub fn decrease_light_gain(&mut self) {
        self.light_gain = (self.light_gain - LIGHT_GAIN_STEP).max(0.0);
    }

    /// Draw one galaxy into `target`.
    ///
    /// Galaxies with an absent form or an apparent size below one on-screen
    /// feature are skipped before any GPU state is touched.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        cache: &FormCache,
        galaxy: &Galaxy,
        frame: &FrameParams,
    ) {
        let Some(form) = cache.form(galaxy.form_id()) else {
            return;
        };

        let distance = (frame.offset.length() - galaxy.radius()).max(0.0);
        let min_feature_size = frame.pixel_size * distance;
        let size = 2.0 * galaxy.radius();
        if size < min_feature_size {
            return;
        }

        let n_points = lod::detail_count(form.blobs.len(), galaxy.detail());
        if n_points == 0 {
            return;
        }

        let view_mat = Mat3::from_quat(frame.viewer_orientation.conjugate());
        let orientation = galaxy.orientation().conjugate();
        let m_linear = Mat3::from_quat(orientation) * Mat3::from_diagonal(form.scale * size);
        let mut model = Mat4::from_mat3(m_linear);
        model.w_axis = frame.offset.extend(1.0);

        let view_proj = frame.projection * frame.view;
        let brightness = self.corrected_brightness(galaxy.galaxy_type(), frame, orientation);

        match self.path {
            RenderPath::PointSprites => self.render_points(
                gpu,
                target,
                galaxy.form_id(),
                form,
                view_mat,
                model,
                view_proj,
                size,
                n_points,
                min_feature_size,
                brightness,
            ),
            RenderPath::BatchedQuads => self.render_quads(
                gpu,
                target,
                form,
                view_mat,
                model,
                view_proj,
                size,
                n_points,
                min_feature_size,
                brightness,
            ),
        }
    }

    /// Damp the brightening of disks and flat ellipticals seen edge-on
    fn corrected_brightness(&self, gtype: GalaxyType, frame: &FrameParams, orientation: Quat) -> f32 {
        let dist = frame.offset.length().max(1e-6);
        let mut corr = 1.0f32;
        if gtype < GalaxyType::E0 || gtype > GalaxyType::E3 {
            let cosi = (orientation * Vec3::Y).dot(frame.offset) / dist;
            corr = cosi.abs().sqrt().max(0.2);
        }
        if gtype > GalaxyType::E3 {
            let cosi = (orientation * Vec3::X).dot(frame.offset) / dist;
            corr = (corr * cosi.abs()).max(0.45);
        }
        let btot = if gtype == GalaxyType::Irr || gtype.is_elliptical() {
            2.5
        } else {
            5.0
        };
        (4.0 * self.light_gain + 1.0) * btot * corr * frame.brightness
    }

    #[allow(clippy::too_many_arguments)]
    fn render_points(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        form_id: FormId,
        form: &GalacticForm,
        view_mat: Mat3,
        model: Mat4,
        view_proj: Mat4,
        size: f32,
        n_points: usize,
        min_feature_size: f32,
        brightness: f32,
    ) {
        let visible = lod::capped_count(n_points, size, min_feature_size) as u32;
        if visible == 0 {
            return;
        }
        if !self
            .points
            .ensure_form_buffer(&gpu.device, &gpu.queue, form_id, form)
        {
            return;
        }

        let uniforms = PointUniforms::new(
            model,
            view_proj,
            Mat4::from_mat3(view_mat),
            size,
            brightness,
            min_feature_size,
        );
        self.points.write_uniforms(&gpu.queue, &uniforms);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("galaxy_points_encoder"),
            });
        {
            let mut pass = begin_overlay_pass(&mut encoder, target, "galaxy_points_pass");
            self.points.draw(&mut pass, &self.textures, form_id, visible);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }

    #[allow(clippy::too_many_arguments)]
    fn render_quads(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        form: &GalacticForm,
        view_mat: Mat3,
        model: Mat4,
        view_proj: Mat4,
        mut size: f32,
        n_points: usize,
        min_feature_size: f32,
        brightness: f32,
    ) {
        self.quads.write_uniforms(&gpu.queue, view_proj);
        self.batch.begin();

        let mut corners = [
            view_mat * Vec3::new(-1.0, -1.0, 0.0) * size,
            view_mat * Vec3::new(1.0, -1.0, 0.0) * size,
            view_mat * Vec3::new(1.0, 1.0, 0.0) * size,
            view_mat * Vec3::new(-1.0, 1.0, 0.0) * size,
        ];

        let mut pow2: usize = 1;
        for (i, blob) in form.blobs.iter().take(n_points).enumerate() {
            if i & pow2 != 0 {
                pow2 <<= 1;
                size *= lod::SPRITE_SCALE_FACTOR;
                for corner in &mut corners {
                    *corner *= lod::SPRITE_SCALE_FACTOR;
                }
                if size < min_feature_size {
                    break;
                }
            }

            let p = model.transform_point3(blob.position);
            let screen_frac = size / p.length();
            if screen_frac >= MAX_SCREEN_FRAC {
                continue;
            }
            let alpha = ((MAX_SCREEN_FRAC - screen_frac) * blob.brightness as f32 * brightness)
                .min(255.0) as u8;

            self.batch.push_quad(
                &gpu.device,
                &gpu.queue,
                [
                    QuadVertex::new(p + corners[0], 0, 0, blob.color_index, alpha),
                    QuadVertex::new(p + corners[1], 255, 0, blob.color_index, alpha),
                    QuadVertex::new(p + corners[2], 255, 255, blob.color_index, alpha),
                    QuadVertex::new(p + corners[3], 0, 255, blob.color_index, alpha),
                ],
            );
        }
        self.batch.flush(&gpu.device, &gpu.queue);
        if self.batch.draws().is_empty() {
            return;
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("galaxy_quads_encoder"),
            });
        {
            let mut pass = begin_overlay_pass(&mut encoder, target, "galaxy_quads_pass");
            self.quads.draw(&mut pass, &self.batch, &self.textures);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Pass that composites over the existing target contents
fn begin_overlay_pass<'a>(
    encoder: &'a mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    label: &'static str,
) -> wgpu::RenderPass<'a> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}
