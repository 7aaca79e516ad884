//! Coordinates the render passes of one frame.
//!
//! # Architecture
//!
//! - `PipelineManager`: owns the shared camera uniform and the depth texture,
//!   and records the single render pass of a frame
//! - `SceneRenderer`: instanced blocks, ground and the highlight outline
//! - `HudRenderer`: screen-space widgets drawn last

use wgpu::{util::DeviceExt, BufferUsages, Device, Queue, Surface, SurfaceConfiguration, SurfaceError};

use super::{
    hud_renderer::HudRenderer, scene_renderer::SceneRenderer, snapshot::FrameSnapshot,
    texture::DepthTexture,
};
use crate::engine_state::{
    camera_state::camera::{CameraUniform, Projection},
    voxels::block::material::srgb_hex_to_linear,
};

pub const SKY_COLOR: u32 = 0x87ceeb;

pub struct PipelineManager {
    depth_texture: DepthTexture,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,
    camera_bind_group: wgpu::BindGroup,
    scene_renderer: SceneRenderer,
    hud_renderer: HudRenderer,
    clear_color: wgpu::Color,
}

impl PipelineManager {
    pub fn new(device: &Device, config: &SurfaceConfiguration) -> Self {
        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Camera Bind Group Layout"),
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        let [r, g, b, a] = srgb_hex_to_linear(SKY_COLOR, 1.0);

        Self {
            depth_texture: DepthTexture::new(device, config, "Depth Texture"),
            camera_buffer,
            camera_uniform,
            camera_bind_group,
            scene_renderer: SceneRenderer::new(device, config.format, &camera_bind_group_layout),
            hud_renderer: HudRenderer::new(device, config.format),
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        }
    }

    /// Renders one frame to `surface`.
    ///
    /// # Errors
    /// Returns the surface error if no frame could be acquired; nothing is drawn.
    pub fn render(
        &mut self,
        surface: &Surface,
        device: &Device,
        queue: &Queue,
        snapshot: &FrameSnapshot,
        projection: &Projection,
    ) -> Result<(), SurfaceError> {
        let frame = surface.get_current_texture()?;

        self.camera_uniform
            .update_view_proj_and_pos(&snapshot.camera, projection);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[self.camera_uniform]));
        self.scene_renderer.prepare(device, queue, snapshot);
        self.hud_renderer.prepare(device, queue, snapshot);

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.scene_renderer.render(&mut rpass, &self.camera_bind_group);
            self.hud_renderer.render(&mut rpass);
        }

        queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Recreates the depth texture for a resized surface.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = DepthTexture::new(device, config, "Depth Texture");
    }
}
