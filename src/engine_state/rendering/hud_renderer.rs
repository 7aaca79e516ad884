//! HUD rendering on top of the 3D scene.
//!
//! The HUD is rebuilt from the frame snapshot every frame and drawn last,
//! ignoring depth, with alpha blending.

use wgpu::{BufferUsages, Device, Queue, RenderPass, RenderPipeline, ShaderModule, TextureFormat};

use super::{
    buffer_state::BufferState,
    snapshot::FrameSnapshot,
    texture::DepthTexture,
    vertex::{hud_mesh, HudVertex},
};

const HUD_VERTEX_BUFFER: &str = "HUD Vertex Buffer";
const HUD_INDEX_BUFFER: &str = "HUD Index Buffer";

pub struct HudRenderer {
    render_pipeline: RenderPipeline,
    buffer_state: BufferState,
    index_count: u32,
}

impl HudRenderer {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("HUD Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/hud.wgsl").into()),
        });

        Self {
            render_pipeline: Self::create_render_pipeline(device, &shader, format),
            buffer_state: BufferState::new(),
            index_count: 0,
        }
    }

    fn create_render_pipeline(device: &Device, shader: &ShaderModule, format: TextureFormat) -> RenderPipeline {
        // No bind groups: vertices arrive in clip space.
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("HUD Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("HUD Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[HudVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthTexture::depth_stencil(
                false,
                wgpu::CompareFunction::Always,
            )),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn prepare(&mut self, device: &Device, queue: &Queue, snapshot: &FrameSnapshot) {
        let (vertices, indices) = hud_mesh(&snapshot.hud, snapshot.viewport);
        self.buffer_state
            .write_growable(device, queue, HUD_VERTEX_BUFFER, &vertices, BufferUsages::VERTEX);
        self.buffer_state
            .write_growable(device, queue, HUD_INDEX_BUFFER, &indices, BufferUsages::INDEX);
        self.index_count = indices.len() as u32;
    }

    pub fn render(&self, render_pass: &mut RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        let (Some(vertices), Some(indices)) = (
            self.buffer_state.get_buffer(HUD_VERTEX_BUFFER),
            self.buffer_state.get_buffer(HUD_INDEX_BUFFER),
        ) else {
            return;
        };

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
