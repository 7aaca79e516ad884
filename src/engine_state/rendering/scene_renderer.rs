//! Scene renderer for blocks, the ground and the highlight outline.
//!
//! # Architecture
//!
//! One unit cube mesh is drawn instanced in three steps per frame:
//! 1. Opaque instances (ground and solid blocks) with depth writes
//! 2. Translucent instances (glass), sorted back to front, alpha blended
//!    without depth writes
//! 3. The highlight as a wireframe of the cube's 12 edges, unlit

use cgmath::{MetricSpace, Point3};
use wgpu::{BindGroupLayout, BufferUsages, Device, Queue, RenderPass, RenderPipeline, TextureFormat};

use super::{
    buffer_state::BufferState,
    snapshot::FrameSnapshot,
    texture::DepthTexture,
    vertex::{cube_mesh, cube_outline_mesh, Instance, Vertex},
};
use crate::engine_state::voxels::block::material::srgb_hex_to_linear;

const CUBE_VERTEX_BUFFER: &str = "Cube Vertex Buffer";
const CUBE_INDEX_BUFFER: &str = "Cube Index Buffer";
const OPAQUE_INSTANCE_BUFFER: &str = "Opaque Instance Buffer";
const TRANSLUCENT_INSTANCE_BUFFER: &str = "Translucent Instance Buffer";
const OUTLINE_VERTEX_BUFFER: &str = "Outline Vertex Buffer";
const OUTLINE_INDEX_BUFFER: &str = "Outline Index Buffer";
const OUTLINE_INSTANCE_BUFFER: &str = "Outline Instance Buffer";

pub const GROUND_COLOR: u32 = 0x3a7d3a;
const HIGHLIGHT_COLOR: u32 = 0xffffff;
const HIGHLIGHT_OPACITY: f32 = 0.4;
const HIGHLIGHT_SCALE: f32 = 1.02;

/// Instances for one frame, split by blending mode.
#[derive(Debug, Default, PartialEq)]
pub struct SceneInstances {
    pub opaque: Vec<Instance>,
    /// Farthest from the camera first
    pub translucent: Vec<Instance>,
    /// Drawn as edges only
    pub outline: Vec<Instance>,
}

impl SceneInstances {
    pub fn from_snapshot(snapshot: &FrameSnapshot) -> Self {
        let ground = snapshot.ground;
        let mut opaque = vec![Instance::new(
            [0.0, ground.height, 0.0],
            [ground.half_extent * 2.0, 0.0, ground.half_extent * 2.0],
            srgb_hex_to_linear(GROUND_COLOR, 1.0),
        )];
        let mut translucent: Vec<(f32, Instance)> = Vec::new();
        let eye = snapshot.camera.position;

        let center = |cell: Point3<i32>| Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);

        for block in &snapshot.blocks {
            let position = center(block.position);
            let instance = Instance::new(position.into(), [1.0; 3], block.material.linear_rgba());
            if instance.is_translucent() {
                translucent.push((eye.distance2(position), instance));
            } else {
                opaque.push(instance);
            }
        }

        let outline = snapshot
            .highlight
            .map(|cell| {
                Instance::new(
                    center(cell).into(),
                    [HIGHLIGHT_SCALE; 3],
                    srgb_hex_to_linear(HIGHLIGHT_COLOR, HIGHLIGHT_OPACITY),
                )
            })
            .into_iter()
            .collect();

        translucent.sort_by(|(a, _), (b, _)| b.total_cmp(a));

        Self {
            opaque,
            translucent: translucent.into_iter().map(|(_, instance)| instance).collect(),
            outline,
        }
    }
}

pub struct SceneRenderer {
    opaque_pipeline: RenderPipeline,
    translucent_pipeline: RenderPipeline,
    outline_pipeline: RenderPipeline,
    buffer_state: BufferState,
    index_count: u32,
    outline_index_count: u32,
    opaque_count: u32,
    translucent_count: u32,
    outline_count: u32,
}

/// What differs between the scene pipelines.
struct PipelineVariant<'a> {
    label: &'a str,
    fragment_entry: &'a str,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write: bool,
}

impl SceneRenderer {
    /// Creates the pipelines and uploads the cube mesh.
    pub fn new(device: &Device, format: TextureFormat, camera_layout: &BindGroupLayout) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Render Pipeline Layout"),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        });

        let create = |variant: PipelineVariant<'_>| {
            Self::create_render_pipeline(device, &pipeline_layout, &shader, format, variant)
        };
        let opaque_pipeline = create(PipelineVariant {
            label: "Opaque Render Pipeline",
            fragment_entry: "fs_main",
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: wgpu::BlendState::REPLACE,
            depth_write: true,
        });
        let translucent_pipeline = create(PipelineVariant {
            label: "Translucent Render Pipeline",
            fragment_entry: "fs_main",
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write: false,
        });
        let outline_pipeline = create(PipelineVariant {
            label: "Outline Render Pipeline",
            fragment_entry: "fs_outline",
            topology: wgpu::PrimitiveTopology::LineList,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write: false,
        });

        let (vertices, indices) = cube_mesh();
        let (outline_vertices, outline_indices) = cube_outline_mesh();
        let mut buffer_state = BufferState::new();
        buffer_state.create_buffer_init(device, CUBE_VERTEX_BUFFER, &vertices, BufferUsages::VERTEX);
        buffer_state.create_buffer_init(device, CUBE_INDEX_BUFFER, &indices, BufferUsages::INDEX);
        buffer_state.create_buffer_init(
            device,
            OUTLINE_VERTEX_BUFFER,
            &outline_vertices,
            BufferUsages::VERTEX,
        );
        buffer_state.create_buffer_init(
            device,
            OUTLINE_INDEX_BUFFER,
            &outline_indices,
            BufferUsages::INDEX,
        );

        Self {
            opaque_pipeline,
            translucent_pipeline,
            outline_pipeline,
            buffer_state,
            index_count: indices.len() as u32,
            outline_index_count: outline_indices.len() as u32,
            opaque_count: 0,
            translucent_count: 0,
            outline_count: 0,
        }
    }

    fn create_render_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: TextureFormat,
        variant: PipelineVariant<'_>,
    ) -> RenderPipeline {
        // Lines have no facing.
        let cull_mode = match variant.topology {
            wgpu::PrimitiveTopology::TriangleList => Some(wgpu::Face::Back),
            _ => None,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(variant.label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc(), Instance::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(variant.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(variant.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: variant.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthTexture::depth_stencil(
                variant.depth_write,
                wgpu::CompareFunction::Less,
            )),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Uploads this frame's instances.
    pub fn prepare(&mut self, device: &Device, queue: &Queue, snapshot: &FrameSnapshot) {
        let instances = SceneInstances::from_snapshot(snapshot);
        self.buffer_state.write_growable(
            device,
            queue,
            OPAQUE_INSTANCE_BUFFER,
            &instances.opaque,
            BufferUsages::VERTEX,
        );
        self.buffer_state.write_growable(
            device,
            queue,
            TRANSLUCENT_INSTANCE_BUFFER,
            &instances.translucent,
            BufferUsages::VERTEX,
        );
        self.buffer_state.write_growable(
            device,
            queue,
            OUTLINE_INSTANCE_BUFFER,
            &instances.outline,
            BufferUsages::VERTEX,
        );
        self.opaque_count = instances.opaque.len() as u32;
        self.translucent_count = instances.translucent.len() as u32;
        self.outline_count = instances.outline.len() as u32;
    }

    /// Draws the instances uploaded by the last [`SceneRenderer::prepare`].
    pub fn render(&self, render_pass: &mut RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        let (Some(vertices), Some(indices)) = (
            self.buffer_state.get_buffer(CUBE_VERTEX_BUFFER),
            self.buffer_state.get_buffer(CUBE_INDEX_BUFFER),
        ) else {
            return;
        };

        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);

        for (pipeline, buffer_name, count) in [
            (&self.opaque_pipeline, OPAQUE_INSTANCE_BUFFER, self.opaque_count),
            (
                &self.translucent_pipeline,
                TRANSLUCENT_INSTANCE_BUFFER,
                self.translucent_count,
            ),
        ] {
            if count == 0 {
                continue;
            }
            let Some(instances) = self.buffer_state.get_buffer(buffer_name) else {
                continue;
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_vertex_buffer(1, instances.slice(..));
            render_pass.draw_indexed(0..self.index_count, 0, 0..count);
        }

        if self.outline_count == 0 {
            return;
        }
        let (Some(vertices), Some(indices), Some(instances)) = (
            self.buffer_state.get_buffer(OUTLINE_VERTEX_BUFFER),
            self.buffer_state.get_buffer(OUTLINE_INDEX_BUFFER),
            self.buffer_state.get_buffer(OUTLINE_INSTANCE_BUFFER),
        ) else {
            return;
        };
        render_pass.set_pipeline(&self.outline_pipeline);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.set_vertex_buffer(1, instances.slice(..));
        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.outline_index_count, 0, 0..self.outline_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        camera_state::camera::{Camera, Orientation},
        rendering::snapshot::BlockInstance,
        voxels::{block::Material, world::Ground},
    };

    fn snapshot(blocks: Vec<BlockInstance>, highlight: Option<Point3<i32>>) -> FrameSnapshot {
        FrameSnapshot {
            camera: Camera::new(Point3::new(0.0, 2.0, 5.0), Orientation::default()),
            blocks,
            ground: Ground {
                height: 0.0,
                half_extent: 100.0,
            },
            highlight,
            hud: Vec::new(),
            viewport: (800.0, 600.0),
        }
    }

    fn block(x: i32, material: Material) -> BlockInstance {
        BlockInstance {
            position: Point3::new(x, 1, 0),
            material,
        }
    }

    #[test]
    fn ground_is_the_first_opaque_instance() {
        let instances = SceneInstances::from_snapshot(&snapshot(Vec::new(), None));
        assert_eq!(instances.opaque.len(), 1);
        assert_eq!(
            instances.opaque[0],
            Instance::new([0.0; 3], [200.0, 0.0, 200.0], srgb_hex_to_linear(GROUND_COLOR, 1.0))
        );
        assert!(instances.translucent.is_empty());
    }

    #[test]
    fn glass_is_sorted_back_to_front() {
        let blocks = vec![
            block(0, Material::Glass),
            block(1, Material::Stone),
            block(8, Material::Glass),
        ];
        let instances = SceneInstances::from_snapshot(&snapshot(blocks, None));

        assert_eq!(instances.opaque.len(), 2);
        assert_eq!(
            instances.translucent,
            vec![
                Instance::new([8.0, 1.0, 0.0], [1.0; 3], Material::Glass.linear_rgba()),
                Instance::new([0.0, 1.0, 0.0], [1.0; 3], Material::Glass.linear_rgba()),
            ]
        );
    }

    #[test]
    fn highlight_is_an_outline_not_a_fill() {
        let blocks = vec![block(0, Material::Glass), block(1, Material::Stone)];
        let instances = SceneInstances::from_snapshot(&snapshot(blocks, Some(Point3::new(1, 1, 0))));

        let highlight = Instance::new(
            [1.0, 1.0, 0.0],
            [HIGHLIGHT_SCALE; 3],
            srgb_hex_to_linear(HIGHLIGHT_COLOR, HIGHLIGHT_OPACITY),
        );
        assert_eq!(instances.outline, vec![highlight]);
        assert!(!instances.translucent.contains(&highlight));
        assert!(!instances.opaque.contains(&highlight));
        assert_eq!(instances.translucent.len(), 1);
    }

    #[test]
    fn no_outline_without_highlight() {
        let instances = SceneInstances::from_snapshot(&snapshot(vec![block(0, Material::Stone)], None));
        assert!(instances.outline.is_empty());
    }
}
