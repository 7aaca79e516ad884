//! Vertex data structures and layouts for block rendering.
//!
//! Every block and the ground share a single unit cube mesh; the highlight
//! uses the same cube's edges as a line list. Per-object data travels in an
//! instance buffer. HUD quads use their own flat vertex format.

use crate::engine_state::{
    hud::HudQuad,
    voxels::block::{block_side::BlockSide, BLOCK_HALF_EXTENT},
};

/// A corner of the unit cube with the normal of the face it belongs to.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl Vertex {
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-object transform and color.
///
/// The cube is scaled per axis before being moved to `offset`: a ground plane
/// is a cube flattened to zero height.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    offset: [f32; 3],
    scale: [f32; 3],
    /// Linear RGBA
    color: [f32; 4],
}

impl Instance {
    pub fn new(offset: [f32; 3], scale: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            offset,
            scale,
            color,
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.color[3] < 1.0
    }

    /// # Shader Attributes
    /// - `location = 2`: offset (vec3<f32>)
    /// - `location = 3`: scale (vec3<f32>)
    /// - `location = 4`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// A HUD vertex already in normalized device coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HudVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl HudVertex {
    /// # Shader Attributes
    /// - `location = 0`: position (vec2<f32>)
    /// - `location = 1`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HudVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Builds the 24 vertices and 36 indices of a unit cube centered on the origin.
///
/// Faces wind counter-clockwise seen from outside.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for side in BlockSide::all() {
        let normal = side.normal();
        // Two axes spanning the face, ordered so that u x v points along the normal.
        let (u, v) = match side {
            BlockSide::TOP | BlockSide::BOTTOM => ([0.0, 0.0, normal.y], [1.0, 0.0, 0.0]),
            BlockSide::LEFT | BlockSide::RIGHT => ([0.0, normal.x, 0.0], [0.0, 0.0, 1.0]),
            BlockSide::FRONT | BlockSide::BACK => ([normal.z, 0.0, 0.0], [0.0, 1.0, 0.0]),
        };

        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = [
                (normal.x + su * u[0] + sv * v[0]) * BLOCK_HALF_EXTENT,
                (normal.y + su * u[1] + sv * v[1]) * BLOCK_HALF_EXTENT,
                (normal.z + su * u[2] + sv * v[2]) * BLOCK_HALF_EXTENT,
            ];
            vertices.push(Vertex {
                position: corner,
                normal: normal.into(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

/// Builds the 8 corners and 12 edges of a unit cube centered on the origin,
/// as a line list.
///
/// Normals are zero; outlines are drawn unlit.
pub fn cube_outline_mesh() -> (Vec<Vertex>, Vec<u16>) {
    // Corner `i` has bit 0 set for +x, bit 1 for +y and bit 2 for +z.
    let vertices = (0..8u16)
        .map(|i| {
            let sign = |bit: u16| if i & bit == 0 { -1.0 } else { 1.0 };
            Vertex {
                position: [
                    sign(1) * BLOCK_HALF_EXTENT,
                    sign(2) * BLOCK_HALF_EXTENT,
                    sign(4) * BLOCK_HALF_EXTENT,
                ],
                normal: [0.0; 3],
            }
        })
        .collect();

    let mut indices = Vec::with_capacity(24);
    for corner in 0..8u16 {
        for bit in [1, 2, 4] {
            if corner & bit == 0 {
                indices.extend_from_slice(&[corner, corner | bit]);
            }
        }
    }

    (vertices, indices)
}

/// Converts HUD quads from screen pixels to NDC triangles.
///
/// Returns no geometry for an empty viewport.
pub fn hud_mesh(quads: &[HudQuad], (width, height): (f64, f64)) -> (Vec<HudVertex>, Vec<u32>) {
    if width <= 0.0 || height <= 0.0 {
        return (Vec::new(), Vec::new());
    }

    let to_ndc = |(x, y): (f64, f64)| [(x / width * 2.0 - 1.0) as f32, (1.0 - y / height * 2.0) as f32];

    let mut vertices = Vec::with_capacity(quads.len() * 4);
    let mut indices = Vec::with_capacity(quads.len() * 6);
    for quad in quads {
        let (min, max) = (quad.rect.min, quad.rect.max);
        let base = vertices.len() as u32;
        // Screen y points down, so `min` is the top-left corner.
        for corner in [(min.0, max.1), (max.0, max.1), (max.0, min.1), (min.0, min.1)] {
            vertices.push(HudVertex {
                position: to_ndc(corner),
                color: quad.color,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;
    use crate::engine_state::hud::HudRect;

    fn v3(p: [f32; 3]) -> Vector3<f32> {
        Vector3::new(p[0], p[1], p[2])
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);

        for triangle in indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| vertices[triangle[i] as usize]);
            let winding = (v3(b.position) - v3(a.position)).cross(v3(c.position) - v3(a.position));
            assert!(winding.dot(v3(a.normal)) > 0.0);
        }
    }

    #[test]
    fn cube_corners_lie_on_the_unit_block() {
        let (vertices, _) = cube_mesh();
        for vertex in vertices {
            for coordinate in vertex.position {
                assert_eq!(coordinate.abs(), BLOCK_HALF_EXTENT);
            }
        }
    }

    #[test]
    fn outline_has_twelve_unit_edges() {
        let (vertices, indices) = cube_outline_mesh();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 24);

        let mut edges: Vec<(u16, u16)> = indices.chunks(2).map(|edge| (edge[0], edge[1])).collect();
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), 12);

        for (a, b) in edges {
            let length = (v3(vertices[b as usize].position) - v3(vertices[a as usize].position)).magnitude();
            assert!((length - 2.0 * BLOCK_HALF_EXTENT).abs() < 1e-6);
        }
    }

    #[test]
    fn hud_quad_maps_to_ndc() {
        let quad = HudQuad {
            rect: HudRect {
                min: (0.0, 0.0),
                max: (400.0, 300.0),
            },
            color: [1.0; 4],
        };
        let (vertices, indices) = hud_mesh(&[quad], (800.0, 600.0));
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(vertices[0].position, [-1.0, 0.0]);
        assert_eq!(vertices[2].position, [0.0, 1.0]);
    }

    #[test]
    fn translucency_follows_alpha() {
        assert!(Instance::new([0.0; 3], [1.0; 3], [1.0, 1.0, 1.0, 0.4]).is_translucent());
        assert!(!Instance::new([0.0; 3], [1.0; 3], [1.0; 4]).is_translucent());
    }
}
