//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Yaw/pitch orientation with pitch clamping
//! - Camera representation and transformations
//! - Projection matrix handling
//! - GPU uniform buffer packing
//!
//! ## Conventions
//! - Y is up; at yaw = pitch = 0 the camera looks along -Z
//! - Rotation order is yaw (around world Y) then pitch (around local X), so
//!   the camera never rolls

use cgmath::*;
use std::f32::consts::TAU;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Camera orientation in radians.
///
/// `pitch` is kept inside `[-limit, limit]` by every mutator. `yaw` is unbounded;
/// use [`Orientation::display_yaw`] for a wrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation around the world Y axis
    pub yaw: f32,
    /// Rotation around the camera's local X axis; positive looks up
    pub pitch: f32,
}

impl Orientation {
    /// Creates an orientation, clamping `pitch` to `[-pitch_limit, pitch_limit]`.
    pub fn new(yaw: f32, pitch: f32, pitch_limit: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-pitch_limit, pitch_limit),
        }
    }

    /// Applies a screen-space drag.
    ///
    /// Dragging right turns right and dragging down looks down.
    ///
    /// # Arguments
    /// * `dx`, `dy` - Drag delta in pixels
    /// * `sensitivity` - Radians per pixel
    /// * `pitch_limit` - Maximum absolute pitch
    pub fn apply_drag(&mut self, dx: f32, dy: f32, sensitivity: f32, pitch_limit: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-pitch_limit, pitch_limit);
    }

    /// Yaw wrapped into `[0, 2π)`.
    pub fn display_yaw(&self) -> f32 {
        self.yaw.rem_euclid(TAU)
    }

    /// The camera rotation, yaw applied first then pitch.
    pub fn rotation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(Rad(self.yaw)) * Quaternion::from_angle_x(Rad(self.pitch))
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation().rotate_vector(-Vector3::unit_z())
    }
}

/// Represents a first-person camera in 3D space.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// The camera's (eye) position in world space
    pub position: Point3<f32>,
    pub orientation: Orientation,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    pub fn new<V: Into<Point3<f32>>>(position: V, orientation: Orientation) -> Self {
        Self {
            position: position.into(),
            orientation,
        }
    }

    /// Gets the camera's forward direction vector.
    ///
    /// This is the direction of a ray through the screen center (the reticle).
    pub fn get_view_vec(&self) -> Vector3<f32> {
        self.orientation.forward()
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.get_view_vec(), Vector3::unit_y())
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug)]
pub struct Projection {
    /// width / height
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// Perspective projection for a `width` x `height` pixel viewport.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: Self::aspect_of(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::aspect_of(width, height);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Calculates the projection matrix.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    // A minimized window reports a zero height.
    fn aspect_of(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types are not Pod; matrices are stored as plain arrays.
    view_proj: [[f32; 4]; 4],
    position: [f32; 4],
}

impl CameraUniform {
    /// Creates a new camera uniform with identity matrices and zero position.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 0.0],
        }
    }

    /// Updates the view-projection matrix and position based on the current camera state.
    pub fn update_view_proj_and_pos(&mut self, camera: &Camera, projection: &Projection) {
        let viewproj = projection.calc_matrix() * camera.calc_matrix();
        self.view_proj = viewproj.into();
        let pos3: [f32; 3] = camera.position.into();

        self.position = [pos3[0], pos3[1], pos3[2], 1.0];
    }
}
