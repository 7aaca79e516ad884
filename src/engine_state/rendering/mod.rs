//! Rendering system for the sandbox.
//!
//! The renderer never reads world state directly. Each frame it receives a
//! [`FrameSnapshot`] built by the simulation and draws it with the instanced
//! scene pipelines followed by the HUD.

use cgmath::Deg;
use log::{error, warn};
use pipeline_manager::PipelineManager;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use super::camera_state::camera;
use crate::config::CameraConfig;

mod buffer_state;
mod hud_renderer;
mod pipeline_manager;
mod scene_renderer;
pub mod snapshot;
mod texture;
mod vertex;

pub use snapshot::FrameSnapshot;

/// Manages the surface, GPU handles and render pipelines.
pub struct SceneRendererManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    pipeline_manager: PipelineManager,
    /// Camera projection settings
    pub camera_projection: camera::Projection,
}

impl SceneRendererManager {
    /// Creates the renderer for a configured surface.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        camera_config: &CameraConfig,
    ) -> Self {
        let camera_projection = camera::Projection::new(
            surface_config.width,
            surface_config.height,
            Deg(camera_config.fovy_degrees),
            camera_config.znear,
            camera_config.zfar,
        );
        let pipeline_manager = PipelineManager::new(&device, &surface_config);

        Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
            camera_projection,
        }
    }

    /// Handles window resize events.
    ///
    /// Zero-sized windows (minimized) are ignored; the surface keeps its last size.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);

        self.camera_projection.resize(size.width, size.height);
        self.pipeline_manager.resize(&self.device, &self.surface_config);
    }

    /// Renders a new frame.
    ///
    /// Returns `false` when rendering cannot continue and the application
    /// should exit.
    pub fn render(&mut self, snapshot: &FrameSnapshot) -> bool {
        match self.pipeline_manager.render(
            &self.surface,
            &self.device,
            &self.queue,
            snapshot,
            &self.camera_projection,
        ) {
            Ok(()) => true,
            // Reconfigure and skip this frame
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface is out of memory, stopping");
                false
            }
            Err(e) => {
                warn!("Skipping frame: {e}");
                true
            }
        }
    }
}
