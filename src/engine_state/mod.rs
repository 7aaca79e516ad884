//! # Engine State Module
//!
//! The engine module that owns the sandbox session and its renderer.
//!
//! ## Key Components
//!
//! * `EngineState` - Couples the [`simulation::Simulation`] with the GPU renderer
//! * `camera_state` - First-person player, camera and projection
//! * `gestures` - Classifies raw touches into look, move and edit input
//! * `editing` - Raycast placement and removal, hotbar and haptics
//! * `hud` - Screen-space widgets and their touch targets
//! * `rendering` - Draws a [`rendering::FrameSnapshot`] each frame
//! * `voxels` - Block storage, materials and ray casting
//!
//! ## Architecture
//!
//! The simulation is plain data and runs without a GPU. Each frame the
//! `EngineState` ticks it once, takes a snapshot and hands that to the
//! renderer, so the renderer never borrows the world.

use rendering::SceneRendererManager;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::config::SandboxConfig;

use editing::haptics::Haptics;
use gestures::touch::TouchEvent;
use simulation::{Simulation, UiEvent};

pub mod camera_state;
pub mod editing;
pub mod gestures;
pub mod hud;
pub mod rendering;
pub mod simulation;
pub mod voxels;

/// The running sandbox: simulation plus renderer.
pub struct EngineState {
    pub simulation: Simulation,
    pub render_manager: SceneRendererManager,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// # Arguments
    ///
    /// * `surface` - The rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `config` - Sandbox tuning
    /// * `haptics` - Feedback sink for successful edits
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: &SandboxConfig,
        haptics: Box<dyn Haptics>,
    ) -> Self {
        let simulation = Simulation::new(
            config,
            surface_config.width as f64,
            surface_config.height as f64,
            haptics,
        );
        let render_manager =
            SceneRendererManager::new(surface, surface_config, device, queue, &config.camera);

        Self {
            simulation,
            render_manager,
        }
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) {
        self.simulation.handle_touch(event);
    }

    pub fn handle_ui(&mut self, event: UiEvent) {
        self.simulation.handle_ui(event);
    }

    /// Resizes the rendering surface and the screen layout when the window size changes
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.render_manager.resize_surface(size);
        self.simulation
            .resize(size.width as f64, size.height as f64);
    }

    /// Advances the simulation one tick and renders the result.
    ///
    /// Returns `false` when the renderer cannot continue.
    pub fn tick_and_render(&mut self) -> bool {
        self.simulation.tick();
        let snapshot = self.simulation.snapshot();
        self.render_manager.render(&snapshot)
    }
}
