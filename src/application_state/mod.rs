//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Forwarding touch, mouse and keyboard input to the engine
//! - Application lifecycle events

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{GraphicsBuilder, GraphicsEvent, MaybeGraphics};
use input_manager::InputManager;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    config::SandboxConfig,
    engine_state::{editing::haptics::platform_haptics, simulation::UiEvent, EngineState},
};

/// The main application state container that manages the application's lifecycle.
///
/// It implements `ApplicationHandler` to handle window events and the
/// graphics initialization result.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, waiting for a size, or moved
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Cached window size for web platforms during initialization
    pub web_window_size: Option<PhysicalSize<u32>>,

    config: SandboxConfig,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The sandbox simulation and renderer
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,
}

impl ApplicationState {
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsEvent>, config: SandboxConfig) -> Self {
        Self {
            graphics: MaybeGraphics::Builder(GraphicsBuilder::new(event_loop_proxy)),
            state: None,
            web_window_size: None,
            config,
        }
    }

    /// Handles window resize events during the initialization phase.
    ///
    /// Configures the surface and starts the engine once the window has a real size.
    fn resized(&mut self, size: PhysicalSize<u32>) {
        let MaybeGraphics::Graphics(gfx) = &mut self.graphics else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }

        gfx.surface_config.width = size.width;
        gfx.surface_config.height = size.height;
        gfx.surface.configure(&gfx.device, &gfx.surface_config);
        gfx.is_surface_configured = true;
        self.initialize_application_state();
    }

    /// Moves the graphics resources into a new engine state.
    fn initialize_application_state(&mut self) {
        let gfx = match std::mem::replace(&mut self.graphics, MaybeGraphics::Moved) {
            MaybeGraphics::Graphics(gfx) => gfx,
            other => {
                self.graphics = other;
                return;
            }
        };

        let engine_state = EngineState::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            &self.config,
            platform_haptics(),
        );
        info!("Sandbox started");

        self.state = Some(InitializedApplicationState {
            engine_state,
            window: gfx.window,
            input_manager: InputManager::new(),
        });
    }
}

impl InitializedApplicationState {
    /// Applies keyboard shortcuts, then runs one tick and renders it.
    ///
    /// Returns `false` when the application should exit.
    fn frame(&mut self) -> bool {
        let processed_input = self.input_manager.get_and_reset_processed_input();
        for event in processed_input.ui_events() {
            if event == UiEvent::FullscreenToggled {
                self.toggle_fullscreen();
            }
            self.engine_state.handle_ui(event);
        }

        self.engine_state.tick_and_render()
    }

    fn toggle_fullscreen(&self) {
        if self.window.fullscreen().is_some() {
            info!("Leaving fullscreen");
            self.window.set_fullscreen(None);
        } else {
            info!("Entering fullscreen");
            self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }
}

impl ApplicationHandler<GraphicsEvent> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested
        | WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
            ..
        } = event
        {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            if let WindowEvent::Resized(size) = event {
                self.web_window_size = Some(size);
                self.resized(size);
            }
            return;
        };

        let now = web_time::Instant::now();
        if let Some(touch) = state.input_manager.intake_input(&event, now) {
            state.engine_state.handle_touch(&touch);
        }

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(false) => {
                if let Some(cancel) = state.input_manager.reset_inputs(now) {
                    state.engine_state.handle_touch(&cancel);
                }
            }
            WindowEvent::RedrawRequested => {
                if !state.frame() {
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    /// Starts graphics initialization on the first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the graphics initialization result.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsEvent) {
        let graphics = match graphics {
            Ok(graphics) => graphics,
            Err(err) => {
                error!("Graphics initialization failed: {err}");
                event_loop.exit();
                return;
            }
        };
        let is_surface_configured = graphics.is_surface_configured;

        self.graphics = MaybeGraphics::Graphics(graphics);

        if is_surface_configured {
            self.initialize_application_state();
        } else if let Some(size) = self.web_window_size {
            self.resized(size);
        }
    }

    /// Requests the next frame before the event loop goes to sleep.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}
