#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! A mobile-first first-person voxel sandbox built with Rust and WGPU, for
//! native windows and WebAssembly canvases.
//!
//! The player walks on an infinite ground plane with an on-screen joystick,
//! looks around by dragging, and places or breaks unit blocks with taps and
//! long presses.
//!
//! ## Key Modules
//!
//! * `application_state` - Window lifecycle and input forwarding
//! * `config` - JSON tuning file with defaults
//! * `engine_state` - Simulation (gestures, player, world, editing, HUD) and rendering
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_sandbox::run();
//! }
//! ```
//!
//! For web applications `run_web` is exported through `wasm-bindgen`.

use application_state::ApplicationState;
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use log::{error, info};
use winit::event_loop::EventLoop;

mod application_state;
pub mod config;
pub mod engine_state;

#[cfg(target_family = "wasm")]
const CANVAS_ID: &str = "wgpu-canvas";

#[cfg(not(target_family = "wasm"))]
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = config::SandboxConfig::load();

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Failed to create event loop: {err}");
            return;
        }
    };

    let mut state = ApplicationState::new(event_loop.create_proxy(), config);

    if let Err(err) = event_loop.run_app(&mut state) {
        error!("Event loop stopped with an error: {err}");
    }
}

#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() {
    use winit::platform::web::EventLoopExtWebSys;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Couldn't initialize logger: {err}").into());
    }
    info!("Logger initialized");

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Failed to create event loop: {err}");
            return;
        }
    };

    // No filesystem in the browser; the defaults apply.
    let state = ApplicationState::new(event_loop.create_proxy(), config::SandboxConfig::default());

    event_loop.spawn_app(state);
}
