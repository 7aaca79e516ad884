//! # Voxel Sandbox Application Entry Point
//!
//! This is the main entry point for the native application version of the sandbox.
//! It calls into the library's `run()` function.
//!
//! For web applications, see the `run_web()` function in the library.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    voxel_sandbox::run();
}
