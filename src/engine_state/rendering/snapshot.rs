//! Read-only frame data handed from the simulation to the renderer.

use cgmath::Point3;

use crate::engine_state::{
    camera_state::camera::Camera,
    hud::HudQuad,
    voxels::{block::Material, world::Ground},
};

/// One placed block as the renderer needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockInstance {
    pub position: Point3<i32>,
    pub material: Material,
}

/// Everything drawn in one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub camera: Camera,
    /// Blocks in placement order
    pub blocks: Vec<BlockInstance>,
    pub ground: Ground,
    /// Cell of the block under the reticle
    pub highlight: Option<Point3<i32>>,
    /// HUD widgets in screen pixels, back to front
    pub hud: Vec<HudQuad>,
    /// Size of the screen the HUD was laid out for
    pub viewport: (f64, f64),
}
