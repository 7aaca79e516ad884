//! # Camera State Management
//!
//! This module owns the first-person player: camera orientation, horizontal
//! movement from the joystick, and the vertical gravity/jump model.
//!
//! ## Core Components
//! - `PlayerState`: Position, vertical velocity, orientation and grounding
//! - `PlayerController`: Integrates one simulation tick from frame input
//! - `Camera` / `Projection` / `CameraUniform`: see [`camera`]
//!
//! ## Vertical Model
//! The ground is an infinite plane and the eye sits a constant height above
//! it. Each tick gravity is applied, then the position is clamped to the eye
//! height; the clamp test alone decides between `Grounded` and `Airborne`.

use cgmath::{InnerSpace, Point3, Rotation, Vector3};

use crate::config::PlayerConfig;

use camera::{Camera, Orientation};

pub mod camera;

/// Move vectors shorter than this do not move the player.
const MIN_MOVE_MAGNITUDE: f32 = 1e-4;

/// Vertical physics state, recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalState {
    Grounded,
    Airborne,
}

/// Everything the controller mutates once per tick.
#[derive(Debug, Clone, Copy)]
pub struct PlayerState {
    /// Eye position in world space
    pub position: Point3<f32>,
    /// Vertical velocity in units per tick
    pub velocity_y: f32,
    pub orientation: Orientation,
    pub vertical_state: VerticalState,
}

impl PlayerState {
    pub fn is_grounded(&self) -> bool {
        self.vertical_state == VerticalState::Grounded
    }
}

/// Integrates player orientation and position.
#[derive(Debug)]
pub struct PlayerController {
    state: PlayerState,
    config: PlayerConfig,
}

impl PlayerController {
    /// Creates a controller standing at the configured start position, facing -Z.
    pub fn new(config: PlayerConfig) -> Self {
        let [x, y, z] = config.start_position;
        let position = Point3::new(x, y.max(config.eye_height), z);
        let vertical_state = if position.y <= config.eye_height {
            VerticalState::Grounded
        } else {
            VerticalState::Airborne
        };

        Self {
            state: PlayerState {
                position,
                velocity_y: 0.0,
                orientation: Orientation::default(),
                vertical_state,
            },
            config,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn eye_height(&self) -> f32 {
        self.config.eye_height
    }

    /// Camera for raycasting and rendering.
    pub fn camera(&self) -> Camera {
        Camera::new(self.state.position, self.state.orientation)
    }

    /// Jump trigger. Only takes effect while grounded.
    ///
    /// # Returns
    /// `true` if the jump impulse was applied
    pub fn jump(&mut self) -> bool {
        if !self.state.is_grounded() {
            return false;
        }
        self.state.velocity_y = self.config.jump_impulse;
        true
    }

    /// Runs one simulation tick.
    ///
    /// # Arguments
    /// * `orientation` - Latest look orientation from the gesture classifier
    /// * `move_vector` - Joystick deflection `(move_x, move_z)`
    pub fn tick(&mut self, orientation: Orientation, move_vector: (f32, f32)) {
        self.state.orientation = Orientation::new(
            orientation.yaw,
            orientation.pitch,
            self.config.pitch_limit,
        );

        self.apply_horizontal_movement(move_vector);
        self.apply_vertical_physics();
    }

    fn apply_horizontal_movement(&mut self, (move_x, move_z): (f32, f32)) {
        if move_x.hypot(move_z) < MIN_MOVE_MAGNITUDE {
            return;
        }

        let mut direction = self
            .state
            .orientation
            .rotation()
            .rotate_vector(Vector3::new(move_x, 0.0, move_z));
        // Pitch must not change ground speed.
        direction.y = 0.0;

        if direction.magnitude() < MIN_MOVE_MAGNITUDE {
            return;
        }
        self.state.position += direction.normalize() * self.config.speed;
    }

    fn apply_vertical_physics(&mut self) {
        self.state.velocity_y -= self.config.gravity;
        self.state.position.y += self.state.velocity_y;

        if self.state.position.y <= self.config.eye_height {
            self.state.position.y = self.config.eye_height;
            self.state.velocity_y = 0.0;
            self.state.vertical_state = VerticalState::Grounded;
        } else {
            self.state.vertical_state = VerticalState::Airborne;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlayerController {
        PlayerController::new(PlayerConfig::default())
    }

    #[test]
    fn starts_grounded_at_eye_height() {
        let controller = controller();
        assert!(controller.state().is_grounded());
        assert_eq!(controller.state().position, Point3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn full_right_deflection_moves_along_positive_x() {
        let mut controller = controller();
        controller.tick(Orientation::default(), (1.0, 0.0));

        let position = controller.state().position;
        assert!((position.x - 0.15).abs() < 1e-5);
        assert!((position.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn forward_deflection_follows_yaw() {
        let mut controller = controller();
        let facing_left = Orientation { yaw: std::f32::consts::FRAC_PI_2, pitch: 0.0 };
        controller.tick(facing_left, (0.0, -1.0));
        assert!((controller.state().position.x + 0.15).abs() < 1e-5);
    }

    #[test]
    fn pitch_does_not_change_ground_speed() {
        let mut level = controller();
        let mut steep = controller();
        level.tick(Orientation::default(), (0.0, -1.0));
        steep.tick(Orientation { yaw: 0.0, pitch: 1.4 }, (0.0, -1.0));

        let level_step = 5.0 - level.state().position.z;
        let steep_step = 5.0 - steep.state().position.z;
        assert!((level_step - steep_step).abs() < 1e-5);
        assert_eq!(steep.state().position.y, 2.0);
    }

    #[test]
    fn zero_move_vector_does_not_move() {
        let mut controller = controller();
        controller.tick(Orientation::default(), (0.0, 0.0));
        assert_eq!(controller.state().position, Point3::new(0.0, 2.0, 5.0));
    }

    #[test]
    fn jump_rises_then_lands() {
        let mut controller = controller();
        assert!(controller.jump());
        let mut ticks = 0;
        loop {
            controller.tick(Orientation::default(), (0.0, 0.0));
            ticks += 1;
            let state = controller.state();
            if state.is_grounded() {
                break;
            }
            assert!(state.position.y > 2.0);
            assert!(ticks < 1000);
        }
        assert!(ticks > 10);
        assert_eq!(controller.state().velocity_y, 0.0);
    }

    #[test]
    fn no_double_jump_while_airborne() {
        let mut controller = controller();
        controller.jump();
        controller.tick(Orientation::default(), (0.0, 0.0));
        assert_eq!(controller.state().vertical_state, VerticalState::Airborne);

        let velocity = controller.state().velocity_y;
        assert!(!controller.jump());
        assert_eq!(controller.state().velocity_y, velocity);
    }

    #[test]
    fn grounding_invariant_holds_every_tick() {
        let mut controller = controller();
        for tick in 0..600 {
            if tick % 37 == 0 {
                controller.jump();
            }
            controller.tick(Orientation::default(), (0.3, -0.7));
            let state = controller.state();
            assert!(state.position.y >= controller.eye_height());
            if state.position.y <= controller.eye_height() {
                assert_eq!(state.velocity_y, 0.0);
                assert!(state.is_grounded());
            }
        }
    }

    #[test]
    fn orientation_is_clamped_on_tick() {
        let mut controller = controller();
        controller.tick(Orientation { yaw: 0.0, pitch: 3.0 }, (0.0, 0.0));
        assert_eq!(controller.state().orientation.pitch, 1.5);
    }
}
