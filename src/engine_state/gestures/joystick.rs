//! # Virtual Joystick
//!
//! A circular pad that turns one finger's offset from the pad center into a
//! move vector `(move_x, move_z)` in units of the pad radius.

use super::touch::TouchId;

#[derive(Debug, Clone, Default)]
pub struct Joystick {
    active: Option<TouchId>,
    move_vector: (f32, f32),
    clamp_to_unit: bool,
}

impl Joystick {
    /// # Arguments
    /// * `clamp_to_unit` - Limit the move vector to the unit circle
    pub fn new(clamp_to_unit: bool) -> Self {
        Self {
            active: None,
            move_vector: (0.0, 0.0),
            clamp_to_unit,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn tracks(&self, id: TouchId) -> bool {
        self.active == Some(id)
    }

    /// Captures a finger. Ignored while another finger drives the pad.
    pub fn begin(&mut self, id: TouchId, position: (f64, f64), center: (f64, f64), radius: f64) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(id);
        self.update(id, position, center, radius);
        true
    }

    /// Follows the tracked finger, even outside the pad.
    pub fn update(&mut self, id: TouchId, (x, y): (f64, f64), (cx, cy): (f64, f64), radius: f64) {
        if !self.tracks(id) {
            return;
        }

        let mut move_x = ((x - cx) / radius) as f32;
        let mut move_z = ((y - cy) / radius) as f32;

        if self.clamp_to_unit {
            let length = move_x.hypot(move_z);
            if length > 1.0 {
                move_x /= length;
                move_z /= length;
            }
        }

        self.move_vector = (move_x, move_z);
    }

    /// Releases the tracked finger and recenters the stick.
    pub fn end(&mut self, id: TouchId) {
        if !self.tracks(id) {
            return;
        }
        self.active = None;
        self.move_vector = (0.0, 0.0);
    }

    pub fn move_vector(&self) -> (f32, f32) {
        self.move_vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: (f64, f64) = (60.0, 540.0);
    const RADIUS: f64 = 40.0;

    #[test]
    fn rim_deflection_is_unit() {
        let mut joystick = Joystick::new(true);
        joystick.begin(1, (100.0, 540.0), CENTER, RADIUS);
        assert_eq!(joystick.move_vector(), (1.0, 0.0));
    }

    #[test]
    fn clamped_beyond_the_rim() {
        let mut joystick = Joystick::new(true);
        joystick.begin(1, CENTER, CENTER, RADIUS);
        joystick.update(1, (60.0, 640.0), CENTER, RADIUS);
        assert_eq!(joystick.move_vector(), (0.0, 1.0));
    }

    #[test]
    fn unclamped_mode_scales_linearly() {
        let mut joystick = Joystick::new(false);
        joystick.begin(1, CENTER, CENTER, RADIUS);
        joystick.update(1, (140.0, 500.0), CENTER, RADIUS);
        assert_eq!(joystick.move_vector(), (2.0, -1.0));
    }

    #[test]
    fn release_recenters_and_other_fingers_are_ignored() {
        let mut joystick = Joystick::new(true);
        joystick.begin(1, (80.0, 540.0), CENTER, RADIUS);
        assert!(!joystick.begin(2, (40.0, 540.0), CENTER, RADIUS));

        joystick.update(2, (20.0, 540.0), CENTER, RADIUS);
        assert_eq!(joystick.move_vector(), (0.5, 0.0));

        joystick.end(2);
        assert!(joystick.is_active());
        joystick.end(1);
        assert!(!joystick.is_active());
        assert_eq!(joystick.move_vector(), (0.0, 0.0));
    }
}
