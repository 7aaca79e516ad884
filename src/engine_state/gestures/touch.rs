//! # Touch Events
//!
//! Platform-neutral touch events and the screen partition used to route them.

use web_time::Instant;

use crate::config::{JoystickConfig, LookConfig};

/// Platform identifier of a finger, stable from start to end.
pub type TouchId = u64;

/// Lifecycle phase of a touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    /// The platform took the touch away (e.g. a system gesture).
    Cancelled,
}

/// A single touch point update in physical screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct TouchEvent {
    pub id: TouchId,
    pub phase: TouchPhase,
    /// Position with the origin at the top-left corner, y pointing down
    pub position: (f64, f64),
    pub at: Instant,
}

impl TouchEvent {
    pub fn new(id: TouchId, phase: TouchPhase, position: (f64, f64), at: Instant) -> Self {
        Self {
            id,
            phase,
            position,
            at,
        }
    }
}

/// Screen partition into the look region and the joystick pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub width: f64,
    pub height: f64,
    /// Height of the bottom strip that the left half excludes from looking
    pub bottom_strip: f64,
    pub joystick_center: (f64, f64),
    pub joystick_radius: f64,
}

impl ScreenLayout {
    pub fn new(width: f64, height: f64, look: &LookConfig, joystick: &JoystickConfig) -> Self {
        let mut layout = Self {
            width,
            height,
            bottom_strip: look.bottom_strip_px,
            joystick_center: (0.0, 0.0),
            joystick_radius: joystick.radius_px,
        };
        layout.place_joystick(joystick.margin_px);
        layout
    }

    /// Recomputes the partition for a new viewport size.
    pub fn resize(&mut self, width: f64, height: f64, joystick_margin: f64) {
        self.width = width;
        self.height = height;
        self.place_joystick(joystick_margin);
    }

    /// Right half, plus everything above the bottom strip.
    pub fn is_look_region(&self, (x, y): (f64, f64)) -> bool {
        x > self.width / 2.0 || y < self.height - self.bottom_strip
    }

    pub fn is_in_joystick(&self, (x, y): (f64, f64)) -> bool {
        let (cx, cy) = self.joystick_center;
        (x - cx).hypot(y - cy) <= self.joystick_radius
    }

    // Bottom-left corner, `margin` away from both edges.
    fn place_joystick(&mut self, margin: f64) {
        self.joystick_center = (
            margin + self.joystick_radius,
            self.height - margin - self.joystick_radius,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ScreenLayout {
        ScreenLayout::new(800.0, 600.0, &LookConfig::default(), &JoystickConfig::default())
    }

    #[test]
    fn joystick_sits_in_bottom_left_strip() {
        let layout = layout();
        assert_eq!(layout.joystick_center, (60.0, 540.0));
        assert!(layout.is_in_joystick((60.0, 540.0)));
        assert!(layout.is_in_joystick((100.0, 540.0)));
        assert!(!layout.is_in_joystick((101.0, 540.0)));
        assert!(!layout.is_look_region(layout.joystick_center));
    }

    #[test]
    fn look_region_covers_right_half_and_top() {
        let layout = layout();
        assert!(layout.is_look_region((600.0, 590.0)));
        assert!(layout.is_look_region((100.0, 100.0)));
        assert!(!layout.is_look_region((100.0, 550.0)));
    }

    #[test]
    fn resize_moves_the_pad() {
        let mut layout = layout();
        layout.resize(1024.0, 768.0, 20.0);
        assert_eq!(layout.joystick_center, (60.0, 708.0));
    }
}
