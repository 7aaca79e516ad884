//! # Input Manager
//!
//! This module turns window events into sandbox input:
//! - Keyboard state tracking for the desktop shortcuts
//! - Touch events converted to the platform-neutral [`TouchEvent`]
//! - The left mouse button emulated as one extra finger

use std::collections::{HashMap, HashSet};

use web_time::Instant;
use winit::{
    event::{ElementState, KeyEvent, MouseButton, Touch, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{ProcessedInputState, RawInputState, FULLSCREEN_KEYS, HOTBAR_KEYS, JUMP_KEY};
use crate::engine_state::gestures::touch::{TouchEvent, TouchId, TouchPhase};

/// Touch id reserved for the emulated mouse finger.
pub const MOUSE_TOUCH_ID: TouchId = u64::MAX;

/// Tracks keyboard and pointer state between frames.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,
    /// Keys pressed at least once since the last frame, even if already released
    pub keyboard_pressed_since_frame: HashSet<KeyCode>,
    cursor_position: (f64, f64),
    mouse_down: bool,
}

impl InputManager {
    /// Creates an input manager with every tracked key released.
    pub fn new() -> Self {
        let tracked = HOTBAR_KEYS
            .into_iter()
            .chain(FULLSCREEN_KEYS)
            .chain([JUMP_KEY]);

        let keyboard_inputs_old: HashMap<KeyCode, bool> = tracked.map(|key| (key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            keyboard_pressed_since_frame: HashSet::new(),
            cursor_position: (0.0, 0.0),
            mouse_down: false,
        }
    }

    /// Updates the old state with the current state to prepare for the next frame.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event, updating key state.
    ///
    /// Returns the touch event the window event stands for, if any.
    pub fn intake_input(&mut self, event: &WindowEvent, at: Instant) -> Option<TouchEvent> {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                self.record_key(*key, *state == ElementState::Pressed);
                None
            }
            WindowEvent::Touch(touch) => Some(convert_touch(touch, at)),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
                self.mouse_down
                    .then(|| TouchEvent::new(MOUSE_TOUCH_ID, TouchPhase::Moved, self.cursor_position, at))
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let pressed = *state == ElementState::Pressed;
                if pressed == self.mouse_down {
                    return None;
                }
                self.mouse_down = pressed;
                let phase = if pressed {
                    TouchPhase::Started
                } else {
                    TouchPhase::Ended
                };
                Some(TouchEvent::new(MOUSE_TOUCH_ID, phase, self.cursor_position, at))
            }
            _ => None,
        }
    }

    /// Sets the current state of a tracked key. Untracked keys are ignored.
    pub fn record_key(&mut self, key: KeyCode, pressed: bool) {
        let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) else {
            return;
        };
        *key_state = pressed;
        if pressed {
            self.keyboard_pressed_since_frame.insert(key);
        }
    }

    /// Creates a processed input state from the current raw boolean states.
    ///
    /// A key that went down and back up within one frame still reads as pressed.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                let tapped = !old_state && self.keyboard_pressed_since_frame.contains(key);
                (*key, RawInputState::from_raw_states(old_state, new_state || tapped))
            })
            .collect();

        ProcessedInputState { keyboard_states }
    }

    /// Returns the processed input state and advances to the next frame.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.move_old_states();
        self.keyboard_pressed_since_frame.clear();
        processed_input
    }

    /// Releases everything, typically when the window loses focus.
    ///
    /// Returns a cancellation for the emulated mouse finger if it was down.
    pub fn reset_inputs(&mut self, at: Instant) -> Option<TouchEvent> {
        self.keyboard_inputs_new.values_mut().for_each(|state| *state = false);
        self.keyboard_pressed_since_frame.clear();
        self.move_old_states();

        let was_down = std::mem::replace(&mut self.mouse_down, false);
        was_down.then(|| TouchEvent::new(MOUSE_TOUCH_ID, TouchPhase::Cancelled, self.cursor_position, at))
    }
}

fn convert_touch(touch: &Touch, at: Instant) -> TouchEvent {
    let phase = match touch.phase {
        winit::event::TouchPhase::Started => TouchPhase::Started,
        winit::event::TouchPhase::Moved => TouchPhase::Moved,
        winit::event::TouchPhase::Ended => TouchPhase::Ended,
        winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
    };
    TouchEvent::new(touch.id, phase, (touch.location.x, touch.location.y), at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{dpi::PhysicalPosition, event::DeviceId};

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn left_button(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn mouse_drag_becomes_one_finger() {
        let mut input = InputManager::new();
        let now = Instant::now();

        assert!(input.intake_input(&cursor_moved(10.0, 20.0), now).is_none());

        let start = input
            .intake_input(&left_button(ElementState::Pressed), now)
            .unwrap();
        assert_eq!(start.id, MOUSE_TOUCH_ID);
        assert_eq!(start.phase, TouchPhase::Started);
        assert_eq!(start.position, (10.0, 20.0));

        let moved = input.intake_input(&cursor_moved(30.0, 40.0), now).unwrap();
        assert_eq!(moved.phase, TouchPhase::Moved);
        assert_eq!(moved.position, (30.0, 40.0));

        let end = input
            .intake_input(&left_button(ElementState::Released), now)
            .unwrap();
        assert_eq!(end.phase, TouchPhase::Ended);
        assert!(input.intake_input(&cursor_moved(50.0, 50.0), now).is_none());
    }

    #[test]
    fn focus_loss_cancels_the_mouse_finger() {
        let mut input = InputManager::new();
        let now = Instant::now();
        input.intake_input(&left_button(ElementState::Pressed), now);

        let cancel = input.reset_inputs(now).unwrap();
        assert_eq!(cancel.phase, TouchPhase::Cancelled);
        assert!(input.reset_inputs(now).is_none());
    }

    #[test]
    fn key_edges_advance_per_frame() {
        let mut input = InputManager::new();
        input.keyboard_inputs_new.insert(KeyCode::Space, true);

        let first = input.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::Space), RawInputState::Pressed);

        let second = input.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::Space), RawInputState::Held);
    }

    #[test]
    fn tap_between_frames_still_reads_as_pressed() {
        let mut input = InputManager::new();
        input.record_key(KeyCode::Space, true);
        input.record_key(KeyCode::Space, false);

        let frame = input.get_and_reset_processed_input();
        assert_eq!(frame.get_key_state(KeyCode::Space), RawInputState::Pressed);
        assert_eq!(frame.get_key_state(KeyCode::Digit1), RawInputState::NotPressed);

        let next = input.get_and_reset_processed_input();
        assert_eq!(next.get_key_state(KeyCode::Space), RawInputState::NotPressed);
    }

    #[test]
    fn held_key_is_not_pressed_again_by_the_latch() {
        let mut input = InputManager::new();
        input.record_key(KeyCode::Space, true);
        input.get_and_reset_processed_input();

        input.record_key(KeyCode::Space, false);
        let released = input.get_and_reset_processed_input();
        assert_eq!(released.get_key_state(KeyCode::Space), RawInputState::Released);
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input = InputManager::new();
        input.record_key(KeyCode::KeyQ, true);
        assert!(!input.keyboard_inputs_new.contains_key(&KeyCode::KeyQ));
        assert!(input.keyboard_pressed_since_frame.is_empty());
    }
}
