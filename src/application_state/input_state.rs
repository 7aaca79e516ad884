//! # Input State
//!
//! Edge-detected keyboard state and its translation into UI events.

use std::collections::HashMap;

use winit::keyboard::KeyCode;

use crate::engine_state::simulation::UiEvent;

/// Number keys mapped to hotbar slots, in slot order.
pub const HOTBAR_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub const JUMP_KEY: KeyCode = KeyCode::Space;

pub const FULLSCREEN_KEYS: [KeyCode; 2] = [KeyCode::KeyF, KeyCode::F11];

/// Represents the state of a key or button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A snapshot of the processed key states with state transitions.
#[derive(Debug, Default)]
pub struct ProcessedInputState {
    pub keyboard_states: HashMap<KeyCode, RawInputState>,
}

impl ProcessedInputState {
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// UI events for keys pressed this frame. Held keys do not repeat.
    pub fn ui_events(&self) -> Vec<UiEvent> {
        let mut events = Vec::new();

        if self.get_key_state(JUMP_KEY).is_just_pressed() {
            events.push(UiEvent::JumpPressed);
        }
        if let Some(slot) = HOTBAR_KEYS
            .iter()
            .position(|key| self.get_key_state(*key).is_just_pressed())
        {
            events.push(UiEvent::MaterialSelected(slot));
        }
        if FULLSCREEN_KEYS
            .iter()
            .any(|key| self.get_key_state(*key).is_just_pressed())
        {
            events.push(UiEvent::FullscreenToggled);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(keys: &[(KeyCode, RawInputState)]) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect(),
        }
    }

    #[test]
    fn transitions_follow_previous_and_current() {
        assert_eq!(RawInputState::from_raw_states(false, true), RawInputState::Pressed);
        assert_eq!(RawInputState::from_raw_states(true, true), RawInputState::Held);
        assert_eq!(RawInputState::from_raw_states(true, false), RawInputState::Released);
        assert_eq!(RawInputState::from_raw_states(false, false), RawInputState::NotPressed);
    }

    #[test]
    fn pressed_keys_become_ui_events() {
        let input = with(&[
            (KeyCode::Space, RawInputState::Pressed),
            (KeyCode::Digit3, RawInputState::Pressed),
            (KeyCode::F11, RawInputState::Pressed),
        ]);
        assert_eq!(
            input.ui_events(),
            vec![
                UiEvent::JumpPressed,
                UiEvent::MaterialSelected(2),
                UiEvent::FullscreenToggled
            ]
        );
    }

    #[test]
    fn held_keys_do_not_repeat() {
        let input = with(&[
            (KeyCode::Space, RawInputState::Held),
            (KeyCode::Digit1, RawInputState::Held),
        ]);
        assert!(input.ui_events().is_empty());
    }
}
