//! Haptic feedback collaborator.
//!
//! Pulses are fire-and-forget: implementations must return immediately and
//! report nothing back to the caller.

use std::time::Duration;

/// Accepts short vibration pulses from the editor.
pub trait Haptics {
    fn pulse(&self, duration: Duration);
}

/// Fallback for platforms without a vibration motor; logs the pulse.
#[derive(Debug, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&self, duration: Duration) {
        log::debug!("Haptic pulse {}ms", duration.as_millis());
    }
}

/// Vibration through the browser's `navigator.vibrate`.
#[cfg(target_family = "wasm")]
#[derive(Debug, Default)]
pub struct VibrationHaptics;

#[cfg(target_family = "wasm")]
impl Haptics for VibrationHaptics {
    fn pulse(&self, duration: Duration) {
        let Some(window) = web_sys::window() else {
            return;
        };
        // Browsers without a vibration motor simply return false.
        let _ = window
            .navigator()
            .vibrate_with_duration(duration.as_millis() as u32);
    }
}

/// The haptics implementation for the current platform.
pub fn platform_haptics() -> Box<dyn Haptics> {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "wasm")] {
            Box::new(VibrationHaptics)
        } else {
            Box::new(LogHaptics)
        }
    }
}

/// Test double that records every pulse.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingHaptics {
    pulses: std::rc::Rc<std::cell::RefCell<Vec<Duration>>>,
}

#[cfg(test)]
impl RecordingHaptics {
    pub fn pulses(&self) -> Vec<Duration> {
        self.pulses.borrow().clone()
    }
}

#[cfg(test)]
impl Haptics for RecordingHaptics {
    fn pulse(&self, duration: Duration) {
        self.pulses.borrow_mut().push(duration);
    }
}
