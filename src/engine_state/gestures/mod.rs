//! # Touch Gesture Classifier
//!
//! This module turns a raw multi-touch stream into the inputs of one
//! simulation tick:
//! - a look orientation, updated incrementally while a look finger drags
//! - a move vector from the virtual joystick
//! - discrete edit intents (place/break) from taps and holds
//!
//! ## Look Sessions
//! A touch starting in the look region opens a session. At most one session
//! is open at a time; further fingers in the look region are ignored until the
//! tracked finger lifts. A session that never moved beyond the jitter
//! threshold and ended before the timeout emits one intent: `Place` if it was
//! at most the hold threshold long, `Break` otherwise.
//!
//! ## Producer / Consumer
//! Touch callbacks only write into the classifier. The simulation tick calls
//! [`GestureClassifier::drain`] exactly once, taking every queued intent.

use std::time::Duration;

use log::trace;
use web_time::Instant;

use crate::config::SandboxConfig;

use super::camera_state::camera::Orientation;
use joystick::Joystick;
use touch::{ScreenLayout, TouchEvent, TouchId, TouchPhase};

pub mod joystick;
pub mod touch;

/// A discrete edit requested by a tap or a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditIntent {
    Place,
    Break,
}

/// Gesture outputs consumed by one simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub orientation: Orientation,
    pub move_vector: (f32, f32),
    /// Intents recorded since the previous drain, oldest first
    pub edits: Vec<EditIntent>,
}

/// The lifecycle of one tracked look finger.
#[derive(Debug, Clone, Copy)]
pub struct LookSession {
    pub id: TouchId,
    pub start_position: (f64, f64),
    pub last_position: (f64, f64),
    pub started_at: Instant,
    pub has_moved: bool,
}

impl LookSession {
    fn open(event: &TouchEvent) -> Self {
        Self {
            id: event.id,
            start_position: event.position,
            last_position: event.position,
            started_at: event.at,
            has_moved: false,
        }
    }
}

/// Interprets touches into orientation, movement and edit intents.
pub struct GestureClassifier {
    sensitivity: f32,
    jitter_threshold: f64,
    hold_threshold: Duration,
    session_timeout: Duration,
    pitch_limit: f32,
    joystick_margin: f64,
    layout: ScreenLayout,
    joystick: Joystick,
    session: Option<LookSession>,
    orientation: Orientation,
    pending_edits: Vec<EditIntent>,
}

impl GestureClassifier {
    /// Creates a classifier for a viewport of the given size.
    pub fn new(config: &SandboxConfig, width: f64, height: f64) -> Self {
        Self {
            sensitivity: config.look.sensitivity,
            jitter_threshold: config.look.jitter_threshold_px as f64,
            hold_threshold: Duration::from_millis(config.look.hold_threshold_ms),
            session_timeout: Duration::from_millis(config.look.session_timeout_ms),
            pitch_limit: config.player.pitch_limit,
            joystick_margin: config.joystick.margin_px,
            layout: ScreenLayout::new(width, height, &config.look, &config.joystick),
            joystick: Joystick::new(config.joystick.clamp_to_unit),
            session: None,
            orientation: Orientation::default(),
            pending_edits: Vec::new(),
        }
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn session(&self) -> Option<&LookSession> {
        self.session.as_ref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Updates the screen partition after a viewport resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.layout.resize(width, height, self.joystick_margin);
    }

    /// Processes one touch point update. Unknown or stale ids are ignored.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        match event.phase {
            TouchPhase::Started => self.touch_started(event),
            TouchPhase::Moved => self.touch_moved(event),
            TouchPhase::Ended => self.touch_ended(event, true),
            TouchPhase::Cancelled => self.touch_ended(event, false),
        }
    }

    /// Takes this tick's inputs. Edit intents are handed out exactly once.
    pub fn drain(&mut self) -> FrameInput {
        FrameInput {
            orientation: self.orientation,
            move_vector: self.joystick.move_vector(),
            edits: std::mem::take(&mut self.pending_edits),
        }
    }

    fn touch_started(&mut self, event: &TouchEvent) {
        if self.layout.is_in_joystick(event.position) {
            let layout = &self.layout;
            if !self.joystick.begin(
                event.id,
                event.position,
                layout.joystick_center,
                layout.joystick_radius,
            ) {
                trace!("Touch {} ignored: joystick already held", event.id);
            }
            return;
        }

        if !self.layout.is_look_region(event.position) {
            trace!("Touch {} ignored: outside look region", event.id);
            return;
        }

        if let Some(session) = &self.session {
            trace!(
                "Touch {} ignored: look session {} still open",
                event.id,
                session.id
            );
            return;
        }

        self.session = Some(LookSession::open(event));
    }

    fn touch_moved(&mut self, event: &TouchEvent) {
        if self.joystick.tracks(event.id) {
            self.joystick.update(
                event.id,
                event.position,
                self.layout.joystick_center,
                self.layout.joystick_radius,
            );
            return;
        }
        self.track_look(event);
    }

    fn touch_ended(&mut self, event: &TouchEvent, completed: bool) {
        if self.joystick.tracks(event.id) {
            self.joystick.end(event.id);
            return;
        }

        if !self.track_look(event) {
            trace!("Touch {} end ignored: no matching session", event.id);
            return;
        }

        let Some(session) = self.session.take() else {
            return;
        };
        if !completed {
            return;
        }

        if let Some(intent) = self.classify(&session, event.at) {
            self.pending_edits.push(intent);
        }
    }

    /// Applies the drag from the session's last position to `event`.
    ///
    /// # Returns
    /// `false` if `event` does not belong to the open session
    fn track_look(&mut self, event: &TouchEvent) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.id == event.id) else {
            return false;
        };

        let (x, y) = event.position;
        let dx = x - session.last_position.0;
        let dy = y - session.last_position.1;
        let from_start = (x - session.start_position.0).hypot(y - session.start_position.1);

        if dx.hypot(dy) > self.jitter_threshold || from_start > self.jitter_threshold {
            session.has_moved = true;
        }

        self.orientation
            .apply_drag(dx as f32, dy as f32, self.sensitivity, self.pitch_limit);
        session.last_position = event.position;
        true
    }

    fn classify(&self, session: &LookSession, ended_at: Instant) -> Option<EditIntent> {
        if session.has_moved {
            return None;
        }

        let duration = ended_at.saturating_duration_since(session.started_at);
        if duration >= self.session_timeout {
            return None;
        }

        if duration <= self.hold_threshold {
            Some(EditIntent::Place)
        } else {
            Some(EditIntent::Break)
        }
    }
}
