//! # Simulation
//!
//! The owned context for one sandbox session. Input callbacks write into it
//! through [`Simulation::handle_touch`] and [`Simulation::handle_ui`]; the frame
//! loop calls [`Simulation::tick`] once per rendered frame, which is the only
//! place the player and the world are mutated.
//!
//! ## Tick Order
//! 1. Drain the gesture classifier (orientation, move vector, edit intents)
//! 2. Apply a pending jump, then integrate the player
//! 3. Apply every edit intent against the fresh camera, oldest first
//! 4. Refresh the highlight target
//!
//! Intents recorded before a tick are therefore applied in that tick, and the
//! highlight never observes a half-applied edit.

use cgmath::Point3;
use log::{debug, trace, warn};

use crate::config::SandboxConfig;

use super::{
    camera_state::{PlayerController, PlayerState},
    editing::{haptics::Haptics, hotbar::Hotbar, EditOutcome, RaycastEditor},
    gestures::{
        touch::{TouchEvent, TouchPhase},
        GestureClassifier,
    },
    hud::Hud,
    rendering::snapshot::{BlockInstance, FrameSnapshot},
    voxels::{block::Material, world::World},
};

/// Discrete events published by the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A hotbar slot was chosen.
    MaterialSelected(usize),
    JumpPressed,
    /// Handled by the host window; the simulation only sees the resulting resize.
    FullscreenToggled,
}

pub struct Simulation {
    gestures: GestureClassifier,
    controller: PlayerController,
    world: World,
    editor: RaycastEditor,
    hotbar: Hotbar,
    hud: Hud,
    haptics: Box<dyn Haptics>,
    jump_requested: bool,
    highlight: Option<Point3<i32>>,
}

impl Simulation {
    /// Builds a fresh session for a viewport of `width` x `height` pixels.
    pub fn new(config: &SandboxConfig, width: f64, height: f64, haptics: Box<dyn Haptics>) -> Self {
        let materials = config.hotbar_materials().unwrap_or_else(|err| {
            warn!("{err}; offering every material");
            Material::all().to_vec()
        });
        let hotbar = Hotbar::new(materials);
        let gestures = GestureClassifier::new(config, width, height);
        let hud = Hud::new(gestures.layout(), hotbar.slots().len());

        Self {
            gestures,
            controller: PlayerController::new(config.player.clone()),
            world: World::new(config.world.ground_half_extent),
            editor: RaycastEditor::new(&config.editor),
            hotbar,
            hud,
            haptics,
            jump_requested: false,
            highlight: None,
        }
    }

    pub fn player(&self) -> &PlayerState {
        self.controller.state()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hotbar(&self) -> &Hotbar {
        &self.hotbar
    }

    pub fn highlight(&self) -> Option<Point3<i32>> {
        self.highlight
    }

    /// Routes a touch to the HUD buttons or the gesture classifier.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        if event.phase == TouchPhase::Started {
            if let Some(ui_event) = self.hud.hit_test(event.position) {
                trace!("Touch {} pressed {:?}", event.id, ui_event);
                self.handle_ui(ui_event);
                return;
            }
        }
        self.gestures.handle_touch(event);
    }

    pub fn handle_ui(&mut self, event: UiEvent) {
        match event {
            UiEvent::MaterialSelected(index) => {
                if self.hotbar.select(index) {
                    debug!("Selected {}", self.hotbar.selected().descriptor().label);
                } else {
                    trace!("Hotbar slot {index} does not exist");
                }
            }
            UiEvent::JumpPressed => self.jump_requested = true,
            UiEvent::FullscreenToggled => {}
        }
    }

    /// Recomputes screen regions after a viewport resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.gestures.resize(width, height);
        self.hud.resize(self.gestures.layout());
    }

    /// Runs one simulation step.
    ///
    /// # Returns
    /// The outcome of every edit applied in this tick, oldest first
    pub fn tick(&mut self) -> Vec<EditOutcome> {
        let input = self.gestures.drain();

        if std::mem::take(&mut self.jump_requested) && !self.controller.jump() {
            trace!("Jump ignored while airborne");
        }
        self.controller.tick(input.orientation, input.move_vector);

        let camera = self.controller.camera();
        let material = self.hotbar.selected();
        let mut outcomes = Vec::with_capacity(input.edits.len());
        for intent in input.edits {
            outcomes.push(self.editor.apply(
                intent,
                &mut self.world,
                &camera,
                material,
                self.haptics.as_ref(),
            ));
        }

        self.highlight = self.editor.highlight(&self.world, &camera);
        outcomes
    }

    /// Read-only view of the current frame for the renderer.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            camera: self.controller.camera(),
            blocks: self
                .world
                .blocks()
                .map(|(_, block)| BlockInstance {
                    position: block.position,
                    material: block.material,
                })
                .collect(),
            ground: *self.world.ground(),
            highlight: self.highlight,
            hud: self.hud.quads(self.hotbar.slots(), self.hotbar.selected_index()),
            viewport: self.hud.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use web_time::Instant;

    use super::*;
    use crate::engine_state::editing::haptics::RecordingHaptics;

    const LOOK_POINT: (f64, f64) = (600.0, 300.0);

    fn simulation() -> (Simulation, RecordingHaptics) {
        let haptics = RecordingHaptics::default();
        let simulation = Simulation::new(
            &SandboxConfig::default(),
            800.0,
            600.0,
            Box::new(haptics.clone()),
        );
        (simulation, haptics)
    }

    fn touch(sim: &mut Simulation, id: u64, phase: TouchPhase, position: (f64, f64), at: Instant) {
        sim.handle_touch(&TouchEvent::new(id, phase, position, at));
    }

    /// Drags the look finger down until the camera looks at its feet.
    fn look_down(sim: &mut Simulation, base: Instant) {
        touch(sim, 1, TouchPhase::Started, (600.0, 100.0), base);
        touch(sim, 1, TouchPhase::Moved, (600.0, 500.0), base + Duration::from_millis(50));
        touch(sim, 1, TouchPhase::Ended, (600.0, 500.0), base + Duration::from_millis(60));
    }

    fn tap(sim: &mut Simulation, id: u64, base: Instant, held: Duration) {
        touch(sim, id, TouchPhase::Started, LOOK_POINT, base);
        touch(sim, id, TouchPhase::Ended, LOOK_POINT, base + held);
    }

    #[test]
    fn tap_places_in_front_of_the_feet() {
        let (mut sim, haptics) = simulation();
        let base = Instant::now();
        look_down(&mut sim, base);
        assert!(sim.tick().is_empty());
        assert_eq!(sim.player().orientation.pitch, -1.5);

        tap(&mut sim, 2, base + Duration::from_secs(1), Duration::from_millis(200));
        let outcomes = sim.tick();

        assert_eq!(outcomes.len(), 1);
        let EditOutcome::Placed { position, material, .. } = outcomes[0] else {
            panic!("expected a placement, got {:?}", outcomes[0]);
        };
        assert_eq!(position, Point3::new(0, 1, 5));
        assert_eq!(material, Material::Wood);
        assert_eq!(haptics.pulses(), vec![Duration::from_millis(15)]);
        assert_eq!(sim.highlight(), Some(Point3::new(0, 1, 5)));
    }

    #[test]
    fn hold_breaks_the_highlighted_block() {
        let (mut sim, haptics) = simulation();
        let base = Instant::now();
        look_down(&mut sim, base);
        tap(&mut sim, 2, base + Duration::from_secs(1), Duration::from_millis(100));
        sim.tick();

        tap(&mut sim, 3, base + Duration::from_secs(2), Duration::from_millis(600));
        let outcomes = sim.tick();

        assert!(matches!(outcomes[..], [EditOutcome::Removed { .. }]));
        assert_eq!(sim.world().block_count(), 0);
        assert_eq!(sim.highlight(), None);
        assert_eq!(
            haptics.pulses(),
            vec![Duration::from_millis(15), Duration::from_millis(40)]
        );
    }

    #[test]
    fn intents_between_ticks_all_apply_in_order() {
        let (mut sim, _) = simulation();
        let base = Instant::now();
        look_down(&mut sim, base);
        tap(&mut sim, 2, base + Duration::from_secs(1), Duration::from_millis(100));
        tap(&mut sim, 3, base + Duration::from_secs(2), Duration::from_millis(100));

        let outcomes = sim.tick();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_applied());
        assert!(outcomes[1].is_applied());
        assert_eq!(sim.world().block_count(), 2);
        assert!(sim.tick().is_empty());
    }

    #[test]
    fn jump_button_lifts_the_player_once() {
        let (mut sim, _) = simulation();
        let jump = (750.0, 540.0);
        let base = Instant::now();

        touch(&mut sim, 5, TouchPhase::Started, jump, base);
        touch(&mut sim, 5, TouchPhase::Ended, jump, base + Duration::from_millis(50));
        sim.tick();
        assert!(!sim.player().is_grounded());
        let velocity = sim.player().velocity_y;
        assert!((velocity - (0.3 - 0.015)).abs() < 1e-6);

        // The button press must not double as a tap on the look region.
        assert_eq!(sim.world().block_count(), 0);

        sim.handle_ui(UiEvent::JumpPressed);
        sim.tick();
        assert!((sim.player().velocity_y - (velocity - 0.015)).abs() < 1e-6);
    }

    #[test]
    fn hotbar_selection_is_read_at_place_time() {
        let (mut sim, _) = simulation();
        let base = Instant::now();
        look_down(&mut sim, base);

        // Second hotbar slot of the default row.
        touch(&mut sim, 4, TouchPhase::Started, (400.0, 465.0), base);
        assert_eq!(sim.hotbar().selected(), Material::Stone);

        tap(&mut sim, 2, base + Duration::from_secs(1), Duration::from_millis(100));
        sim.handle_ui(UiEvent::MaterialSelected(2));
        let outcomes = sim.tick();

        assert!(matches!(
            outcomes[..],
            [EditOutcome::Placed { material: Material::Grass, .. }]
        ));

        sim.handle_ui(UiEvent::MaterialSelected(0));
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.blocks[0].material, Material::Grass);
    }

    #[test]
    fn snapshot_reflects_the_world() {
        let (mut sim, _) = simulation();
        let base = Instant::now();
        look_down(&mut sim, base);
        tap(&mut sim, 2, base + Duration::from_secs(1), Duration::from_millis(100));
        sim.tick();

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.blocks.len(), 1);
        assert_eq!(snapshot.blocks[0].position, Point3::new(0, 1, 5));
        assert_eq!(snapshot.highlight, Some(Point3::new(0, 1, 5)));
        assert_eq!(snapshot.camera.position, Point3::new(0.0, 2.0, 5.0));
        assert!(!snapshot.ground.is_editable());
        assert_eq!(snapshot.viewport, (800.0, 600.0));
    }

    #[test]
    fn resize_moves_the_buttons() {
        let (mut sim, _) = simulation();
        sim.resize(1024.0, 768.0);
        let base = Instant::now();

        touch(&mut sim, 5, TouchPhase::Started, (974.0, 708.0), base);
        sim.tick();
        assert!(!sim.player().is_grounded());
    }
}
