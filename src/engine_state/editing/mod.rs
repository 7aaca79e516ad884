//! # Raycast Editor
//!
//! Resolves what the reticle points at and applies block edits.
//!
//! The aim ray starts at the camera eye and runs along the camera forward
//! vector, i.e. through the screen center. Hits are resolved by
//! [`World::raycast`], which only knows world geometry, so helper geometry such
//! as the highlight outline can never be hit.
//!
//! ## Placement
//! A new block is centered at `hit.point + hit.normal * offset`, then every axis
//! is rounded half away from zero. A placement into an occupied cell is
//! rejected.

use std::time::Duration;

use cgmath::Point3;
use log::debug;

use crate::config::EditorConfig;

use super::{
    camera_state::camera::Camera,
    gestures::EditIntent,
    voxels::{
        block::{Block, BlockId, Material},
        raycast::{Ray, SurfaceHit},
        world::{HitTarget, World, WorldError, WorldHit},
    },
};

pub mod haptics;
pub mod hotbar;

use haptics::Haptics;

/// What an edit did to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    Placed {
        id: BlockId,
        position: Point3<i32>,
        material: Material,
    },
    Removed {
        id: BlockId,
        block: Block,
    },
    /// The ray hit nothing within reach.
    NoTarget,
    /// A break aimed at a non-editable surface.
    NotEditable,
    /// The resolved placement cell already holds a block.
    Rejected(WorldError),
}

impl EditOutcome {
    /// Whether the world changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Placed { .. } | EditOutcome::Removed { .. })
    }
}

/// Grid cell for a block placed against `hit`.
pub fn placement_cell(hit: &SurfaceHit, offset: f32) -> Point3<i32> {
    let center = hit.point + hit.normal * offset;
    Point3::new(
        center.x.round() as i32,
        center.y.round() as i32,
        center.z.round() as i32,
    )
}

#[derive(Debug, Clone)]
pub struct RaycastEditor {
    reach: f32,
    placement_offset: f32,
    place_pulse: Duration,
    break_pulse: Duration,
}

impl RaycastEditor {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            reach: config.reach,
            placement_offset: config.placement_offset,
            place_pulse: Duration::from_millis(config.place_pulse_ms),
            break_pulse: Duration::from_millis(config.break_pulse_ms),
        }
    }

    /// The nearest world surface under the reticle.
    pub fn aim(&self, world: &World, camera: &Camera) -> Option<WorldHit> {
        let ray = Ray::new(camera.position, camera.get_view_vec())?;
        world.raycast(&ray, self.reach)
    }

    /// The block the highlight should outline, if any.
    ///
    /// Read-only; the ground is never highlighted.
    pub fn highlight(&self, world: &World, camera: &Camera) -> Option<Point3<i32>> {
        match self.aim(world, camera)?.target {
            HitTarget::Block(id) => world.block(id).map(|block| block.position),
            HitTarget::Ground => None,
        }
    }

    /// Applies one edit intent.
    pub fn apply(
        &self,
        intent: EditIntent,
        world: &mut World,
        camera: &Camera,
        material: Material,
        haptics: &dyn Haptics,
    ) -> EditOutcome {
        let outcome = match intent {
            EditIntent::Place => self.place(world, camera, material, haptics),
            EditIntent::Break => self.break_block(world, camera, haptics),
        };
        debug!("{intent:?} -> {outcome:?}");
        outcome
    }

    /// Places a block against the aimed surface (block or ground).
    pub fn place(
        &self,
        world: &mut World,
        camera: &Camera,
        material: Material,
        haptics: &dyn Haptics,
    ) -> EditOutcome {
        let Some(hit) = self.aim(world, camera) else {
            return EditOutcome::NoTarget;
        };

        let position = placement_cell(&hit.surface, self.placement_offset);
        match world.insert(position, material) {
            Ok(id) => {
                haptics.pulse(self.place_pulse);
                EditOutcome::Placed {
                    id,
                    position,
                    material,
                }
            }
            Err(err) => EditOutcome::Rejected(err),
        }
    }

    /// Removes the aimed block. The ground is left untouched.
    pub fn break_block(&self, world: &mut World, camera: &Camera, haptics: &dyn Haptics) -> EditOutcome {
        let Some(hit) = self.aim(world, camera) else {
            return EditOutcome::NoTarget;
        };

        let HitTarget::Block(id) = hit.target else {
            return EditOutcome::NotEditable;
        };

        match world.remove(id) {
            Some(block) => {
                haptics.pulse(self.break_pulse);
                EditOutcome::Removed { id, block }
            }
            None => EditOutcome::NoTarget,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::camera_state::camera::Orientation;
    use haptics::RecordingHaptics;

    fn editor() -> RaycastEditor {
        RaycastEditor::new(&EditorConfig::default())
    }

    fn camera(position: (f32, f32, f32), yaw: f32, pitch: f32) -> Camera {
        Camera::new(Point3::new(position.0, position.1, position.2), Orientation { yaw, pitch })
    }

    fn looking_down() -> Camera {
        camera((0.0, 2.0, 5.0), 0.0, -1.5)
    }

    #[test]
    fn ground_hit_snaps_half_up_to_the_cell_above() {
        let hit = SurfaceHit {
            distance: 2.0,
            point: Point3::new(0.0, 0.0, 5.0),
            normal: Vector3::unit_y(),
        };
        assert_eq!(placement_cell(&hit, 0.5), Point3::new(0, 1, 5));
    }

    #[test]
    fn negative_half_coordinates_round_away_from_zero() {
        let hit = SurfaceHit {
            distance: 1.0,
            point: Point3::new(-1.0, 1.0, -0.5),
            normal: Vector3::new(0.0, 0.0, -1.0),
        };
        assert_eq!(placement_cell(&hit, 0.5), Point3::new(-1, 1, -1));
    }

    #[test]
    fn place_on_ground_below_the_camera() {
        let editor = editor();
        let mut world = World::new(100.0);
        let haptics = RecordingHaptics::default();

        let hit = editor.aim(&world, &looking_down()).unwrap();
        assert_eq!(hit.target, HitTarget::Ground);
        assert!(hit.surface.point.y.abs() < 1e-6);
        assert!((hit.surface.point.z - 5.0).abs() < 0.2);

        let outcome = editor.place(&mut world, &looking_down(), Material::Stone, &haptics);
        let EditOutcome::Placed { position, material, .. } = outcome else {
            panic!("expected a placement, got {outcome:?}");
        };
        assert_eq!(position, Point3::new(0, 1, 5));
        assert_eq!(material, Material::Stone);
        assert_eq!(haptics.pulses(), vec![Duration::from_millis(15)]);
    }

    #[test]
    fn repeated_place_stacks_along_the_normal() {
        let editor = editor();
        let mut world = World::new(100.0);
        let haptics = RecordingHaptics::default();
        let camera = camera((0.0, 6.0, 5.0), 0.0, -1.5);

        let first = editor.place(&mut world, &camera, Material::Wood, &haptics);
        let second = editor.place(&mut world, &camera, Material::Wood, &haptics);

        let (EditOutcome::Placed { position: a, .. }, EditOutcome::Placed { position: b, .. }) =
            (first, second)
        else {
            panic!("expected two placements: {first:?}, {second:?}");
        };
        assert_eq!(b - a, Vector3::new(0, 1, 0));
    }

    #[test]
    fn placement_into_occupied_cell_is_rejected() {
        let editor = editor();
        let mut world = World::new(100.0);
        let haptics = RecordingHaptics::default();
        // Standing inside the cell the ground placement resolves to.
        world.insert(Point3::new(0, 1, 5), Material::Dirt).unwrap();
        let camera = camera((0.0, 1.0, 5.0), 0.0, -1.5);

        let outcome = editor.place(&mut world, &camera, Material::Stone, &haptics);
        assert_eq!(
            outcome,
            EditOutcome::Rejected(WorldError::Occupied(Point3::new(0, 1, 5)))
        );
        assert_eq!(world.block_count(), 1);
        assert!(haptics.pulses().is_empty());
    }

    #[test]
    fn break_removes_the_aimed_block() {
        let editor = editor();
        let mut world = World::new(100.0);
        let haptics = RecordingHaptics::default();
        let id = world.insert(Point3::new(0, 2, -1), Material::Glass).unwrap();
        let camera = camera((0.0, 2.0, 5.0), 0.0, 0.0);

        assert_eq!(editor.highlight(&world, &camera), Some(Point3::new(0, 2, -1)));

        let outcome = editor.break_block(&mut world, &camera, &haptics);
        assert!(matches!(outcome, EditOutcome::Removed { id: removed, .. } if removed == id));
        assert_eq!(world.block_count(), 0);
        assert_eq!(haptics.pulses(), vec![Duration::from_millis(40)]);
        assert_eq!(editor.highlight(&world, &camera), None);
    }

    #[test]
    fn ground_survives_breaks_from_any_angle() {
        let editor = editor();
        let mut world = World::new(100.0);
        let haptics = RecordingHaptics::default();
        let id = world.insert(Point3::new(3, 1, 3), Material::Stone).unwrap();
        let mut removed = 0;
        let mut ground_aims = 0;

        for yaw_step in 0..16 {
            for pitch_step in 0..=10 {
                let yaw = yaw_step as f32 * std::f32::consts::TAU / 16.0;
                let pitch = -1.5 + pitch_step as f32 * 0.3;
                let camera = camera((0.0, 2.0, 0.0), yaw, pitch);
                let target = editor.aim(&world, &camera).map(|hit| hit.target);
                let outcome = editor.break_block(&mut world, &camera, &haptics);

                match target {
                    Some(HitTarget::Ground) => {
                        ground_aims += 1;
                        assert_eq!(outcome, EditOutcome::NotEditable);
                    }
                    Some(HitTarget::Block(aimed)) => {
                        assert_eq!(aimed, id);
                        assert!(matches!(outcome, EditOutcome::Removed { id: gone, .. } if gone == id));
                        removed += 1;
                    }
                    None => assert_eq!(outcome, EditOutcome::NoTarget),
                }
            }
        }
        assert!(removed <= 1);
        assert!(ground_aims > 0);
        assert!(!world.ground().is_editable());
        let down = camera((0.0, 2.0, 0.0), 0.0, -1.5);
        assert_eq!(editor.aim(&world, &down).map(|hit| hit.target), Some(HitTarget::Ground));
        assert_eq!(
            editor.break_block(&mut world, &down, &haptics),
            EditOutcome::NotEditable
        );
    }

    #[test]
    fn sky_hits_nothing() {
        let editor = editor();
        let mut world = World::new(100.0);
        let haptics = RecordingHaptics::default();
        let camera = camera((0.0, 2.0, 5.0), 0.0, 1.0);

        assert_eq!(editor.place(&mut world, &camera, Material::Wood, &haptics), EditOutcome::NoTarget);
        assert_eq!(editor.break_block(&mut world, &camera, &haptics), EditOutcome::NoTarget);
        assert!(haptics.pulses().is_empty());
    }

    #[test]
    fn level_gaze_ignores_the_ground() {
        let editor = editor();
        let world = World::new(100.0);
        assert!(editor.aim(&world, &camera((0.0, 2.0, 5.0), 0.0, 0.0)).is_none());
    }
}
