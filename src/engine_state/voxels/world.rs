//! # World Module
//!
//! This module provides the `World` registry, the sole owner of every placed
//! block and of the permanent ground plane.
//!
//! ## Identity
//!
//! Blocks are addressed by [`BlockId`]. A second index from grid cell to id
//! enforces that a cell holds at most one block. Other systems only hold ids
//! or hits for the duration of a single edit.
//!
//! ## Hit Testing
//!
//! [`World::raycast`] tests every block and the ground and returns the nearest
//! surface. Equal distances resolve to the surface tested first: blocks in
//! placement order, then the ground.

use std::collections::{BTreeMap, HashMap};

use cgmath::Point3;
use thiserror::Error;

use super::{
    block::{Block, BlockId, Material},
    raycast::{ray_aabb, ray_ground, Ray, SurfaceHit},
};

/// Errors raised by world mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("cell ({}, {}, {}) is already occupied", .0.x, .0.y, .0.z)]
    Occupied(Point3<i32>),
}

/// The static base plane. It is never stored among the blocks and reports
/// itself as non-editable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    /// Height of the plane.
    pub height: f32,
    /// Half the side length of the square plane, centered on the origin.
    pub half_extent: f32,
}

impl Ground {
    pub fn is_editable(&self) -> bool {
        false
    }
}

/// The entity a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Block(BlockId),
    Ground,
}

impl HitTarget {
    /// Whether edits may remove this target.
    pub fn is_editable(&self) -> bool {
        matches!(self, HitTarget::Block(_))
    }
}

/// The nearest surface along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    pub target: HitTarget,
    pub surface: SurfaceHit,
}

/// The voxel world registry.
///
/// # Examples
///
/// ```ignore
/// let mut world = World::new(100.0);
/// let id = world.insert(Point3::new(0, 1, 0), Material::Stone)?;
/// assert!(world.block(id).is_some());
/// world.remove(id);
/// ```
pub struct World {
    blocks: BTreeMap<BlockId, Block>,
    cells: HashMap<Point3<i32>, BlockId>,
    ground: Ground,
    next_id: u64,
}

impl World {
    /// Creates an empty world with a ground plane at `y = 0`.
    pub fn new(ground_half_extent: f32) -> Self {
        World {
            blocks: BTreeMap::new(),
            cells: HashMap::new(),
            ground: Ground {
                height: 0.0,
                half_extent: ground_half_extent,
            },
            next_id: 0,
        }
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    /// Places a block in an empty cell.
    ///
    /// # Errors
    /// Returns [`WorldError::Occupied`] if the cell already holds a block;
    /// the world is left unchanged.
    pub fn insert(&mut self, position: Point3<i32>, material: Material) -> Result<BlockId, WorldError> {
        if self.cells.contains_key(&position) {
            return Err(WorldError::Occupied(position));
        }

        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.cells.insert(position, id);
        self.blocks.insert(id, Block::new(position, material));
        Ok(id)
    }

    /// Removes a block, returning it if it existed.
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let block = self.blocks.remove(&id)?;
        self.cells.remove(&block.position);
        Some(block)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn block_at(&self, position: Point3<i32>) -> Option<BlockId> {
        self.cells.get(&position).copied()
    }

    /// Iterates blocks in placement order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().map(|(id, block)| (*id, block))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Finds the nearest block or ground surface along `ray` within `max_distance`.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<WorldHit> {
        let mut nearest: Option<WorldHit> = None;
        let mut consider = |target: HitTarget, surface: SurfaceHit| {
            let closer = nearest
                .map(|hit| surface.distance < hit.surface.distance)
                .unwrap_or(true);
            if closer {
                nearest = Some(WorldHit { target, surface });
            }
        };

        for (id, block) in self.blocks() {
            let (min, max) = block.bounds();
            if let Some(surface) = ray_aabb(ray, min, max, max_distance) {
                consider(HitTarget::Block(id), surface);
            }
        }

        if let Some(surface) = ray_ground(ray, self.ground.height, self.ground.half_extent, max_distance) {
            consider(HitTarget::Ground, surface);
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;

    #[test]
    fn insert_rejects_occupied_cell() {
        let mut world = World::new(100.0);
        let cell = Point3::new(1, 1, 1);
        let first = world.insert(cell, Material::Wood).unwrap();

        assert_eq!(world.insert(cell, Material::Stone), Err(WorldError::Occupied(cell)));
        assert_eq!(world.block_count(), 1);
        assert_eq!(world.block(first).unwrap().material, Material::Wood);
    }

    #[test]
    fn remove_frees_the_cell() {
        let mut world = World::new(100.0);
        let cell = Point3::new(0, 1, 0);
        let id = world.insert(cell, Material::Dirt).unwrap();

        assert_eq!(world.remove(id).map(|b| b.position), Some(cell));
        assert!(world.remove(id).is_none());
        assert!(world.block_at(cell).is_none());
        assert!(world.insert(cell, Material::Glass).is_ok());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut world = World::new(100.0);
        let a = world.insert(Point3::new(0, 1, 0), Material::Wood).unwrap();
        world.remove(a);
        let b = world.insert(Point3::new(0, 1, 0), Material::Wood).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn raycast_prefers_nearest_block_over_ground() {
        let mut world = World::new(100.0);
        let near = world.insert(Point3::new(0, 1, 0), Material::Stone).unwrap();
        world.insert(Point3::new(0, 1, -3), Material::Stone).unwrap();

        let ray = Ray::new(Point3::new(0.0, 1.0, 5.0), Vector3::new(0.0, -0.05, -1.0)).unwrap();
        let hit = world.raycast(&ray, 1000.0).unwrap();
        assert_eq!(hit.target, HitTarget::Block(near));
    }

    #[test]
    fn raycast_falls_through_to_ground() {
        let world = World::new(100.0);
        let ray = Ray::new(Point3::new(3.0, 2.0, 3.0), Vector3::new(0.0, -1.0, 0.0)).unwrap();
        let hit = world.raycast(&ray, 1000.0).unwrap();
        assert_eq!(hit.target, HitTarget::Ground);
        assert!(!hit.target.is_editable());
        assert!(!world.ground().is_editable());
    }

    #[test]
    fn raycast_into_the_sky_has_no_hit() {
        let world = World::new(100.0);
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(world.raycast(&ray, 1000.0).is_none());
    }
}
