//! # Block Module
//!
//! This module provides the block entity stored by the world registry:
//! a grid-aligned unit cube with a material.

use cgmath::{Point3, Vector3};

pub use material::Material;

pub mod block_side;
pub mod material;

/// Half the side length of a block.
pub const BLOCK_HALF_EXTENT: f32 = 0.5;

/// Identity of a placed block, unique for the lifetime of a world.
///
/// Ids are handed out in increasing order, so sorting by id gives placement order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u64);

/// A placed unit cube.
///
/// The block is centered on its integer `position`, covering
/// `position ± BLOCK_HALF_EXTENT` on every axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Grid cell the block is centered on.
    pub position: Point3<i32>,
    /// The material the block was placed with.
    pub material: Material,
}

impl Block {
    /// Creates a new block at the given cell.
    pub fn new(position: Point3<i32>, material: Material) -> Self {
        Block { position, material }
    }

    /// World-space center of the block.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
        )
    }

    /// Returns the (min, max) corners of the block's bounding box.
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let half = Vector3::new(BLOCK_HALF_EXTENT, BLOCK_HALF_EXTENT, BLOCK_HALF_EXTENT);
        let center = self.center();
        (center - half, center + half)
    }
}
