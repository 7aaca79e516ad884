//! # Block Side Module
//!
//! This module defines the six faces of a unit block and their outward normals.
//! The raycaster reports which face a ray entered through so the editor can
//! offset new blocks away from it.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(&self) -> Vector3<f32> {
        match self {
            BlockSide::FRONT => Vector3::new(0.0, 0.0, 1.0),
            BlockSide::BACK => Vector3::new(0.0, 0.0, -1.0),
            BlockSide::BOTTOM => Vector3::new(0.0, -1.0, 0.0),
            BlockSide::TOP => Vector3::new(0.0, 1.0, 0.0),
            BlockSide::LEFT => Vector3::new(-1.0, 0.0, 0.0),
            BlockSide::RIGHT => Vector3::new(1.0, 0.0, 0.0),
        }
    }

    /// The face a ray enters through when it crosses the slab of `axis`
    /// (0 = X, 1 = Y, 2 = Z) travelling with the given direction component.
    ///
    /// # Arguments
    /// * `axis` - Index of the slab axis
    /// * `direction` - Ray direction component along that axis
    pub fn entered_through(axis: usize, direction: f32) -> BlockSide {
        let positive_travel = direction > 0.0;
        match (axis, positive_travel) {
            (0, true) => BlockSide::LEFT,
            (0, false) => BlockSide::RIGHT,
            (1, true) => BlockSide::BOTTOM,
            (1, false) => BlockSide::TOP,
            (_, true) => BlockSide::BACK,
            (_, false) => BlockSide::FRONT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn normals_are_unit_and_distinct() {
        let sides = BlockSide::all();
        for (i, a) in sides.iter().enumerate() {
            assert!((a.normal().magnitude() - 1.0).abs() < 1e-6);
            for b in &sides[i + 1..] {
                assert_ne!(a.normal(), b.normal());
            }
        }
    }

    #[test]
    fn entered_face_opposes_travel() {
        for axis in 0..3 {
            for direction in [-1.0f32, 1.0] {
                let normal = BlockSide::entered_through(axis, direction).normal();
                assert!(normal[axis] * direction < 0.0);
            }
        }
    }
}
