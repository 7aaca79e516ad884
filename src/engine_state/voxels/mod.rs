//! # Voxel World
//!
//! This module contains the world-side data of the sandbox: the block entity,
//! the registry that owns every block plus the ground, and ray hit-testing
//! against both.
//!
//! ## Architecture
//!
//! * **Block**: grid-aligned unit cubes and the closed material table
//! * **World**: the registry, with occupancy per grid cell
//! * **Raycast**: ray/box and ray/plane intersection

pub mod block;
pub mod raycast;
pub mod world;
