//! # Raycast Module
//!
//! Ray intersection against the two kinds of world geometry: axis-aligned
//! unit blocks (slab test) and the one-sided ground plane.

use cgmath::{InnerSpace, Point3, Vector3};

use super::block::block_side::BlockSide;

/// Directions with a component smaller than this are treated as parallel to that axis.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A 3D ray with origin and normalized direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a new ray, normalizing the direction.
    ///
    /// Returns `None` when the direction has no length.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let length = direction.magnitude();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / length,
        })
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Where a ray met a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Point3<f32>,
    /// Outward unit normal of the surface at `point`.
    pub normal: Vector3<f32>,
}

/// Intersects a ray with an axis-aligned box using the slab method.
///
/// Rays starting inside the box report no hit. Only hits with
/// `0 <= distance <= max_distance` are reported.
pub fn ray_aabb(
    ray: &Ray,
    min: Point3<f32>,
    max: Point3<f32>,
    max_distance: f32,
) -> Option<SurfaceHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() < PARALLEL_EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
        }
        t_exit = t_exit.min(t1);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || t_enter > max_distance {
        return None;
    }

    let side = BlockSide::entered_through(enter_axis, ray.direction[enter_axis]);
    Some(SurfaceHit {
        distance: t_enter,
        point: ray.at(t_enter),
        normal: side.normal(),
    })
}

/// Intersects a ray with the square ground plane `y = height`, centered on
/// the origin with the given half extent.
///
/// The plane faces +Y and is one-sided: rays travelling upwards or starting
/// below it never hit.
pub fn ray_ground(ray: &Ray, height: f32, half_extent: f32, max_distance: f32) -> Option<SurfaceHit> {
    if ray.direction.y > -PARALLEL_EPSILON || ray.origin.y < height {
        return None;
    }

    let t = (height - ray.origin.y) / ray.direction.y;
    if t < 0.0 || t > max_distance {
        return None;
    }

    let point = ray.at(t);
    if point.x.abs() > half_extent || point.z.abs() > half_extent {
        return None;
    }

    Some(SurfaceHit {
        distance: t,
        point: Point3::new(point.x, height, point.z),
        normal: Vector3::unit_y(),
    })
}
