//! Ray primitives for picking
//!
//! A [`Ray`] is cast from the camera; [`RayHit`] records which scene node it
//! struck and how far away.

use crate::foundation::math::Vec3;
use crate::scene::NodeId;

/// A ray in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test against a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The node whose bounds were hit
    pub node: NodeId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
}
