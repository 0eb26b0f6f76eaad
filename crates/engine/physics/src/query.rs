//! Spatial query trait and result types

use crate::collider::ColliderHandle;
use grasp_core::{EntityId, LayerMask, Ray};
use glam::Vec3;

/// A collider found by an overlap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub collider: ColliderHandle,
    /// Entity the collider is attached to
    pub entity: EntityId,
    /// World position of the collider's origin
    pub position: Vec3,
}

/// Result of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    pub entity: EntityId,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Queries the interaction core runs against the collision world
///
/// This trait lets hands query colliders without depending on a specific
/// collision implementation.
pub trait SpatialQuery {
    /// Collect colliders on layers in `mask` that touch the sphere.
    ///
    /// `out` is cleared and receives at most `max_results` hits, in the
    /// implementation's stable iteration order. Returns the number of hits
    /// written; a return value equal to `max_results` means results may have
    /// been truncated.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
        max_results: usize,
        out: &mut Vec<OverlapHit>,
    ) -> usize;

    /// Nearest hit along `ray` within `max_distance` on layers in `mask`
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RaycastHit>;
}
