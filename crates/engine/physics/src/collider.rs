//! Collider shapes and their intersection tests
//!
//! All tests take the collider's world pose and work in the collider's local
//! space, so rotated boxes need no special handling.

use grasp_core::{EntityId, Ray, Transform};
use glam::Vec3;

/// Stable handle to a collider in a [`CollisionWorld`](crate::CollisionWorld)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(pub(crate) u32);

impl ColliderHandle {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Collision shape in collider-local space, centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl Shape {
    /// Axis-aligned cube with the given edge length
    pub fn cube(size: f32) -> Self {
        Shape::Cuboid {
            half_extents: Vec3::splat(size * 0.5),
        }
    }

    /// Whether the shape at `pose` touches the sphere (`center`, `radius`).
    /// Touching surfaces count as overlapping.
    pub fn intersects_sphere(&self, pose: &Transform, center: Vec3, radius: f32) -> bool {
        match *self {
            Shape::Sphere { radius: own } => {
                pose.translation.distance_squared(center) <= (own + radius) * (own + radius)
            }
            Shape::Cuboid { half_extents } => {
                let local = pose.inverse().transform_point(center);
                let closest = local.clamp(-half_extents, half_extents);
                local.distance_squared(closest) <= radius * radius
            }
        }
    }

    /// First entry point of `ray` into the shape at `pose`, within
    /// `max_distance`. Returns distance and world-space surface normal.
    ///
    /// Rays starting inside the shape do not hit it.
    pub fn cast_ray(&self, pose: &Transform, ray: &Ray, max_distance: f32) -> Option<(f32, Vec3)> {
        let (distance, normal) = match *self {
            Shape::Sphere { radius } => {
                let oc = ray.origin - pose.translation;
                let b = oc.dot(ray.direction);
                let c = oc.length_squared() - radius * radius;
                if c <= 0.0 {
                    return None;
                }
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                let t = -b - discriminant.sqrt();
                if t < 0.0 {
                    return None;
                }
                let normal = (ray.at(t) - pose.translation).normalize_or_zero();
                (t, normal)
            }
            Shape::Cuboid { half_extents } => {
                let inverse = pose.inverse();
                let origin = inverse.transform_point(ray.origin);
                let direction = inverse.transform_vector(ray.direction);
                let (t, local_normal) = slab_entry(origin, direction, half_extents)?;
                (t, pose.transform_vector(local_normal))
            }
        };

        (distance <= max_distance).then_some((distance, normal))
    }
}

/// Slab test against an origin-centred box. Returns entry distance and the
/// local normal of the entry face.
fn slab_entry(origin: Vec3, direction: Vec3, half: Vec3) -> Option<(f32, Vec3)> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half[axis];

        if d.abs() < 1e-8 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }

        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        if near > t_min {
            t_min = near;
            normal = Vec3::ZERO;
            normal[axis] = -d.signum();
        }
        t_max = t_max.min(far);

        if t_min > t_max {
            return None;
        }
    }

    // Behind the ray, or starting inside
    if t_max < 0.0 || t_min < 0.0 {
        return None;
    }
    Some((t_min, normal))
}

/// A shape attached to a scene entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Entity whose world pose the collider follows
    pub entity: EntityId,
    pub shape: Shape,
    /// Pose relative to the entity
    pub offset: Transform,
}

impl Collider {
    pub fn new(entity: EntityId, shape: Shape) -> Self {
        Self {
            entity,
            shape,
            offset: Transform::IDENTITY,
        }
    }

    pub fn with_offset(mut self, offset: Transform) -> Self {
        self.offset = offset;
        self
    }
}
