//! Rigid transforms and the Object trait
//!
//! Uses OpenGL convention throughout: +X right, +Y up, -Z forward.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Base trait for any object with position and rotation in 3D space.
///
/// Implemented by:
/// - [`Transform`] in this module
/// - [`Camera`](crate::Camera)
pub trait Object {
    /// Get the current position
    fn position(&self) -> Vec3;

    /// Get the current rotation as a quaternion
    fn rotation(&self) -> Quat;

    /// Set the position
    fn set_position(&mut self, position: Vec3);

    /// Set the rotation
    fn set_rotation(&mut self, rotation: Quat);
}

/// Translation + rotation, no scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Compose `self` (parent) with `local` (child), yielding the child's pose
    /// in the parent's space.
    pub fn mul_transform(&self, local: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(local.translation),
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// Inverse transform, such that `t.inverse().mul_transform(&t)` is identity
    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        Transform {
            translation: rotation * -self.translation,
            rotation,
        }
    }

    /// Transform a point from local space into this transform's space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }

    /// Rotate a direction vector
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Forward direction (-Z) of this transform
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl Object for Transform {
    fn position(&self) -> Vec3 {
        self.translation
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

/// Rotation whose forward (-Z) axis points along `direction`.
///
/// Degenerate inputs fall back gracefully: a zero direction yields identity,
/// a direction parallel to `up` picks an arbitrary perpendicular right axis.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Quat {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let right = forward.cross(up);
    let right = if right.length_squared() < 1e-12 {
        forward.any_orthonormal_vector()
    } else {
        right.normalize()
    };
    let cam_up = right.cross(forward);

    // In local space: right=+X, up=+Y, forward=-Z
    Quat::from_mat3(&Mat3::from_cols(right, cam_up, -forward))
}
