//! Camera and screen-to-world rays
//!
//! # Coordinate System
//!
//! Uses OpenGL convention:
//! - +X is right
//! - +Y is up
//! - -Z is forward (into the screen)
//!
//! Screen coordinates are in pixels with the origin at the top-left corner of
//! the viewport, matching window cursor events.

use crate::transform::{look_rotation, Object};
use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Default vertical field of view: 60 degrees
pub const DEFAULT_VFOV: f32 = 60.0 * std::f32::consts::PI / 180.0;

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit-length direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera used to turn cursor positions into rays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera rotation (orientation) as quaternion
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub vfov: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            vfov: DEFAULT_VFOV,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, viewport: Vec2) -> Self {
        Self {
            position,
            viewport,
            ..Self::default()
        }
    }

    /// Create camera with position looking at target
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, viewport: Vec2) -> Self {
        Self {
            position,
            rotation: look_rotation(target - position, up),
            vfov: DEFAULT_VFOV,
            viewport,
        }
    }

    /// Get the forward direction vector
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction vector
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction vector
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Ray from the camera through a screen point (pixels, top-left origin).
    ///
    /// The viewport center maps to the forward direction.
    pub fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        let size = self.viewport.max(Vec2::ONE);
        let ndc_x = 2.0 * screen.x / size.x - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / size.y;

        let tan_half_vfov = (self.vfov * 0.5).tan();
        let direction = self.forward()
            + self.right() * (ndc_x * tan_half_vfov * self.aspect())
            + self.up() * (ndc_y * tan_half_vfov);

        Ray::new(self.position, direction)
    }

    /// Screen point (pixels, top-left origin) a world point projects to.
    ///
    /// Returns `None` for points behind the camera.
    pub fn world_to_screen_point(&self, point: Vec3) -> Option<Vec2> {
        let local = self.rotation.inverse() * (point - self.position);
        let depth = -local.z;
        if depth <= f32::EPSILON {
            return None;
        }

        let tan_half_vfov = (self.vfov * 0.5).tan();
        let ndc_x = local.x / (depth * tan_half_vfov * self.aspect());
        let ndc_y = local.y / (depth * tan_half_vfov);

        let size = self.viewport.max(Vec2::ONE);
        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * size.x,
            (1.0 - ndc_y) * 0.5 * size.y,
        ))
    }

    /// Screen point in the middle of the viewport
    pub fn viewport_center(&self) -> Vec2 {
        self.viewport * 0.5
    }
}

impl Object for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}
