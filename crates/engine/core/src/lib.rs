//! Core library for Grasp - engine-agnostic spatial types
//!
//! This crate contains the scene-side vocabulary shared by the input,
//! physics and interaction crates. It has no knowledge of hands or
//! interactables.
//!
//! # Modules
//!
//! - [`transform`]: Rigid transforms and the [`Object`] trait
//! - [`layer`]: Collision layers and layer masks
//! - [`scene`]: Entity hierarchy with layers and attachments
//! - [`camera`]: Camera and screen-to-world rays

pub mod camera;
pub mod layer;
pub mod scene;
pub mod transform;

pub use camera::{Camera, Ray, DEFAULT_VFOV};
pub use layer::{Layer, LayerMask};
pub use scene::{Attachment, EntityId, Scene};
pub use transform::{look_rotation, Object, Transform};

// Re-export glam for convenience
pub use glam;
