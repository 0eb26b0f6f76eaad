//! Physics crate - spatial queries for the interaction core
//!
//! Colliders are attached to scene entities and follow their world pose.
//! The crate answers the two questions hands ask every tick:
//!
//! - which colliders overlap a sphere (proximity detection)
//! - what does a ray hit first (flatscreen cursor placement)
//!
//! # Example
//!
//! ```rust
//! use grasp_core::{LayerMask, Scene, Transform};
//! use grasp_physics::{Collider, CollisionWorld, Shape, SpatialQuery};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let ball = scene.spawn("ball", Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)));
//!
//! let mut world = CollisionWorld::new();
//! world.insert(Collider::new(ball, Shape::Sphere { radius: 0.5 }));
//! world.sync(&scene);
//!
//! let mut hits = Vec::new();
//! world.overlap_sphere(Vec3::new(0.0, 0.0, -1.0), 0.6, LayerMask::ALL, 8, &mut hits);
//! assert_eq!(hits.len(), 1);
//! ```

mod collider;
mod query;
mod world;

pub use collider::{Collider, ColliderHandle, Shape};
pub use query::{OverlapHit, RaycastHit, SpatialQuery};
pub use world::CollisionWorld;

// Re-export for convenience
pub use glam;
