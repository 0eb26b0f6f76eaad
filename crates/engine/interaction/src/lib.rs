//! Interaction crate - hand interaction core for Grasp
//!
//! This crate decides, every tick, which nearby object each hand starts or
//! stops using or grabbing, and runs the object side of those transitions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Session                             │
//! ├─────────────────────────────────────────────────────────┤
//! │  Player                                                  │
//! │  ├── Waits for the XR runtime to settle                 │
//! │  ├── Tracked mode: left + right Hand                    │
//! │  └── Flatscreen mode: FlatscreenHand (cursor ray)       │
//! ├─────────────────────────────────────────────────────────┤
//! │  Hand (per interaction kind: Use, Grab)                 │
//! │  ├── Edge-triggered input signals                       │
//! │  ├── Sphere overlap → nearest capable entity            │
//! │  └── Held slot → Use / Unuse dispatch                   │
//! ├─────────────────────────────────────────────────────────┤
//! │  Interactables                                          │
//! │  ├── Usable - emits Used / Unused                       │
//! │  └── Grabbable - attach, layer swap, reach override     │
//! ├─────────────────────────────────────────────────────────┤
//! │  InteractionWorld                                       │
//! │  ├── Scene (hierarchy, layers, attachments)             │
//! │  ├── CollisionWorld (overlap + raycast)                 │
//! │  └── EventBus (listeners + drainable log)               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use devices::{DesktopInput, Handedness, Pose, ScriptedBackend};
//! use glam::Vec3;
//! use grasp_core::Transform;
//! use grasp_physics::Shape;
//! use interaction::{InteractionConfig, InteractionEvent, Session};
//!
//! let mut session = Session::new(InteractionConfig::default()).unwrap();
//!
//! let cup = session.world.scene.spawn("cup", Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)));
//! session.world.add_collider(cup, Shape::Sphere { radius: 0.05 }).unwrap();
//! session.world.add_grabbable(cup, None).unwrap();
//!
//! let mut backend = ScriptedBackend::ready();
//! backend.set_pose(Handedness::Right, Pose::at(Vec3::new(0.0, 1.0, 0.02)));
//! backend.queue_press(Handedness::Right, "GrabGrip");
//!
//! session.tick(&mut backend, &DesktopInput::new());
//!
//! let events = session.world.events.drain();
//! assert!(matches!(events[0], InteractionEvent::Grabbed { entity, .. } if entity == cup));
//! ```

mod config;
mod error;
mod events;
mod flatscreen;
mod grabbable;
mod hand;
mod input;
mod interactable;
mod kind;
mod player;
mod usable;
mod world;

pub use config::{
    BindingsConfig, DesktopBindings, FlatscreenConfig, GrabLayers, HandConfig, InteractionConfig,
    TrackedBindings,
};
pub use error::{Error, Result};
pub use events::{EventBus, InteractionEvent, ListenerId};
pub use flatscreen::{FlatscreenHand, RaycastReach};
pub use grabbable::Grabbable;
pub use hand::{Hand, MAX_OVERLAPPING_COLLIDERS};
pub use input::{FlatscreenInput, HandInput, SignalFrame, TrackedInput};
pub use interactable::{HandRef, Interactable, Interactables, InteractionContext};
pub use kind::{InteractionKind, PerKind};
pub use player::{Player, PlayerMode};
pub use usable::Usable;
pub use world::{InteractionWorld, Session};

// Re-export glam for convenience
pub use glam;
