//! Input device abstractions for Grasp
//!
//! This crate provides the input signals the interaction core consumes:
//! edge-triggered button states, named tracked-controller actions per hand,
//! desktop mouse/keyboard input for the flatscreen fallback, and the XR
//! runtime backend trait.
//!
//! # Modules
//!
//! - [`button`]: Pressed / just-pressed / just-released button state
//! - [`action`]: Hands, poses and named tracked-controller actions
//! - [`desktop`]: Cursor, mouse buttons and keys
//! - [`backend`]: XR runtime backend trait and implementations

pub mod action;
pub mod backend;
pub mod button;
pub mod desktop;

// Re-export commonly used types at crate root
pub use action::{ActionSet, Handedness, Pose};
pub use backend::{NullBackend, ScriptedBackend, XrBackend, XrInitState};
pub use button::ButtonState;
pub use desktop::{DesktopButton, DesktopInput, Key, MouseButton};

/// Create the default XR backend.
///
/// No runtime integration is compiled in, so this is the [`NullBackend`],
/// which reports a failed runtime and leaves the flatscreen fallback active.
pub fn create_xr_backend() -> Box<dyn XrBackend> {
    Box::new(NullBackend::new())
}
