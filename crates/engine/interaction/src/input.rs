//! Edge-triggered input signals per interaction kind
//!
//! Kinds are mapped to device inputs through binding tables. A kind with no
//! binding never fires.

use crate::config::{DesktopBindings, TrackedBindings};
use crate::kind::{InteractionKind, PerKind};
use devices::{ActionSet, DesktopInput};

/// Source of "pressed" / "released" edges for each interaction kind
pub trait HandInput {
    /// The kind's input went down this tick
    fn pressed(&self, kind: InteractionKind) -> bool;

    /// The kind's input went up this tick
    fn released(&self, kind: InteractionKind) -> bool;
}

/// Tracked-controller actions of one hand
#[derive(Debug, Clone, Copy)]
pub struct TrackedInput<'a> {
    /// `None` while the controller is unavailable
    pub actions: Option<&'a ActionSet>,
    pub bindings: &'a TrackedBindings,
}

impl<'a> TrackedInput<'a> {
    pub fn new(actions: Option<&'a ActionSet>, bindings: &'a TrackedBindings) -> Self {
        Self { actions, bindings }
    }
}

impl HandInput for TrackedInput<'_> {
    fn pressed(&self, kind: InteractionKind) -> bool {
        match (self.actions, self.bindings.action(kind)) {
            (Some(actions), Some(action)) => actions.is_just_pressed(action),
            _ => false,
        }
    }

    fn released(&self, kind: InteractionKind) -> bool {
        match (self.actions, self.bindings.action(kind)) {
            (Some(actions), Some(action)) => actions.is_just_released(action),
            _ => false,
        }
    }
}

/// Tracked actions or desktop buttons, whichever fires
#[derive(Debug, Clone, Copy)]
pub struct FlatscreenInput<'a> {
    pub tracked: TrackedInput<'a>,
    pub desktop: &'a DesktopInput,
    pub bindings: &'a DesktopBindings,
}

impl<'a> FlatscreenInput<'a> {
    pub fn new(
        tracked: TrackedInput<'a>,
        desktop: &'a DesktopInput,
        bindings: &'a DesktopBindings,
    ) -> Self {
        Self {
            tracked,
            desktop,
            bindings,
        }
    }
}

impl HandInput for FlatscreenInput<'_> {
    fn pressed(&self, kind: InteractionKind) -> bool {
        self.tracked.pressed(kind) || self.desktop.any_just_pressed(self.bindings.buttons(kind))
    }

    fn released(&self, kind: InteractionKind) -> bool {
        self.tracked.released(kind) || self.desktop.any_just_released(self.bindings.buttons(kind))
    }
}

/// Explicit edges for one tick, for hosts that resolve input themselves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalFrame {
    pub pressed: PerKind<bool>,
    pub released: PerKind<bool>,
}

impl SignalFrame {
    /// No edges at all
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn press(kind: InteractionKind) -> Self {
        let mut frame = Self::default();
        frame.pressed[kind] = true;
        frame
    }

    pub fn release(kind: InteractionKind) -> Self {
        let mut frame = Self::default();
        frame.released[kind] = true;
        frame
    }
}

impl HandInput for SignalFrame {
    fn pressed(&self, kind: InteractionKind) -> bool {
        self.pressed[kind]
    }

    fn released(&self, kind: InteractionKind) -> bool {
        self.released[kind]
    }
}
