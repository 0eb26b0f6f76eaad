//! Hands, poses and named tracked-controller actions
//!
//! Tracked controllers expose boolean actions by name (for example a pinch
//! or grip action). Which action drives which interaction is decided by the
//! binding tables in the interaction crate, not here.

use crate::button::ButtonState;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which hand a controller is held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const BOTH: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracked pose in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Named boolean actions of one controller
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    actions: HashMap<String, ButtonState>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame for every action
    pub fn update(&mut self) {
        for state in self.actions.values_mut() {
            state.update();
        }
    }

    pub fn press(&mut self, action: &str) {
        self.actions.entry(action.to_string()).or_default().press();
    }

    pub fn release(&mut self, action: &str) {
        self.actions.entry(action.to_string()).or_default().release();
    }

    /// State of an action; unknown actions read as idle
    pub fn state(&self, action: &str) -> ButtonState {
        self.actions.get(action).copied().unwrap_or_default()
    }

    pub fn is_pressed(&self, action: &str) -> bool {
        self.state(action).pressed
    }

    pub fn is_just_pressed(&self, action: &str) -> bool {
        self.state(action).just_pressed
    }

    pub fn is_just_released(&self, action: &str) -> bool {
        self.state(action).just_released
    }

    /// Release everything, e.g. when a controller disconnects
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
