//! Desktop input for the flatscreen fallback
//!
//! Tracks the cursor position and the state of mouse buttons and keys.
//! Key codes are kept to the small platform-independent set the fallback
//! bindings use; platform backends map their native codes onto it.

use crate::button::ButtonState;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Left mouse button (primary)
    Left,
    /// Right mouse button (secondary/context)
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
}

/// Platform-independent key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    E,
    F,
    Q,
    R,
    Space,
    Enter,
    ShiftLeft,
    ControlLeft,
    AltLeft,
}

/// A single desktop input that can be bound to an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesktopButton {
    Mouse(MouseButton),
    Key(Key),
}

/// Cursor and button state of the desktop input devices
#[derive(Debug, Clone, Default)]
pub struct DesktopInput {
    /// Cursor position in viewport pixels, top-left origin
    pub cursor: Vec2,
    buttons: HashMap<DesktopButton, ButtonState>,
}

impl DesktopInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: clears the edge flags of every button
    pub fn update(&mut self) {
        for state in self.buttons.values_mut() {
            state.update();
        }
    }

    pub fn set_cursor(&mut self, cursor: Vec2) {
        self.cursor = cursor;
    }

    pub fn press(&mut self, button: DesktopButton) {
        self.buttons.entry(button).or_default().press();
    }

    pub fn release(&mut self, button: DesktopButton) {
        self.buttons.entry(button).or_default().release();
    }

    pub fn state(&self, button: DesktopButton) -> ButtonState {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    /// Whether any of `buttons` went down this frame
    pub fn any_just_pressed(&self, buttons: &[DesktopButton]) -> bool {
        buttons.iter().any(|&b| self.state(b).just_pressed)
    }

    /// Whether any of `buttons` went up this frame
    pub fn any_just_released(&self, buttons: &[DesktopButton]) -> bool {
        buttons.iter().any(|&b| self.state(b).just_released)
    }

    /// Reset all buttons to released state
    pub fn clear(&mut self) {
        self.buttons.clear();
    }
}
