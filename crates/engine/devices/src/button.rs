//! Edge-triggered button state
//!
//! Shared by tracked-controller actions, mouse buttons and keys.

/// State of a single digital input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held
    pub pressed: bool,
    /// Whether the button went down this frame
    pub just_pressed: bool,
    /// Whether the button went up this frame
    pub just_released: bool,
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: clears the edge flags, keeps the held state
    pub fn update(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }

    /// Record a press event
    pub fn press(&mut self) {
        if !self.pressed {
            self.just_pressed = true;
        }
        self.pressed = true;
    }

    /// Record a release event
    pub fn release(&mut self) {
        if self.pressed {
            self.just_released = true;
        }
        self.pressed = false;
    }

    /// Feed a polled level; edges are derived from the previous level
    pub fn set(&mut self, down: bool) {
        if down {
            self.press();
        } else {
            self.release();
        }
    }
}
