//! Interaction kinds and per-kind storage

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Category of interaction, tracked independently per hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Simple use (trigger, button press)
    Use,
    /// Grab and hold
    Grab,
}

impl InteractionKind {
    pub const COUNT: usize = 2;

    /// All kinds, in the order hands evaluate them each tick
    pub const ALL: [InteractionKind; Self::COUNT] = [InteractionKind::Use, InteractionKind::Grab];

    pub const fn index(self) -> usize {
        match self {
            Self::Use => 0,
            Self::Grab => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Use => "use",
            Self::Grab => "grab",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size storage with one value per [`InteractionKind`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerKind<T>([T; InteractionKind::COUNT]);

impl<T> PerKind<T> {
    pub fn new(use_value: T, grab_value: T) -> Self {
        Self([use_value, grab_value])
    }

    pub fn iter(&self) -> impl Iterator<Item = (InteractionKind, &T)> {
        InteractionKind::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<InteractionKind> for PerKind<T> {
    type Output = T;

    fn index(&self, kind: InteractionKind) -> &T {
        &self.0[kind.index()]
    }
}

impl<T> IndexMut<InteractionKind> for PerKind<T> {
    fn index_mut(&mut self, kind: InteractionKind) -> &mut T {
        &mut self.0[kind.index()]
    }
}
