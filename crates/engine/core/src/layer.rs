//! Collision layers and layer masks
//!
//! A scene entity lives on exactly one of 32 layers. Queries filter by a
//! [`LayerMask`] with one bit per layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of 32 collision layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

impl Layer {
    /// Number of available layers
    pub const COUNT: u8 = 32;

    /// Layer every entity starts on
    pub const DEFAULT: Layer = Layer(0);
    /// Entities on this layer are skipped by raycasts using the default masks
    pub const IGNORE_RAYCAST: Layer = Layer(2);

    /// Create a layer, returning `None` for indices >= 32
    pub const fn new(index: u8) -> Option<Layer> {
        if index < Self::COUNT {
            Some(Layer(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Mask containing only this layer
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::DEFAULT
    }
}

impl TryFrom<u8> for Layer {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Layer::new(value).ok_or_else(|| format!("layer index {} out of range 0..32", value))
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> u8 {
        layer.0
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.0)
    }
}

/// Bit set of layers used to filter spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    pub const fn with(self, layer: Layer) -> LayerMask {
        LayerMask(self.0 | (1 << layer.0))
    }

    pub const fn without(self, layer: Layer) -> LayerMask {
        LayerMask(self.0 & !(1 << layer.0))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

impl FromIterator<Layer> for LayerMask {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        iter.into_iter().fold(LayerMask::NONE, LayerMask::with)
    }
}
