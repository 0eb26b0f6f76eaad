//! Interaction configuration
//!
//! Loaded from TOML. Every section is optional and falls back to the
//! defaults below:
//!
//! ```toml
//! [hand]
//! use_collision_radius = 0.1
//! use_collision_offset = [0.0, 0.0, 0.0]
//!
//! [bindings.tracked]
//! use = "GrabPinch"
//! grab = "GrabGrip"
//!
//! [bindings.flatscreen]
//! use = [{ mouse = "left" }]
//! grab = [{ mouse = "right" }]
//!
//! [flatscreen]
//! default_reach = 3.0
//! viewport = [1280.0, 720.0]
//!
//! [layers]
//! grabbable = 8
//! grabbed = 9
//! ```

use crate::error::{Error, Result};
use crate::kind::InteractionKind;
use devices::{DesktopButton, MouseButton};
use glam::{Vec2, Vec3};
use grasp_core::{Layer, LayerMask};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level interaction configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub hand: HandConfig,
    pub bindings: BindingsConfig,
    pub flatscreen: FlatscreenConfig,
    pub layers: GrabLayers,
}

impl InteractionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that deserialize fine but cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        let radius = self.hand.use_collision_radius;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "hand.use_collision_radius must be positive, got {}",
                radius
            )));
        }
        if !self.hand.use_collision_offset.is_finite() {
            return Err(Error::InvalidConfig(
                "hand.use_collision_offset must be finite".to_string(),
            ));
        }

        let reach = self.flatscreen.default_reach;
        if !(reach.is_finite() && reach > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "flatscreen.default_reach must be positive, got {}",
                reach
            )));
        }
        let viewport = self.flatscreen.viewport;
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "flatscreen.viewport must be positive, got {}x{}",
                viewport.x, viewport.y
            )));
        }

        if self.layers.grabbable == self.layers.grabbed {
            return Err(Error::InvalidConfig(format!(
                "layers.grabbable and layers.grabbed must differ (both {})",
                self.layers.grabbed
            )));
        }
        Ok(())
    }
}

/// Proximity query tunables shared by every hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Radius of the overlap sphere, also the drift distance that releases
    /// a held interactable
    pub use_collision_radius: f32,
    /// Centre of the overlap sphere relative to the hand
    pub use_collision_offset: Vec3,
    /// Layers considered by the overlap query
    pub use_layer_mask: LayerMask,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            use_collision_radius: 0.1,
            use_collision_offset: Vec3::ZERO,
            use_layer_mask: LayerMask::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    pub tracked: TrackedBindings,
    pub flatscreen: DesktopBindings,
}

/// Tracked-controller action bound to each interaction kind.
///
/// A missing or empty action disables input for that kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedBindings {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grab: Option<String>,
}

impl Default for TrackedBindings {
    fn default() -> Self {
        Self {
            use_action: Some("GrabPinch".to_string()),
            grab: Some("GrabGrip".to_string()),
        }
    }
}

impl TrackedBindings {
    pub fn action(&self, kind: InteractionKind) -> Option<&str> {
        let action = match kind {
            InteractionKind::Use => &self.use_action,
            InteractionKind::Grab => &self.grab,
        };
        action.as_deref().filter(|a| !a.is_empty())
    }
}

/// Desktop buttons bound to each interaction kind in flatscreen mode.
///
/// Any listed button triggers the kind; an empty list disables it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopBindings {
    #[serde(rename = "use", default)]
    pub use_buttons: Vec<DesktopButton>,
    #[serde(default)]
    pub grab: Vec<DesktopButton>,
}

impl Default for DesktopBindings {
    fn default() -> Self {
        Self {
            use_buttons: vec![DesktopButton::Mouse(MouseButton::Left)],
            grab: vec![DesktopButton::Mouse(MouseButton::Right)],
        }
    }
}

impl DesktopBindings {
    pub fn buttons(&self, kind: InteractionKind) -> &[DesktopButton] {
        match kind {
            InteractionKind::Use => &self.use_buttons,
            InteractionKind::Grab => &self.grab,
        }
    }
}

/// Cursor-ray hand settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatscreenConfig {
    /// Maximum raycast distance while nothing overrides it
    pub default_reach: f32,
    /// Layers the cursor ray can hit; `layers.grabbed` is excluded on top
    pub raycast_layer_mask: LayerMask,
    /// Viewport size in pixels
    pub viewport: Vec2,
    /// Initial camera position; the camera looks down -Z
    pub camera_position: Vec3,
}

impl Default for FlatscreenConfig {
    fn default() -> Self {
        Self {
            default_reach: 3.0,
            raycast_layer_mask: LayerMask::ALL
                .without(GrabLayers::default().grabbed)
                .without(Layer::IGNORE_RAYCAST),
            viewport: Vec2::new(1280.0, 720.0),
            camera_position: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}

/// Layers a grabbable switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabLayers {
    /// Layer of grabbables at rest
    pub grabbable: Layer,
    /// Layer of grabbables held by a hand
    pub grabbed: Layer,
}

impl Default for GrabLayers {
    fn default() -> Self {
        Self {
            grabbable: Layer::new(8).unwrap_or_default(),
            grabbed: Layer::new(9).unwrap_or_default(),
        }
    }
}
