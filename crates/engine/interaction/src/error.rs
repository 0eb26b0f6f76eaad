//! Error types for the interaction crate
//!
//! Per-tick interaction never fails; these errors come from setup:
//! loading configuration and registering capabilities.

use crate::kind::InteractionKind;
use grasp_core::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for interaction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up interaction
#[derive(Debug, Error)]
pub enum Error {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has the wrong shape
    #[error("Invalid config syntax: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be written out
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Entity not found in the scene
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    /// Entity already exposes this interaction kind
    #[error("Entity {entity} already has a {kind} capability")]
    DuplicateCapability {
        entity: EntityId,
        kind: InteractionKind,
    },

    /// Reach override that would put the flatscreen hand at or behind the camera
    #[error("Reach override for {entity} must be positive and finite, got {reach}")]
    InvalidReach { entity: EntityId, reach: f32 },
}
