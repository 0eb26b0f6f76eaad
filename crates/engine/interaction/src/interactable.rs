//! Interactable capability and its registry

use crate::error::{Error, Result};
use crate::events::EventBus;
use crate::flatscreen::RaycastReach;
use crate::kind::InteractionKind;
use grasp_core::{EntityId, Scene};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// The hand driving an interaction
#[derive(Debug)]
pub struct HandRef<'a> {
    pub entity: EntityId,
    /// Raycast reach of a flatscreen hand, `None` for tracked hands
    pub reach: Option<&'a mut RaycastReach>,
}

impl<'a> HandRef<'a> {
    pub fn tracked(entity: EntityId) -> Self {
        Self {
            entity,
            reach: None,
        }
    }

    pub fn flatscreen(entity: EntityId, reach: &'a mut RaycastReach) -> Self {
        Self {
            entity,
            reach: Some(reach),
        }
    }

    pub fn is_flatscreen(&self) -> bool {
        self.reach.is_some()
    }
}

/// Everything an interactable may touch during a transition
#[derive(Debug)]
pub struct InteractionContext<'a> {
    /// Entity owning the capability
    pub entity: EntityId,
    pub hand: HandRef<'a>,
    pub scene: &'a mut Scene,
    pub events: &'a mut EventBus,
}

/// Use/Unuse capability attached to an entity for one interaction kind
pub trait Interactable: fmt::Debug {
    fn kind(&self) -> InteractionKind;

    /// A hand started interacting with the entity
    fn on_use(&mut self, ctx: &mut InteractionContext<'_>);

    /// A hand stopped interacting with the entity
    fn on_unuse(&mut self, ctx: &mut InteractionContext<'_>);

    fn as_any(&self) -> &dyn Any;
}

/// Capabilities by entity and kind. An entity has at most one per kind.
#[derive(Debug, Default)]
pub struct Interactables {
    entries: HashMap<(EntityId, InteractionKind), Box<dyn Interactable>>,
}

impl Interactables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under its own kind
    pub fn insert(&mut self, entity: EntityId, interactable: Box<dyn Interactable>) -> Result<()> {
        let kind = interactable.kind();
        if self.entries.contains_key(&(entity, kind)) {
            return Err(Error::DuplicateCapability { entity, kind });
        }
        self.entries.insert((entity, kind), interactable);
        Ok(())
    }

    pub fn contains(&self, entity: EntityId, kind: InteractionKind) -> bool {
        self.entries.contains_key(&(entity, kind))
    }

    pub fn get(&self, entity: EntityId, kind: InteractionKind) -> Option<&dyn Interactable> {
        self.entries.get(&(entity, kind)).map(|b| b.as_ref())
    }

    pub fn get_mut(
        &mut self,
        entity: EntityId,
        kind: InteractionKind,
    ) -> Option<&mut Box<dyn Interactable>> {
        self.entries.get_mut(&(entity, kind))
    }

    /// Downcast a capability to its concrete type
    pub fn get_as<T: Interactable + 'static>(
        &self,
        entity: EntityId,
        kind: InteractionKind,
    ) -> Option<&T> {
        self.get(entity, kind)?.as_any().downcast_ref::<T>()
    }

    /// Drop every capability of `entity`. Returns how many were removed.
    pub fn remove_entity(&mut self, entity: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(e, _), _| *e != entity);
        before - self.entries.len()
    }

    /// Nearest entity in the ancestor chain of `entity` (itself first)
    /// exposing `kind`
    pub fn owner(&self, scene: &Scene, entity: EntityId, kind: InteractionKind) -> Option<EntityId> {
        scene.ancestors(entity).find(|&e| self.contains(e, kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
