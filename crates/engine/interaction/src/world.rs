//! Interaction world and per-tick session driver

use crate::config::{GrabLayers, InteractionConfig};
use crate::error::{Error, Result};
use crate::events::EventBus;
use crate::grabbable::Grabbable;
use crate::interactable::{HandRef, Interactable, Interactables, InteractionContext};
use crate::kind::InteractionKind;
use crate::player::Player;
use crate::usable::Usable;
use devices::{DesktopInput, XrBackend};
use grasp_core::{EntityId, Scene};
use grasp_physics::{Collider, ColliderHandle, CollisionWorld, Shape};
use tracing::{debug, trace};

/// Scene, colliders and capabilities the hands interact with
#[derive(Debug, Default)]
pub struct InteractionWorld {
    pub scene: Scene,
    pub colliders: CollisionWorld,
    pub interactables: Interactables,
    pub events: EventBus,
    layers: GrabLayers,
}

impl InteractionWorld {
    pub fn new(layers: GrabLayers) -> Self {
        Self {
            layers,
            ..Self::default()
        }
    }

    pub fn layers(&self) -> GrabLayers {
        self.layers
    }

    fn ensure_entity(&self, entity: EntityId) -> Result<()> {
        if self.scene.contains(entity) {
            Ok(())
        } else {
            Err(Error::UnknownEntity(entity))
        }
    }

    /// Attach a collider to `entity`. It takes part in queries after the next
    /// [`refresh`](Self::refresh).
    pub fn add_collider(&mut self, entity: EntityId, shape: Shape) -> Result<ColliderHandle> {
        self.add_collider_with(Collider::new(entity, shape))
    }

    pub fn add_collider_with(&mut self, collider: Collider) -> Result<ColliderHandle> {
        self.ensure_entity(collider.entity)?;
        Ok(self.colliders.insert(collider))
    }

    /// Register any capability for `entity`
    pub fn add_interactable(
        &mut self,
        entity: EntityId,
        interactable: Box<dyn Interactable>,
    ) -> Result<()> {
        self.ensure_entity(entity)?;
        self.interactables.insert(entity, interactable)
    }

    pub fn add_usable(&mut self, entity: EntityId) -> Result<()> {
        self.add_interactable(entity, Box::new(Usable::new()))
    }

    /// Make `entity` grabbable and move it and its descendants to the
    /// grabbable layer
    pub fn add_grabbable(&mut self, entity: EntityId, reach_override: Option<f32>) -> Result<()> {
        let mut grabbable = Grabbable::new(self.layers);
        if let Some(reach) = reach_override {
            if !(reach.is_finite() && reach > 0.0) {
                return Err(Error::InvalidReach { entity, reach });
            }
            grabbable = grabbable.with_reach_override(reach);
        }
        self.add_interactable(entity, Box::new(grabbable))?;
        self.scene.set_layer_recursive(entity, self.layers.grabbable);
        Ok(())
    }

    pub fn grabbable(&self, entity: EntityId) -> Option<&Grabbable> {
        self.interactables.get_as(entity, InteractionKind::Grab)
    }

    pub fn usable(&self, entity: EntityId) -> Option<&Usable> {
        self.interactables.get_as(entity, InteractionKind::Use)
    }

    /// Remove an entity with its descendants, their colliders and
    /// capabilities. Returns the removed entities.
    pub fn despawn(&mut self, entity: EntityId) -> Vec<EntityId> {
        let removed = self.scene.despawn(entity);
        let mut colliders = 0;
        for &id in &removed {
            colliders += self.colliders.remove_entity(id);
            self.interactables.remove_entity(id);
        }
        debug!("Despawned {} entities and {} colliders", removed.len(), colliders);
        removed
    }

    /// Recompute world poses (attachments included) and sync colliders
    pub fn refresh(&mut self) {
        self.scene.propagate();
        self.colliders.sync(&self.scene);
    }

    /// Call Use on the `kind` capability of `entity`. Returns false if the
    /// entity has none.
    pub fn use_entity(&mut self, entity: EntityId, kind: InteractionKind, hand: HandRef<'_>) -> bool {
        self.dispatch(entity, kind, hand, |interactable, ctx| interactable.on_use(ctx))
    }

    /// Call Unuse on the `kind` capability of `entity`. Returns false if the
    /// entity has none.
    pub fn unuse_entity(
        &mut self,
        entity: EntityId,
        kind: InteractionKind,
        hand: HandRef<'_>,
    ) -> bool {
        self.dispatch(entity, kind, hand, |interactable, ctx| interactable.on_unuse(ctx))
    }

    fn dispatch(
        &mut self,
        entity: EntityId,
        kind: InteractionKind,
        hand: HandRef<'_>,
        call: impl FnOnce(&mut dyn Interactable, &mut InteractionContext<'_>),
    ) -> bool {
        let Some(interactable) = self.interactables.get_mut(entity, kind) else {
            return false;
        };
        let mut ctx = InteractionContext {
            entity,
            hand,
            scene: &mut self.scene,
            events: &mut self.events,
        };
        call(interactable.as_mut(), &mut ctx);
        true
    }
}

/// Interaction world plus the player, advanced once per host frame
#[derive(Debug)]
pub struct Session {
    pub world: InteractionWorld,
    pub player: Player,
    config: InteractionConfig,
}

impl Session {
    pub fn new(config: InteractionConfig) -> Result<Self> {
        config.validate()?;
        let mut world = InteractionWorld::new(config.layers);
        let player = Player::new(&mut world, &config);
        Ok(Self {
            world,
            player,
            config,
        })
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Advance one tick: poll the runtime, apply host changes to the scene,
    /// run the player, then settle attached poses and colliders.
    pub fn tick(&mut self, backend: &mut dyn XrBackend, desktop: &DesktopInput) {
        backend.poll();
        self.world.refresh();
        self.player.update(&mut self.world, &*backend, desktop);
        self.world.refresh();
        trace!("Tick done in {:?} mode", self.player.mode());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use grasp_core::{Layer, Transform};

    #[test]
    fn test_registration_requires_entity() {
        let mut world = InteractionWorld::default();
        let ghost = {
            let mut other = Scene::new();
            other.spawn("a", Transform::IDENTITY);
            other.spawn("b", Transform::IDENTITY)
        };

        assert!(matches!(world.add_usable(ghost), Err(Error::UnknownEntity(e)) if e == ghost));
        assert!(matches!(
            world.add_collider(ghost, Shape::cube(1.0)),
            Err(Error::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_add_grabbable_sets_layers() {
        let mut world = InteractionWorld::default();
        let mug = world.scene.spawn("mug", Transform::IDENTITY);
        let handle = world.scene.spawn_child(mug, "handle", Transform::IDENTITY).unwrap();

        world.add_grabbable(mug, Some(1.0)).unwrap();
        assert_eq!(world.scene.layer(mug), Some(world.layers().grabbable));
        assert_eq!(world.scene.layer(handle), Some(world.layers().grabbable));
        assert_eq!(world.grabbable(mug).unwrap().reach_override(), Some(1.0));
        assert!(world.usable(mug).is_none());

        assert!(matches!(
            world.add_grabbable(mug, None),
            Err(Error::DuplicateCapability { kind: InteractionKind::Grab, .. })
        ));
        // Use and Grab may coexist on one entity
        world.add_usable(mug).unwrap();
    }

    #[test]
    fn test_add_grabbable_rejects_bad_reach() {
        let mut world = InteractionWorld::default();
        let crate_entity = world.scene.spawn("crate", Transform::IDENTITY);

        for reach in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                world.add_grabbable(crate_entity, Some(reach)),
                Err(Error::InvalidReach { .. })
            ));
        }
        assert!(world.grabbable(crate_entity).is_none());
        assert_eq!(world.scene.layer(crate_entity), Some(Layer::DEFAULT));
    }

    #[test]
    fn test_despawn_cleans_up() {
        let mut world = InteractionWorld::default();
        let shelf = world.scene.spawn("shelf", Transform::IDENTITY);
        let book = world.scene.spawn_child(shelf, "book", Transform::IDENTITY).unwrap();
        world.add_collider(shelf, Shape::cube(1.0)).unwrap();
        world.add_collider(book, Shape::cube(0.2)).unwrap();
        world.add_grabbable(book, None).unwrap();

        let removed = world.despawn(shelf);
        assert_eq!(removed, vec![shelf, book]);
        assert!(world.colliders.is_empty());
        assert!(world.interactables.is_empty());
    }

    #[test]
    fn test_dispatch_without_capability() {
        let mut world = InteractionWorld::default();
        let rock = world.scene.spawn("rock", Transform::IDENTITY);
        let hand = world.scene.spawn("hand", Transform::IDENTITY);
        assert!(!world.use_entity(rock, InteractionKind::Use, HandRef::tracked(hand)));
    }

    #[test]
    fn test_refresh_moves_attached_entities() {
        let mut world = InteractionWorld::default();
        let mug = world.scene.spawn("mug", Transform::IDENTITY);
        let hand = world.scene.spawn("hand", Transform::IDENTITY);
        world.add_grabbable(mug, None).unwrap();

        assert!(world.use_entity(mug, InteractionKind::Grab, HandRef::tracked(hand)));
        assert_eq!(world.scene.layer(mug), Some(Layer::new(9).unwrap()));

        world
            .scene
            .set_world_pose(hand, Vec3::new(1.0, 2.0, 3.0), glam::Quat::IDENTITY);
        world.refresh();
        assert_eq!(world.scene.world_position(mug), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_session_rejects_invalid_config() {
        let mut config = InteractionConfig::default();
        config.flatscreen.default_reach = 0.0;
        assert!(matches!(Session::new(config), Err(Error::InvalidConfig(_))));
    }
}
