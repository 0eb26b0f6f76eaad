//! Hand proximity resolution and use-state machine
//!
//! Every tick, for each [`InteractionKind`] in order:
//!
//! 1. Read the kind's pressed/released edges.
//! 2. Nothing held and pressed: overlap a sphere around the collision point,
//!    resolve each collider to the closest ancestor with the kind's
//!    capability, pick the candidate nearest to the query point, hold it and
//!    Use it.
//! 3. Something held and released, or the held entity drifted further than
//!    the collision radius from the hand: Unuse it and clear the slot.
//!
//! The held slot is read once at the start of a kind's evaluation, so an
//! entity picked up this tick is never released in the same tick.

use crate::config::HandConfig;
use crate::flatscreen::RaycastReach;
use crate::input::HandInput;
use crate::interactable::HandRef;
use crate::kind::{InteractionKind, PerKind};
use crate::world::InteractionWorld;
use glam::{Quat, Vec3};
use grasp_core::EntityId;
use grasp_physics::{OverlapHit, SpatialQuery};
use tracing::{debug, trace, warn};

/// Upper bound on colliders returned by one proximity query
pub const MAX_OVERLAPPING_COLLIDERS: usize = 32;

#[derive(Debug, Clone)]
pub struct Hand {
    entity: EntityId,
    pub config: HandConfig,
    held: PerKind<Option<EntityId>>,
    overlaps: Vec<OverlapHit>,
}

impl Hand {
    /// Hand driving the pose of `entity`
    pub fn new(entity: EntityId, config: HandConfig) -> Self {
        Self {
            entity,
            config,
            held: PerKind::default(),
            overlaps: Vec::with_capacity(MAX_OVERLAPPING_COLLIDERS),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Interactable currently held for `kind`
    pub fn held(&self, kind: InteractionKind) -> Option<EntityId> {
        self.held[kind]
    }

    pub fn is_holding(&self, entity: EntityId) -> bool {
        self.held.iter().any(|(_, held)| *held == Some(entity))
    }

    /// World-space centre of the proximity query
    pub fn collision_point(&self, world: &InteractionWorld) -> Option<Vec3> {
        world
            .scene
            .world_transform(self.entity)
            .map(|t| t.transform_point(self.config.use_collision_offset))
    }

    /// Move the hand entity to a world pose
    pub fn apply_pose(&self, world: &mut InteractionWorld, position: Vec3, rotation: Quat) {
        world.scene.set_world_pose(self.entity, position, rotation);
    }

    /// Nearest entity around the collision point exposing `kind`.
    ///
    /// Distances are measured from each collider's origin to the query point.
    /// Equal distances keep the first candidate in query order.
    pub fn closest_interactable(
        &mut self,
        kind: InteractionKind,
        world: &InteractionWorld,
    ) -> Option<EntityId> {
        let center = self.collision_point(world)?;
        let count = world.colliders.overlap_sphere(
            center,
            self.config.use_collision_radius,
            self.config.use_layer_mask,
            MAX_OVERLAPPING_COLLIDERS,
            &mut self.overlaps,
        );
        if count >= MAX_OVERLAPPING_COLLIDERS {
            warn!(
                "Hand {} overlaps {} or more colliders; some candidates may be missed",
                self.entity, MAX_OVERLAPPING_COLLIDERS
            );
        }

        let mut closest: Option<(EntityId, f32)> = None;
        for hit in &self.overlaps {
            let Some(owner) = world.interactables.owner(&world.scene, hit.entity, kind) else {
                continue;
            };
            let distance = hit.position.distance(center);
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((owner, distance));
            }
        }

        trace!("Hand {} {} candidates: {} hits -> {:?}", self.entity, kind, count, closest);
        closest.map(|(entity, _)| entity)
    }

    /// Run the use-state machine for every kind
    pub fn update_use_states(
        &mut self,
        input: &dyn HandInput,
        world: &mut InteractionWorld,
        mut reach: Option<&mut RaycastReach>,
    ) {
        for kind in InteractionKind::ALL {
            self.update_use_state(kind, input, world, reach.as_deref_mut());
        }
    }

    /// Run the use-state machine for one kind
    pub fn update_use_state(
        &mut self,
        kind: InteractionKind,
        input: &dyn HandInput,
        world: &mut InteractionWorld,
        reach: Option<&mut RaycastReach>,
    ) {
        let pressed = input.pressed(kind);
        let released = input.released(kind);

        match self.held[kind] {
            None => {
                if !pressed {
                    return;
                }
                if let Some(target) = self.closest_interactable(kind, world) {
                    debug!("Hand {} uses {} ({})", self.entity, target, kind);
                    self.held[kind] = Some(target);
                    world.use_entity(target, kind, self.hand_ref(reach));
                }
            }
            Some(held) => {
                let Some(held_position) = world
                    .scene
                    .world_position(held)
                    .filter(|_| world.interactables.contains(held, kind))
                else {
                    debug!("Hand {} drops {} ({}): no longer interactable", self.entity, held, kind);
                    self.held[kind] = None;
                    return;
                };

                let drifted = world
                    .scene
                    .world_position(self.entity)
                    .map_or(true, |hand| hand.distance(held_position) > self.config.use_collision_radius);

                if released || drifted {
                    debug!(
                        "Hand {} unuses {} ({}){}",
                        self.entity,
                        held,
                        kind,
                        if drifted { " after drifting away" } else { "" }
                    );
                    world.unuse_entity(held, kind, self.hand_ref(reach));
                    self.held[kind] = None;
                }
            }
        }
    }

    fn hand_ref<'a>(&self, reach: Option<&'a mut RaycastReach>) -> HandRef<'a> {
        HandRef {
            entity: self.entity,
            reach,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::InteractionEvent;
    use crate::input::SignalFrame;
    use grasp_core::Transform;
    use grasp_physics::Shape;

    fn world_with_hand(radius: f32) -> (InteractionWorld, Hand) {
        let mut world = InteractionWorld::default();
        let entity = world.scene.spawn("hand", Transform::IDENTITY);
        let config = HandConfig {
            use_collision_radius: radius,
            ..HandConfig::default()
        };
        (world, Hand::new(entity, config))
    }

    fn usable_at(world: &mut InteractionWorld, name: &str, position: Vec3) -> EntityId {
        let entity = world.scene.spawn(name, Transform::from_translation(position));
        world.add_collider(entity, Shape::Sphere { radius: 0.01 }).unwrap();
        world.add_usable(entity).unwrap();
        entity
    }

    #[test]
    fn test_press_uses_nearest() {
        let (mut world, mut hand) = world_with_hand(1.0);
        let far = usable_at(&mut world, "far", Vec3::new(0.8, 0.0, 0.0));
        let near = usable_at(&mut world, "near", Vec3::new(0.0, 0.5, 0.0));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);

        assert_eq!(hand.held(InteractionKind::Use), Some(near));
        assert_eq!(
            world.events.drain(),
            vec![InteractionEvent::Used { entity: near, hand: hand.entity() }]
        );
        assert!(!hand.is_holding(far));
    }

    #[test]
    fn test_equal_distances_keep_query_order() {
        let (mut world, mut hand) = world_with_hand(1.0);
        let first = usable_at(&mut world, "first", Vec3::new(0.5, 0.0, 0.0));
        let _second = usable_at(&mut world, "second", Vec3::new(-0.5, 0.0, 0.0));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), Some(first));
    }

    #[test]
    fn test_nothing_in_range() {
        let (mut world, mut hand) = world_with_hand(0.1);
        usable_at(&mut world, "far", Vec3::new(2.0, 0.0, 0.0));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), None);
        assert!(world.events.pending().is_empty());
    }

    #[test]
    fn test_release_signal_unuses() {
        let (mut world, mut hand) = world_with_hand(1.0);
        let lever = usable_at(&mut world, "lever", Vec3::new(0.2, 0.0, 0.0));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        hand.update_use_states(&SignalFrame::idle(), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), Some(lever));

        hand.update_use_states(&SignalFrame::release(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), None);
        assert_eq!(
            world.events.drain().last(),
            Some(&InteractionEvent::Unused { entity: lever, hand: hand.entity() })
        );
    }

    #[test]
    fn test_press_and_release_in_one_tick_keeps_hold() {
        let (mut world, mut hand) = world_with_hand(1.0);
        let lever = usable_at(&mut world, "lever", Vec3::new(0.2, 0.0, 0.0));
        world.refresh();

        let mut frame = SignalFrame::press(InteractionKind::Use);
        frame.released[InteractionKind::Use] = true;
        hand.update_use_states(&frame, &mut world, None);

        assert_eq!(hand.held(InteractionKind::Use), Some(lever));
    }

    #[test]
    fn test_drift_releases_without_signal() {
        let (mut world, mut hand) = world_with_hand(0.5);
        let lever = usable_at(&mut world, "lever", Vec3::new(0.2, 0.0, 0.0));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), Some(lever));

        hand.apply_pose(&mut world, Vec3::new(-1.0, 0.0, 0.0), Quat::IDENTITY);
        hand.update_use_states(&SignalFrame::idle(), &mut world, None);

        assert_eq!(hand.held(InteractionKind::Use), None);
        assert!(matches!(
            world.events.drain().last(),
            Some(InteractionEvent::Unused { entity, .. }) if *entity == lever
        ));
    }

    #[test]
    fn test_despawned_target_is_dropped_silently() {
        let (mut world, mut hand) = world_with_hand(1.0);
        let lever = usable_at(&mut world, "lever", Vec3::new(0.2, 0.0, 0.0));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        world.events.drain();
        world.despawn(lever);

        hand.update_use_states(&SignalFrame::release(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), None);
        assert!(world.events.pending().is_empty());
    }

    #[test]
    fn test_collider_child_resolves_to_capable_ancestor() {
        let (mut world, mut hand) = world_with_hand(1.0);
        let crate_entity = world
            .scene
            .spawn("crate", Transform::from_translation(Vec3::new(0.0, 0.0, 0.3)));
        let lid = world
            .scene
            .spawn_child(crate_entity, "lid", Transform::from_translation(Vec3::Y * 0.1))
            .unwrap();
        world.add_collider(lid, Shape::cube(0.1)).unwrap();
        world.add_grabbable(crate_entity, None).unwrap();
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Grab), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Grab), Some(crate_entity));
    }

    #[test]
    fn test_layer_mask_hides_candidates() {
        let (mut world, mut hand) = world_with_hand(1.0);
        usable_at(&mut world, "lever", Vec3::new(0.2, 0.0, 0.0));
        world.refresh();

        hand.config.use_layer_mask = grasp_core::LayerMask::NONE;
        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), None);
    }

    #[test]
    fn test_collision_offset_moves_query() {
        let (mut world, mut hand) = world_with_hand(0.1);
        let lever = usable_at(&mut world, "lever", Vec3::new(0.0, 0.0, -0.5));
        world.refresh();

        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), None);

        hand.config.use_collision_offset = Vec3::new(0.0, 0.0, -0.5);
        hand.update_use_states(&SignalFrame::press(InteractionKind::Use), &mut world, None);
        assert_eq!(hand.held(InteractionKind::Use), Some(lever));
    }

    #[test]
    fn test_overlap_cap_truncates() {
        let (mut world, mut hand) = world_with_hand(1.0);
        for i in 0..40 {
            usable_at(&mut world, &format!("pebble{}", i), Vec3::new(0.0, 0.0, 0.01 * i as f32));
        }
        world.refresh();

        let found = hand.closest_interactable(InteractionKind::Use, &world);
        assert!(found.is_some());
        assert_eq!(hand.overlaps.len(), MAX_OVERLAPPING_COLLIDERS);
    }
}
