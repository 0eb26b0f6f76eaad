//! Collider storage synchronised from the scene
//!
//! Colliders keep their insertion order; overlap queries report hits in that
//! order, which makes "first found" tie-breaking reproducible.

use crate::collider::{Collider, ColliderHandle};
use crate::query::{OverlapHit, RaycastHit, SpatialQuery};
use grasp_core::{EntityId, Layer, LayerMask, Ray, Scene, Transform};
use glam::Vec3;
use tracing::trace;

#[derive(Debug, Clone)]
struct Slot {
    handle: ColliderHandle,
    collider: Collider,
    /// World pose as of the last sync
    pose: Transform,
    layer: Layer,
    /// False until synced, or when the entity no longer exists
    live: bool,
}

/// Colliders attached to scene entities
///
/// Slots are kept sorted by handle, so removal compacts the storage without
/// disturbing insertion order.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    slots: Vec<Slot>,
    next_handle: u32,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider. It takes part in queries after the next
    /// [`sync`](Self::sync).
    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        let handle = ColliderHandle(self.next_handle);
        self.next_handle += 1;
        self.slots.push(Slot {
            handle,
            collider,
            pose: Transform::IDENTITY,
            layer: Layer::DEFAULT,
            live: false,
        });
        handle
    }

    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let index = self.index_of(handle)?;
        Some(self.slots.remove(index).collider)
    }

    /// Remove every collider attached to `entity`. Returns how many were removed.
    pub fn remove_entity(&mut self, entity: EntityId) -> usize {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.collider.entity != entity);
        before - self.slots.len()
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.slot(handle).map(|s| &s.collider)
    }

    /// World pose of a collider as of the last sync
    pub fn pose(&self, handle: ColliderHandle) -> Option<Transform> {
        self.slot(handle).filter(|s| s.live).map(|s| s.pose)
    }

    /// Handles of all colliders attached to `entity`
    pub fn colliders_of(&self, entity: EntityId) -> Vec<ColliderHandle> {
        self.slots
            .iter()
            .filter(|slot| slot.collider.entity == entity)
            .map(|slot| slot.handle)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Refresh collider poses and layers from their entities.
    ///
    /// Colliders whose entity has been despawned stop taking part in queries.
    pub fn sync(&mut self, scene: &Scene) {
        let mut live = 0;
        for slot in &mut self.slots {
            match (
                scene.world_transform(slot.collider.entity),
                scene.layer(slot.collider.entity),
            ) {
                (Some(world), Some(layer)) => {
                    slot.pose = world.mul_transform(&slot.collider.offset);
                    slot.layer = layer;
                    slot.live = true;
                    live += 1;
                }
                _ => slot.live = false,
            }
        }
        trace!("Synced {} colliders", live);
    }

    fn index_of(&self, handle: ColliderHandle) -> Option<usize> {
        self.slots.binary_search_by_key(&handle, |slot| slot.handle).ok()
    }

    fn slot(&self, handle: ColliderHandle) -> Option<&Slot> {
        self.index_of(handle).map(|index| &self.slots[index])
    }

    fn queryable(&self, mask: LayerMask) -> impl Iterator<Item = (ColliderHandle, &Slot)> {
        self.slots
            .iter()
            .filter(move |slot| slot.live && mask.contains(slot.layer))
            .map(|slot| (slot.handle, slot))
    }
}

impl SpatialQuery for CollisionWorld {
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
        max_results: usize,
        out: &mut Vec<OverlapHit>,
    ) -> usize {
        out.clear();
        let hits = self
            .queryable(mask)
            .filter(|(_, slot)| slot.collider.shape.intersects_sphere(&slot.pose, center, radius))
            .take(max_results)
            .map(|(handle, slot)| OverlapHit {
                collider: handle,
                entity: slot.collider.entity,
                position: slot.pose.translation,
            });
        out.extend(hits);
        out.len()
    }

    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RaycastHit> {
        let mut best: Option<RaycastHit> = None;

        for (handle, slot) in self.queryable(mask) {
            let limit = best.map_or(max_distance, |b| b.distance);
            if let Some((distance, normal)) = slot.collider.shape.cast_ray(&slot.pose, ray, limit) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(RaycastHit {
                        collider: handle,
                        entity: slot.collider.entity,
                        distance,
                        point: ray.at(distance),
                        normal,
                    });
                }
            }
        }

        best
    }
}
