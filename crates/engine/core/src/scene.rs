//! Entity hierarchy with layers and attachments
//!
//! Entities form a parent/child hierarchy fixed at spawn time. On top of it an
//! entity may be *attached* to an anchor entity: while attached, its world pose
//! is the anchor's world pose composed with the attachment offset, regardless
//! of its parent. Attachment never changes the hierarchy, so detaching leaves
//! the entity where it is in world space under its original parent.
//!
//! World poses are cached and recomputed by [`Scene::propagate`], which the
//! host calls once per tick after moving anchors.

use crate::layer::Layer;
use crate::transform::Transform;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::trace;

/// Stable handle to a scene entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Explicit "attached-to" relation between an entity and an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    /// Entity whose pose drives the attached entity
    pub anchor: EntityId,
    /// Pose relative to the anchor
    pub offset: Transform,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: Transform,
    world: Transform,
    layer: Layer,
    attachment: Option<Attachment>,
}

/// Collection of entities with hierarchy, layers and attachments
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<EntityId, Node>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a root entity
    pub fn spawn(&mut self, name: impl Into<String>, local: Transform) -> EntityId {
        self.insert(name.into(), None, local)
    }

    /// Spawn an entity under `parent`. Returns `None` if the parent does not exist.
    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        local: Transform,
    ) -> Option<EntityId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.insert(name.into(), Some(parent), local);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(id);
        }
        Some(id)
    }

    fn insert(&mut self, name: String, parent: Option<EntityId>, local: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let world = parent
            .and_then(|p| self.nodes.get(&p))
            .map(|p| p.world.mul_transform(&local))
            .unwrap_or(local);

        self.nodes.insert(
            id,
            Node {
                name,
                parent,
                children: Vec::new(),
                local,
                world,
                layer: Layer::DEFAULT,
                attachment: None,
            },
        );
        id
    }

    /// Remove an entity and all its descendants.
    ///
    /// Attachments anchored on any removed entity are dropped; the formerly
    /// attached entities stay at their last world pose. Returns the removed ids,
    /// the entity itself first.
    pub fn despawn(&mut self, id: EntityId) -> Vec<EntityId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        let removed = self.descendants(id);
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for entity in &removed {
            self.nodes.remove(entity);
        }

        let orphaned: Vec<EntityId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.attachment.is_some_and(|a| removed.contains(&a.anchor)))
            .map(|(&id, _)| id)
            .collect();
        for entity in orphaned {
            self.detach(entity);
        }

        removed
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All entity ids in spawn order
    pub fn entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The entity followed by its ancestors, nearest first
    pub fn ancestors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |&current| {
            self.parent(current)
        })
    }

    /// The entity and all of its descendants, depth-first, the entity first
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    pub fn local_transform(&self, id: EntityId) -> Option<Transform> {
        self.nodes.get(&id).map(|n| n.local)
    }

    pub fn set_local_transform(&mut self, id: EntityId, local: Transform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
        }
    }

    /// Cached world pose as of the last [`propagate`](Self::propagate) or
    /// direct world-space write
    pub fn world_transform(&self, id: EntityId) -> Option<Transform> {
        self.nodes.get(&id).map(|n| n.world)
    }

    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_transform(id).map(|t| t.translation)
    }

    /// Place an entity in world space.
    ///
    /// The local pose is derived from the parent's cached world pose. The
    /// entity's own cached world pose updates immediately; descendants follow
    /// on the next propagation.
    pub fn set_world_transform(&mut self, id: EntityId, world: Transform) {
        let parent_world = self
            .parent(id)
            .and_then(|p| self.world_transform(p))
            .unwrap_or(Transform::IDENTITY);

        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = parent_world.inverse().mul_transform(&world);
            node.world = world;
        }
    }

    pub fn set_world_pose(&mut self, id: EntityId, position: Vec3, rotation: Quat) {
        self.set_world_transform(id, Transform::new(position, rotation));
    }

    pub fn layer(&self, id: EntityId) -> Option<Layer> {
        self.nodes.get(&id).map(|n| n.layer)
    }

    pub fn set_layer(&mut self, id: EntityId, layer: Layer) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.layer = layer;
        }
    }

    /// Set the layer of an entity and every descendant. Returns how many
    /// entities were updated.
    pub fn set_layer_recursive(&mut self, id: EntityId, layer: Layer) -> usize {
        let entities = self.descendants(id);
        for entity in &entities {
            self.set_layer(*entity, layer);
        }
        entities.len()
    }

    pub fn attachment(&self, id: EntityId) -> Option<Attachment> {
        self.nodes.get(&id).and_then(|n| n.attachment)
    }

    pub fn is_attached_to(&self, id: EntityId, anchor: EntityId) -> bool {
        self.attachment(id).is_some_and(|a| a.anchor == anchor)
    }

    /// Attach `id` to `anchor` at `offset`.
    ///
    /// Fails (returns false) if either entity is missing or the attachment
    /// would make an entity drive its own pose. On success, world poses are
    /// propagated immediately so the attached entity is at the anchor.
    pub fn attach(&mut self, id: EntityId, anchor: EntityId, offset: Transform) -> bool {
        if !self.contains(id) || !self.contains(anchor) || self.pose_depends_on(anchor, id) {
            return false;
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attachment = Some(Attachment { anchor, offset });
        }
        self.propagate();
        true
    }

    /// Remove the attachment of `id`, keeping its current world pose
    pub fn detach(&mut self, id: EntityId) -> Option<Attachment> {
        let attachment = self.nodes.get_mut(&id)?.attachment.take()?;
        let world = self.world_transform(id).unwrap_or(Transform::IDENTITY);
        self.set_world_transform(id, world);
        Some(attachment)
    }

    /// Whether the pose of `start` is derived (through parents or
    /// attachments) from `target`, including `start == target`
    fn pose_depends_on(&self, start: EntityId, target: EntityId) -> bool {
        let mut current = Some(start);
        let mut seen = HashSet::new();
        while let Some(id) = current {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.pose_base(id);
        }
        false
    }

    fn pose_base(&self, id: EntityId) -> Option<EntityId> {
        let node = self.nodes.get(&id)?;
        match node.attachment {
            Some(attachment) => Some(attachment.anchor),
            None => node.parent,
        }
    }

    /// Recompute all cached world poses from local poses and attachments
    pub fn propagate(&mut self) {
        let mut done = HashSet::with_capacity(self.nodes.len());
        for id in self.entities() {
            self.resolve_world(id, &mut done);
        }
        trace!("Propagated {} entity poses", done.len());
    }

    fn resolve_world(&mut self, id: EntityId, done: &mut HashSet<EntityId>) -> Transform {
        let (base, local) = match self.nodes.get(&id) {
            Some(node) if done.contains(&id) => return node.world,
            Some(node) => match node.attachment {
                Some(attachment) => (Some(attachment.anchor), attachment.offset),
                None => (node.parent, node.local),
            },
            None => return Transform::IDENTITY,
        };

        let world = match base {
            Some(base) if self.contains(base) => self.resolve_world(base, done).mul_transform(&local),
            _ => local,
        };

        if let Some(node) = self.nodes.get_mut(&id) {
            node.world = world;
        }
        done.insert(id);
        world
    }
}
