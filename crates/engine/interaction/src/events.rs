//! Interaction notifications
//!
//! Interactables announce their transitions through an [`EventBus`]. Emitting
//! is fire-and-forget: every matching listener runs synchronously and the
//! event is also appended to a log the host can drain once per tick.

use crate::kind::InteractionKind;
use grasp_core::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Transition of an interactable, reported with the hand that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    Used { entity: EntityId, hand: EntityId },
    Unused { entity: EntityId, hand: EntityId },
    Grabbed { entity: EntityId, hand: EntityId },
    Released { entity: EntityId, hand: EntityId },
}

impl InteractionEvent {
    /// Interactable the event is about
    pub fn entity(&self) -> EntityId {
        match *self {
            Self::Used { entity, .. }
            | Self::Unused { entity, .. }
            | Self::Grabbed { entity, .. }
            | Self::Released { entity, .. } => entity,
        }
    }

    pub fn hand(&self) -> EntityId {
        match *self {
            Self::Used { hand, .. }
            | Self::Unused { hand, .. }
            | Self::Grabbed { hand, .. }
            | Self::Released { hand, .. } => hand,
        }
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            Self::Used { .. } | Self::Unused { .. } => InteractionKind::Use,
            Self::Grabbed { .. } | Self::Released { .. } => InteractionKind::Grab,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&InteractionEvent)>;

struct Subscription {
    id: ListenerId,
    /// Only events about this entity, or all events when `None`
    filter: Option<EntityId>,
    listener: Listener,
}

/// Event dispatch with zero or more listeners and a drainable log
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    log: Vec<InteractionEvent>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to every event
    pub fn subscribe(&mut self, listener: impl FnMut(&InteractionEvent) + 'static) -> ListenerId {
        self.add(None, Box::new(listener))
    }

    /// Listen to events about one entity
    pub fn subscribe_to(
        &mut self,
        entity: EntityId,
        listener: impl FnMut(&InteractionEvent) + 'static,
    ) -> ListenerId {
        self.add(Some(entity), Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn emit(&mut self, event: InteractionEvent) {
        debug!("{:?}", event);
        for subscription in &mut self.subscriptions {
            if subscription.filter.map_or(true, |e| e == event.entity()) {
                (subscription.listener)(&event);
            }
        }
        self.log.push(event);
    }

    /// Events emitted since the last drain
    pub fn pending(&self) -> &[InteractionEvent] {
        &self.log
    }

    /// Take the events emitted since the last drain
    pub fn drain(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.log)
    }

    fn add(&mut self, filter: Option<EntityId>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            listener,
        });
        id
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.subscriptions.len())
            .field("pending", &self.log.len())
            .finish()
    }
}
