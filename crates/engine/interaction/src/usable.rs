//! Plain usable: reports use and unuse, keeps no state

use crate::events::InteractionEvent;
use crate::interactable::{Interactable, InteractionContext};
use crate::kind::InteractionKind;
use std::any::Any;

#[derive(Debug, Clone, Copy, Default)]
pub struct Usable;

impl Usable {
    pub fn new() -> Self {
        Self
    }
}

impl Interactable for Usable {
    fn kind(&self) -> InteractionKind {
        InteractionKind::Use
    }

    fn on_use(&mut self, ctx: &mut InteractionContext<'_>) {
        ctx.events.emit(InteractionEvent::Used {
            entity: ctx.entity,
            hand: ctx.hand.entity,
        });
    }

    fn on_unuse(&mut self, ctx: &mut InteractionContext<'_>) {
        ctx.events.emit(InteractionEvent::Unused {
            entity: ctx.entity,
            hand: ctx.hand.entity,
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
