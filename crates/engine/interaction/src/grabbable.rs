//! Grabbable: Use toggles between grabbed and released
//!
//! Grabbing attaches the entity to the hand at zero offset and moves it and
//! its descendants to the grabbed layer, so cursor rays and other hands'
//! raycasts pass through it. Releasing reverses both. Unuse does nothing;
//! a held grabbable stays attached until the next Use.

use crate::config::GrabLayers;
use crate::events::InteractionEvent;
use crate::interactable::{Interactable, InteractionContext};
use crate::kind::InteractionKind;
use grasp_core::Transform;
use std::any::Any;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct Grabbable {
    layers: GrabLayers,
    /// Flatscreen reach while held, `None` keeps the hand's reach
    reach_override: Option<f32>,
    is_grabbed: bool,
}

impl Grabbable {
    pub fn new(layers: GrabLayers) -> Self {
        Self {
            layers,
            reach_override: None,
            is_grabbed: false,
        }
    }

    pub fn with_reach_override(mut self, reach: f32) -> Self {
        self.reach_override = Some(reach);
        self
    }

    pub fn is_grabbed(&self) -> bool {
        self.is_grabbed
    }

    pub fn reach_override(&self) -> Option<f32> {
        self.reach_override
    }

    pub fn layers(&self) -> GrabLayers {
        self.layers
    }

    fn grab(&mut self, ctx: &mut InteractionContext<'_>) {
        let (entity, hand) = (ctx.entity, ctx.hand.entity);
        if !ctx.scene.attach(entity, hand, Transform::IDENTITY) {
            warn!("Cannot attach {} to hand {}", entity, hand);
            return;
        }
        self.is_grabbed = true;

        if ctx.scene.layer(entity) != Some(self.layers.grabbable) {
            warn!(
                "Grabbed {} is not on {}; it will be after release",
                entity, self.layers.grabbable
            );
        }
        ctx.scene.set_layer_recursive(entity, self.layers.grabbed);

        if let (Some(reach), Some(distance)) = (ctx.hand.reach.as_deref_mut(), self.reach_override) {
            reach.set_max_distance(distance);
        }

        debug!("{} grabbed by {}", entity, hand);
        ctx.events.emit(InteractionEvent::Grabbed { entity, hand });
    }

    fn release(&mut self, ctx: &mut InteractionContext<'_>) {
        let (entity, hand) = (ctx.entity, ctx.hand.entity);
        self.is_grabbed = false;
        ctx.scene.detach(entity);
        ctx.scene.set_layer_recursive(entity, self.layers.grabbable);

        if let (Some(reach), Some(_)) = (ctx.hand.reach.as_deref_mut(), self.reach_override) {
            reach.restore_default();
        }

        debug!("{} released by {}", entity, hand);
        ctx.events.emit(InteractionEvent::Released { entity, hand });
    }
}

impl Default for Grabbable {
    fn default() -> Self {
        Self::new(GrabLayers::default())
    }
}

impl Interactable for Grabbable {
    fn kind(&self) -> InteractionKind {
        InteractionKind::Grab
    }

    fn on_use(&mut self, ctx: &mut InteractionContext<'_>) {
        if self.is_grabbed {
            self.release(ctx);
        } else {
            self.grab(ctx);
        }
    }

    fn on_unuse(&mut self, _ctx: &mut InteractionContext<'_>) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}
