//! Flatscreen hand: a hand placed by a cursor ray instead of tracking

use crate::config::{BindingsConfig, FlatscreenConfig, GrabLayers, HandConfig};
use crate::hand::Hand;
use crate::input::{FlatscreenInput, HandInput, TrackedInput};
use crate::world::InteractionWorld;
use devices::{ActionSet, DesktopInput};
use glam::{Vec2, Vec3};
use grasp_core::{look_rotation, Camera, EntityId, LayerMask};
use grasp_physics::SpatialQuery;
use tracing::trace;

/// Raycast distance state of a flatscreen hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastReach {
    default_distance: f32,
    max_distance: f32,
    last_hit_distance: f32,
}

impl RaycastReach {
    /// Reach starting at `default_distance`, with the remembered hit distance
    /// at the same value
    pub fn new(default_distance: f32) -> Self {
        Self {
            default_distance,
            max_distance: default_distance,
            last_hit_distance: default_distance,
        }
    }

    pub fn default_distance(&self) -> f32 {
        self.default_distance
    }

    /// Current maximum raycast distance
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Distance of the last hit, where the hand stays while nothing is hit
    pub fn last_hit_distance(&self) -> f32 {
        self.last_hit_distance
    }

    /// Change the maximum distance. The remembered hit distance never
    /// exceeds it.
    pub fn set_max_distance(&mut self, distance: f32) {
        self.max_distance = distance;
        self.last_hit_distance = self.last_hit_distance.min(distance);
    }

    pub fn restore_default(&mut self) {
        self.set_max_distance(self.default_distance);
    }

    pub fn record_hit(&mut self, distance: f32) {
        self.last_hit_distance = distance;
    }
}

/// Hand positioned where the cursor ray meets the scene
#[derive(Debug, Clone)]
pub struct FlatscreenHand {
    pub hand: Hand,
    pub camera: Camera,
    pub raycast_mask: LayerMask,
    reach: RaycastReach,
}

impl FlatscreenHand {
    /// The cursor ray never hits `layers.grabbed`, whatever the configured
    /// mask says, so a held object cannot pull the hand toward the camera.
    pub fn new(
        entity: EntityId,
        hand: HandConfig,
        config: &FlatscreenConfig,
        layers: &GrabLayers,
    ) -> Self {
        Self {
            hand: Hand::new(entity, hand),
            camera: Camera::new(config.camera_position, config.viewport),
            raycast_mask: config.raycast_layer_mask.without(layers.grabbed),
            reach: RaycastReach::new(config.default_reach),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.hand.entity()
    }

    pub fn reach(&self) -> &RaycastReach {
        &self.reach
    }

    pub fn reach_mut(&mut self) -> &mut RaycastReach {
        &mut self.reach
    }

    /// Place the hand along the ray through `cursor` (viewport pixels,
    /// top-left origin), facing away from the camera.
    ///
    /// A hit within the current reach puts the hand at the hit point and
    /// remembers its distance; a miss keeps the hand at the remembered
    /// distance along the ray.
    pub fn update_pose(&mut self, world: &mut InteractionWorld, cursor: Vec2) {
        let ray = self.camera.screen_point_to_ray(cursor);
        let position = match world
            .colliders
            .raycast(&ray, self.reach.max_distance(), self.raycast_mask)
        {
            Some(hit) => {
                trace!("Cursor ray hit {} at {:.3}", hit.entity, hit.distance);
                self.reach.record_hit(hit.distance);
                hit.point
            }
            None => ray.at(self.reach.last_hit_distance()),
        };

        let rotation = look_rotation(position - self.camera.position, Vec3::Y);
        self.hand.apply_pose(world, position, rotation);
    }

    /// Run the use-state machine with this hand's reach available to
    /// grabbables
    pub fn update_use_states(&mut self, input: &dyn HandInput, world: &mut InteractionWorld) {
        self.hand.update_use_states(input, world, Some(&mut self.reach));
    }

    /// Pose from the cursor, then use states from desktop buttons or the
    /// tracked actions, whichever fires
    pub fn tick(
        &mut self,
        world: &mut InteractionWorld,
        desktop: &DesktopInput,
        actions: Option<&ActionSet>,
        bindings: &BindingsConfig,
    ) {
        self.update_pose(world, desktop.cursor);
        world.refresh();
        let input = FlatscreenInput::new(
            TrackedInput::new(actions, &bindings.tracked),
            desktop,
            &bindings.flatscreen,
        );
        self.update_use_states(&input, world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SignalFrame;
    use crate::kind::InteractionKind;
    use devices::{DesktopButton, MouseButton};
    use grasp_core::Transform;
    use grasp_physics::Shape;

    const EPS: f32 = 1e-4;

    fn setup() -> (InteractionWorld, FlatscreenHand) {
        let mut world = InteractionWorld::default();
        let entity = world.scene.spawn("flatscreen hand", Transform::IDENTITY);
        let config = FlatscreenConfig {
            camera_position: Vec3::ZERO,
            ..FlatscreenConfig::default()
        };
        let hand = FlatscreenHand::new(
            entity,
            HandConfig::default(),
            &config,
            &GrabLayers::default(),
        );
        (world, hand)
    }

    fn center(hand: &FlatscreenHand) -> Vec2 {
        hand.camera.viewport_center()
    }

    #[test]
    fn test_reach_clamps_remembered_distance() {
        let mut reach = RaycastReach::new(3.0);
        assert_eq!(reach.last_hit_distance(), 3.0);

        reach.record_hit(2.5);
        reach.set_max_distance(1.0);
        assert_eq!(reach.last_hit_distance(), 1.0);

        reach.set_max_distance(4.0);
        assert_eq!(reach.last_hit_distance(), 1.0);
        assert_eq!(reach.max_distance(), 4.0);

        reach.restore_default();
        assert_eq!(reach.max_distance(), 3.0);
    }

    #[test]
    fn test_hit_places_hand_at_hit_point() {
        let (mut world, mut hand) = setup();
        let wall = world
            .scene
            .spawn("wall", Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        world.add_collider(wall, Shape::cube(1.0)).unwrap();
        world.refresh();

        hand.update_pose(&mut world, center(&hand));

        let position = world.scene.world_position(hand.entity()).unwrap();
        assert!((position - Vec3::new(0.0, 0.0, -1.5)).length() < EPS);
        assert!((hand.reach().last_hit_distance() - 1.5).abs() < EPS);

        // Faces away from the camera
        let forward = world.scene.world_transform(hand.entity()).unwrap().forward();
        assert!((forward - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_miss_keeps_remembered_distance() {
        let (mut world, mut hand) = setup();
        let wall = world
            .scene
            .spawn("wall", Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        world.add_collider(wall, Shape::cube(1.0)).unwrap();
        world.refresh();
        hand.update_pose(&mut world, center(&hand));

        world.despawn(wall);
        world.refresh();
        let cursor = Vec2::new(100.0, 80.0);
        hand.update_pose(&mut world, cursor);

        let ray = hand.camera.screen_point_to_ray(cursor);
        let position = world.scene.world_position(hand.entity()).unwrap();
        assert!((position - (ray.origin + ray.direction * 1.5)).length() < EPS);
    }

    #[test]
    fn test_miss_before_any_hit_uses_default_reach() {
        let (mut world, mut hand) = setup();
        hand.update_pose(&mut world, center(&hand));

        let position = world.scene.world_position(hand.entity()).unwrap();
        assert!((position - Vec3::new(0.0, 0.0, -3.0)).length() < EPS);
    }

    #[test]
    fn test_hits_beyond_reach_are_ignored() {
        let (mut world, mut hand) = setup();
        let wall = world
            .scene
            .spawn("wall", Transform::from_translation(Vec3::new(0.0, 0.0, -10.0)));
        world.add_collider(wall, Shape::cube(1.0)).unwrap();
        world.refresh();

        hand.update_pose(&mut world, center(&hand));
        assert_eq!(hand.reach().last_hit_distance(), 3.0);
    }

    #[test]
    fn test_grab_with_reach_override() {
        let (mut world, mut hand) = setup();
        let crate_entity = world
            .scene
            .spawn("crate", Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)));
        world.add_collider(crate_entity, Shape::cube(0.5)).unwrap();
        world.add_grabbable(crate_entity, Some(1.0)).unwrap();
        world.refresh();

        hand.update_pose(&mut world, center(&hand));
        world.refresh();
        hand.update_use_states(&SignalFrame::press(InteractionKind::Grab), &mut world);

        assert_eq!(hand.hand.held(InteractionKind::Grab), Some(crate_entity));
        assert_eq!(hand.reach().max_distance(), 1.0);
        assert_eq!(hand.reach().last_hit_distance(), 1.0);

        // Held crate is on the grabbed layer, so the cursor ray passes through it
        world.refresh();
        hand.update_pose(&mut world, center(&hand));
        let position = world.scene.world_position(hand.entity()).unwrap();
        assert!((position - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
    }

    #[test]
    fn test_tick_reads_desktop_buttons() {
        let (mut world, mut hand) = setup();
        let button = world
            .scene
            .spawn("button", Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)));
        world.add_collider(button, Shape::cube(0.2)).unwrap();
        world.add_usable(button).unwrap();
        world.refresh();

        let mut desktop = DesktopInput::new();
        desktop.set_cursor(center(&hand));
        desktop.press(DesktopButton::Mouse(MouseButton::Left));

        hand.tick(&mut world, &desktop, None, &BindingsConfig::default());
        assert_eq!(hand.hand.held(InteractionKind::Use), Some(button));
    }

    #[test]
    fn test_mask_always_skips_configured_grabbed_layer() {
        let layers = GrabLayers {
            grabbable: grasp_core::Layer::new(10).unwrap(),
            grabbed: grasp_core::Layer::new(11).unwrap(),
        };
        let mut world = InteractionWorld::default();
        let entity = world.scene.spawn("flatscreen hand", Transform::IDENTITY);
        let hand = FlatscreenHand::new(
            entity,
            HandConfig::default(),
            &FlatscreenConfig::default(),
            &layers,
        );
        assert!(!hand.raycast_mask.contains(layers.grabbed));
        assert!(hand.raycast_mask.contains(layers.grabbable));
    }
}
