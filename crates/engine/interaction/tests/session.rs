//! Full-tick sessions: runtime start-up, tracked and flatscreen play

use devices::{
    DesktopButton, DesktopInput, Handedness, MouseButton, NullBackend, Pose, ScriptedBackend,
    XrInitState,
};
use glam::{Vec2, Vec3};
use grasp_core::{EntityId, Layer, Transform};
use grasp_physics::Shape;
use interaction::{
    GrabLayers, InteractionConfig, InteractionEvent, InteractionKind, PlayerMode, Session,
};
use std::io::Write;

fn session() -> Session {
    Session::new(InteractionConfig::default()).unwrap()
}

fn spawn_grabbable(session: &mut Session, position: Vec3, reach: Option<f32>) -> EntityId {
    let world = &mut session.world;
    let entity = world.scene.spawn("crate", Transform::from_translation(position));
    world.add_collider(entity, Shape::cube(0.2)).unwrap();
    world.add_grabbable(entity, reach).unwrap();
    entity
}

#[test]
fn test_tracked_grab_carry_and_toggle_release() {
    let mut session = session();
    let crate_entity = spawn_grabbable(&mut session, Vec3::new(0.3, 1.0, -0.3), None);
    let desktop = DesktopInput::new();

    let mut backend = ScriptedBackend::new().initializing_for(2, XrInitState::Success);
    backend.set_pose(Handedness::Right, Pose::at(Vec3::new(0.3, 1.0, -0.2)));

    session.tick(&mut backend, &desktop);
    assert_eq!(session.player.mode(), PlayerMode::WaitingForRuntime);

    backend.queue_press(Handedness::Right, "GrabGrip");
    session.tick(&mut backend, &desktop);
    assert_eq!(session.player.mode(), PlayerMode::Tracked);

    let right = session.player.hand(Handedness::Right).entity();
    assert_eq!(session.player.hand(Handedness::Right).held(InteractionKind::Grab), Some(crate_entity));
    assert!(session.world.scene.is_attached_to(crate_entity, right));

    // Carry: the crate ends each tick at the hand
    backend.queue_release(Handedness::Right, "GrabGrip");
    backend.set_pose(Handedness::Right, Pose::at(Vec3::new(1.0, 1.5, 0.0)));
    session.tick(&mut backend, &desktop);
    assert_eq!(session.world.scene.world_position(crate_entity), Some(Vec3::new(1.0, 1.5, 0.0)));
    assert_eq!(session.player.hand(Handedness::Right).held(InteractionKind::Grab), None);
    assert!(session.world.grabbable(crate_entity).unwrap().is_grabbed());

    // Next grab press lets go
    backend.queue_press(Handedness::Right, "GrabGrip");
    session.tick(&mut backend, &desktop);
    assert!(!session.world.grabbable(crate_entity).unwrap().is_grabbed());
    assert!(session.world.scene.attachment(crate_entity).is_none());

    let events = session.world.events.drain();
    assert_eq!(
        events,
        vec![
            InteractionEvent::Grabbed { entity: crate_entity, hand: right },
            InteractionEvent::Released { entity: crate_entity, hand: right },
        ]
    );
}

#[test]
fn test_hands_are_independent() {
    let mut session = session();
    let left_crate = spawn_grabbable(&mut session, Vec3::new(-0.3, 1.0, 0.0), None);
    let right_crate = spawn_grabbable(&mut session, Vec3::new(0.3, 1.0, 0.0), None);

    let mut backend = ScriptedBackend::ready();
    backend.set_pose(Handedness::Left, Pose::at(Vec3::new(-0.3, 1.0, 0.05)));
    backend.set_pose(Handedness::Right, Pose::at(Vec3::new(0.3, 1.0, 0.05)));
    backend.queue_press(Handedness::Left, "GrabGrip");
    backend.queue_press(Handedness::Right, "GrabGrip");
    session.tick(&mut backend, &DesktopInput::new());

    let player = &session.player;
    assert_eq!(player.hand(Handedness::Left).held(InteractionKind::Grab), Some(left_crate));
    assert_eq!(player.hand(Handedness::Right).held(InteractionKind::Grab), Some(right_crate));
}

#[test]
fn test_flatscreen_grab_with_mouse() {
    let mut session = session();
    let camera = session.player.flatscreen().camera;
    let target = camera.position + Vec3::new(0.0, 0.0, -2.0);
    let crate_entity = spawn_grabbable(&mut session, target, Some(1.0));

    let mut backend = NullBackend::new();
    let mut desktop = DesktopInput::new();
    desktop.set_cursor(camera.viewport_center());
    desktop.press(DesktopButton::Mouse(MouseButton::Right));

    session.tick(&mut backend, &desktop);
    assert_eq!(session.player.mode(), PlayerMode::Flatscreen);

    let flatscreen = session.player.flatscreen();
    assert_eq!(flatscreen.hand.held(InteractionKind::Grab), Some(crate_entity));
    assert_eq!(flatscreen.reach().max_distance(), 1.0);

    // Held crate is skipped by the cursor ray; the hand sits at the clamped reach
    desktop.update();
    desktop.release(DesktopButton::Mouse(MouseButton::Right));
    session.tick(&mut backend, &desktop);

    let hand_position = session.world.scene.world_position(session.player.flatscreen().entity()).unwrap();
    assert!((hand_position - (camera.position + Vec3::new(0.0, 0.0, -1.0))).length() < 1e-4);
    let crate_position = session.world.scene.world_position(crate_entity).unwrap();
    assert!((crate_position - hand_position).length() < 1e-4);

    // Second right click releases and restores the default reach
    desktop.update();
    desktop.press(DesktopButton::Mouse(MouseButton::Right));
    session.tick(&mut backend, &desktop);
    assert!(!session.world.grabbable(crate_entity).unwrap().is_grabbed());
    assert_eq!(session.player.flatscreen().reach().max_distance(), 3.0);
}

#[test]
fn test_flatscreen_held_crate_stays_put_with_custom_layers() {
    let mut config = InteractionConfig::default();
    config.layers = GrabLayers {
        grabbable: Layer::new(10).unwrap(),
        grabbed: Layer::new(11).unwrap(),
    };
    config.flatscreen.camera_position = Vec3::ZERO;
    let mut session = Session::new(config).unwrap();
    let crate_entity = spawn_grabbable(&mut session, Vec3::new(0.0, 0.0, -2.0), None);
    let camera = session.player.flatscreen().camera;

    let mut backend = NullBackend::new();
    let mut desktop = DesktopInput::new();
    desktop.set_cursor(camera.viewport_center());
    desktop.press(DesktopButton::Mouse(MouseButton::Right));
    session.tick(&mut backend, &desktop);
    assert!(session.world.grabbable(crate_entity).unwrap().is_grabbed());
    assert_eq!(session.world.scene.layer(crate_entity), Some(Layer::new(11).unwrap()));

    desktop.update();
    desktop.release(DesktopButton::Mouse(MouseButton::Right));
    session.tick(&mut backend, &desktop);
    let start = session.world.scene.world_position(crate_entity).unwrap();

    for _ in 0..6 {
        desktop.update();
        session.tick(&mut backend, &desktop);
        let position = session.world.scene.world_position(crate_entity).unwrap();
        assert!((position - start).length() < 1e-4, "crate moved to {:?}", position);
    }
}

#[test]
fn test_flatscreen_use_with_left_click() {
    let mut session = session();
    let camera = session.player.flatscreen().camera;
    let button = session
        .world
        .scene
        .spawn("button", Transform::from_translation(camera.position + Vec3::new(0.0, 0.0, -1.5)));
    session.world.add_collider(button, Shape::cube(0.2)).unwrap();
    session.world.add_usable(button).unwrap();

    let mut backend = NullBackend::new();
    let mut desktop = DesktopInput::new();
    desktop.set_cursor(camera.viewport_center());
    desktop.press(DesktopButton::Mouse(MouseButton::Left));
    session.tick(&mut backend, &desktop);

    desktop.update();
    desktop.release(DesktopButton::Mouse(MouseButton::Left));
    session.tick(&mut backend, &desktop);

    let hand = session.player.flatscreen().entity();
    assert_eq!(
        session.world.events.drain(),
        vec![
            InteractionEvent::Used { entity: button, hand },
            InteractionEvent::Unused { entity: button, hand },
        ]
    );
}

#[test]
fn test_cursor_off_target_grabs_nothing() {
    let mut session = session();
    let camera = session.player.flatscreen().camera;
    spawn_grabbable(&mut session, camera.position + Vec3::new(0.0, 0.0, -2.0), None);

    let mut backend = NullBackend::new();
    let mut desktop = DesktopInput::new();
    desktop.set_cursor(Vec2::new(5.0, 5.0));
    desktop.press(DesktopButton::Mouse(MouseButton::Right));
    session.tick(&mut backend, &desktop);

    assert_eq!(session.player.flatscreen().hand.held(InteractionKind::Grab), None);
    assert!(session.world.events.pending().is_empty());
}

#[test]
fn test_despawned_held_entity_is_forgotten() {
    let mut session = session();
    let crate_entity = spawn_grabbable(&mut session, Vec3::new(0.0, 1.0, 0.0), None);

    let mut backend = ScriptedBackend::ready();
    backend.set_pose(Handedness::Right, Pose::at(Vec3::new(0.0, 1.0, 0.05)));
    backend.queue_press(Handedness::Right, "GrabGrip");
    session.tick(&mut backend, &DesktopInput::new());
    session.world.events.drain();

    session.world.despawn(crate_entity);
    session.tick(&mut backend, &DesktopInput::new());

    assert_eq!(session.player.hand(Handedness::Right).held(InteractionKind::Grab), None);
    assert!(session.world.events.pending().is_empty());
}

#[test]
fn test_session_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [hand]
        use_collision_radius = 0.5

        [bindings.tracked]
        grab = "Trigger"
        "#
    )
    .unwrap();

    let config = InteractionConfig::from_file(file.path()).unwrap();
    let mut session = Session::new(config).unwrap();
    let crate_entity = spawn_grabbable(&mut session, Vec3::new(0.0, 1.0, -0.4), None);

    let mut backend = ScriptedBackend::ready();
    backend.set_pose(Handedness::Left, Pose::at(Vec3::new(0.0, 1.0, 0.0)));
    backend.queue_press(Handedness::Left, "GrabGrip");
    session.tick(&mut backend, &DesktopInput::new());
    assert_eq!(session.player.hand(Handedness::Left).held(InteractionKind::Grab), None);

    backend.queue_press(Handedness::Left, "Trigger");
    session.tick(&mut backend, &DesktopInput::new());
    assert_eq!(session.player.hand(Handedness::Left).held(InteractionKind::Grab), Some(crate_entity));
}
