//! Scripted scene and input timelines

use anyhow::{Context, Result};
use devices::{
    create_xr_backend, DesktopButton, DesktopInput, Handedness, MouseButton, Pose,
    ScriptedBackend, XrBackend, XrInitState,
};
use glam::Vec3;
use grasp_core::{EntityId, Transform};
use grasp_physics::Shape;
use interaction::{InteractionConfig, InteractionEvent, InteractionWorld, PlayerMode, Session};
use tracing::{debug, info};

/// Which input timeline to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioMode {
    /// Use the platform XR backend and the desktop timeline
    Auto,
    /// Scripted runtime that comes up; both tracked hands play
    Tracked,
    /// Scripted runtime that fails; the cursor plays
    Flatscreen,
}

const CUP: Vec3 = Vec3::new(0.3, 1.2, -0.6);
const LAMP: Vec3 = Vec3::new(-0.5, 1.4, -1.5);
const CRATE: Vec3 = Vec3::new(0.0, 1.6, -2.0);

/// Ticks the scripted runtime spends initialising
const INIT_POLLS: u32 = 3;

#[derive(Debug, Clone, Copy)]
struct Props {
    cup: EntityId,
    lamp: EntityId,
    crate_box: EntityId,
}

enum Backend {
    Scripted(ScriptedBackend),
    Runtime(Box<dyn XrBackend>),
}

impl Backend {
    fn as_dyn(&mut self) -> &mut dyn XrBackend {
        match self {
            Backend::Scripted(backend) => backend,
            Backend::Runtime(backend) => backend.as_mut(),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub ticks: u32,
    pub mode: PlayerMode,
    /// Events with the tick they happened in
    pub events: Vec<(u32, InteractionEvent)>,
}

pub struct Scenario {
    session: Session,
    backend: Backend,
    desktop: DesktopInput,
    props: Props,
    tick: u32,
}

impl Scenario {
    pub fn new(config: InteractionConfig, mode: ScenarioMode) -> Result<Self> {
        let mut session = Session::new(config).context("Failed to start interaction session")?;
        let props = build_scene(&mut session.world).context("Failed to build scene")?;

        let backend = match mode {
            ScenarioMode::Auto => Backend::Runtime(create_xr_backend()),
            ScenarioMode::Tracked => Backend::Scripted(
                ScriptedBackend::new().initializing_for(INIT_POLLS, XrInitState::Success),
            ),
            ScenarioMode::Flatscreen => Backend::Scripted(
                ScriptedBackend::new().initializing_for(INIT_POLLS, XrInitState::Failed),
            ),
        };

        Ok(Self {
            session,
            backend,
            desktop: DesktopInput::new(),
            props,
            tick: 0,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply this tick's script, advance the session and return its events
    pub fn step(&mut self) -> Vec<InteractionEvent> {
        self.desktop.update();
        match self.session.player.mode() {
            PlayerMode::WaitingForRuntime => {}
            PlayerMode::Tracked => self.script_tracked(),
            PlayerMode::Flatscreen => self.script_flatscreen(),
        }
        if let Backend::Scripted(backend) = &mut self.backend {
            script_tracked_poses(backend, self.tick);
        }

        self.session.tick(self.backend.as_dyn(), &self.desktop);
        self.tick += 1;

        let events = self.session.world.events.drain();
        for event in &events {
            info!("tick {:>3}: {:?}", self.tick - 1, event);
        }
        events
    }

    pub fn run(&mut self, ticks: u32) -> ScenarioReport {
        let mut events = Vec::new();
        for _ in 0..ticks {
            let tick = self.tick;
            events.extend(self.step().into_iter().map(|e| (tick, e)));
        }
        ScenarioReport {
            ticks: self.tick,
            mode: self.session.player.mode(),
            events,
        }
    }

    /// Right hand grabs the cup, carries it and drops it; left hand uses the
    /// lamp, then uses it again and walks away
    fn script_tracked(&mut self) {
        let Backend::Scripted(backend) = &mut self.backend else {
            return;
        };
        let (right, left) = (Handedness::Right, Handedness::Left);
        match self.tick {
            7 | 15 => backend.queue_press(right, "GrabGrip"),
            8 | 16 => backend.queue_release(right, "GrabGrip"),
            4 | 10 => backend.queue_press(left, "GrabPinch"),
            6 => backend.queue_release(left, "GrabPinch"),
            _ => {}
        }
    }

    /// Cursor clicks the lamp, then grabs the crate, sweeps it sideways and
    /// drops it
    fn script_flatscreen(&mut self) {
        let camera = self.session.player.flatscreen().camera;
        let lamp = camera.world_to_screen_point(LAMP + Vec3::Z * 0.05);
        let crate_center = camera.world_to_screen_point(CRATE);

        match self.tick {
            3 => {
                if let Some(point) = lamp {
                    self.desktop.set_cursor(point);
                }
            }
            4 => self.desktop.press(DesktopButton::Mouse(MouseButton::Left)),
            5 => self.desktop.release(DesktopButton::Mouse(MouseButton::Left)),
            6 => {
                if let Some(point) = crate_center {
                    self.desktop.set_cursor(point);
                }
            }
            7 | 13 => self.desktop.press(DesktopButton::Mouse(MouseButton::Right)),
            8 | 14 => self.desktop.release(DesktopButton::Mouse(MouseButton::Right)),
            9..=12 => {
                let cursor = self.desktop.cursor + glam::Vec2::new(40.0, 0.0);
                self.desktop.set_cursor(cursor);
            }
            _ => {}
        }
        debug!("Cursor at {:?}", self.desktop.cursor);
    }

    pub fn cup(&self) -> EntityId {
        self.props.cup
    }

    pub fn lamp(&self) -> EntityId {
        self.props.lamp
    }

    pub fn crate_box(&self) -> EntityId {
        self.props.crate_box
    }
}

/// Hand poses of the tracked timeline; harmless while another mode plays
fn script_tracked_poses(backend: &mut ScriptedBackend, tick: u32) {
    let reach_start = CUP + Vec3::new(0.0, 0.2, 0.3);
    let at_cup = CUP + Vec3::new(0.0, 0.0, 0.03);
    let carry_to = Vec3::new(0.0, 1.3, -0.2);

    let right = match tick {
        0..=2 => reach_start,
        3..=6 => reach_start.lerp(at_cup, (tick - 2) as f32 / 4.0),
        7..=8 => at_cup,
        9..=14 => at_cup.lerp(carry_to, (tick - 8) as f32 / 6.0),
        _ => carry_to,
    };
    backend.set_pose(Handedness::Right, Pose::at(right));

    let at_lamp = LAMP + Vec3::new(0.0, 0.0, 0.06);
    let left = match tick {
        0..=11 => at_lamp,
        _ => at_lamp + Vec3::new(0.0, -0.1 * (tick - 11).min(5) as f32, 0.3),
    };
    backend.set_pose(Handedness::Left, Pose::at(left));
}

fn build_scene(world: &mut InteractionWorld) -> interaction::Result<Props> {
    let cup = world.scene.spawn("cup", Transform::from_translation(CUP));
    world.add_collider(cup, Shape::Sphere { radius: 0.04 })?;
    let handle = world
        .scene
        .spawn_child(cup, "cup handle", Transform::from_translation(Vec3::X * 0.05))
        .ok_or(interaction::Error::UnknownEntity(cup))?;
    world.add_collider(handle, Shape::Sphere { radius: 0.015 })?;
    world.add_grabbable(cup, None)?;

    let lamp = world.scene.spawn("lamp", Transform::from_translation(LAMP));
    world.add_collider(lamp, Shape::cube(0.1))?;
    world.add_usable(lamp)?;

    let crate_box = world.scene.spawn("crate", Transform::from_translation(CRATE));
    world.add_collider(crate_box, Shape::cube(0.4))?;
    world.add_grabbable(crate_box, Some(1.0))?;

    debug!("Scene has {} entities", world.scene.len());
    Ok(Props {
        cup,
        lamp,
        crate_box,
    })
}
