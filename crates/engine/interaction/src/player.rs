//! Player: chooses tracked or flatscreen hands once the XR runtime settles

use crate::config::{BindingsConfig, InteractionConfig};
use crate::flatscreen::FlatscreenHand;
use crate::hand::Hand;
use crate::input::TrackedInput;
use crate::world::InteractionWorld;
use devices::{DesktopInput, Handedness, XrBackend, XrInitState};
use grasp_core::Transform;
use std::fmt;
use tracing::{info, trace};

/// Which hands the player drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerMode {
    /// XR runtime not settled yet; no hand is ticked
    #[default]
    WaitingForRuntime,
    /// Left and right hands posed by the XR runtime
    Tracked,
    /// Cursor-ray hand driven by mouse and keyboard
    Flatscreen,
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForRuntime => write!(f, "waiting for runtime"),
            Self::Tracked => write!(f, "tracked"),
            Self::Flatscreen => write!(f, "flatscreen"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    mode: PlayerMode,
    left: Hand,
    right: Hand,
    flatscreen: FlatscreenHand,
    bindings: BindingsConfig,
}

impl Player {
    /// Spawn the hand entities and set up both hand modes
    pub fn new(world: &mut InteractionWorld, config: &InteractionConfig) -> Self {
        let left = world.scene.spawn("LeftHand", Transform::IDENTITY);
        let right = world.scene.spawn("RightHand", Transform::IDENTITY);
        let flatscreen = world.scene.spawn("FlatscreenHand", Transform::IDENTITY);

        Self {
            mode: PlayerMode::WaitingForRuntime,
            left: Hand::new(left, config.hand),
            right: Hand::new(right, config.hand),
            flatscreen: FlatscreenHand::new(
                flatscreen,
                config.hand,
                &config.flatscreen,
                &config.layers,
            ),
            bindings: config.bindings.clone(),
        }
    }

    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    pub fn flatscreen(&self) -> &FlatscreenHand {
        &self.flatscreen
    }

    pub fn flatscreen_mut(&mut self) -> &mut FlatscreenHand {
        &mut self.flatscreen
    }

    /// Hands ticked in the current mode
    pub fn active_hands(&self) -> Vec<&Hand> {
        match self.mode {
            PlayerMode::WaitingForRuntime => Vec::new(),
            PlayerMode::Tracked => vec![&self.left, &self.right],
            PlayerMode::Flatscreen => vec![&self.flatscreen.hand],
        }
    }

    /// Pick a mode once the runtime reports a final state. Returns true when
    /// the mode changed.
    pub fn select_mode(&mut self, state: XrInitState) -> bool {
        if self.mode != PlayerMode::WaitingForRuntime {
            return false;
        }
        self.mode = match state {
            XrInitState::Success => PlayerMode::Tracked,
            XrInitState::Failed => PlayerMode::Flatscreen,
            XrInitState::NotStarted | XrInitState::Initializing => {
                trace!("Waiting for XR runtime ({:?})", state);
                return false;
            }
        };
        info!("XR runtime {:?}, using {} hands", state, self.mode);
        true
    }

    /// Select a mode if still waiting, then drive the active hands: poses
    /// first, then use states.
    pub fn update(
        &mut self,
        world: &mut InteractionWorld,
        backend: &dyn XrBackend,
        desktop: &DesktopInput,
    ) {
        self.select_mode(backend.init_state());

        match self.mode {
            PlayerMode::WaitingForRuntime => {}
            PlayerMode::Tracked => {
                for handedness in Handedness::BOTH {
                    // Lost tracking keeps the previous pose
                    if let Some(pose) = backend.hand_pose(handedness) {
                        let hand = self.hand(handedness);
                        hand.apply_pose(world, pose.position, pose.rotation);
                    }
                }
                world.refresh();

                for handedness in Handedness::BOTH {
                    let input = TrackedInput::new(backend.actions(handedness), &self.bindings.tracked);
                    let hand = match handedness {
                        Handedness::Left => &mut self.left,
                        Handedness::Right => &mut self.right,
                    };
                    hand.update_use_states(&input, world, None);
                }
            }
            PlayerMode::Flatscreen => {
                let actions = backend.actions(Handedness::Right);
                self.flatscreen.tick(world, desktop, actions, &self.bindings);
            }
        }
    }
}
