//! XR runtime backend trait and implementations
//!
//! The backend is the interaction core's window onto the tracking runtime:
//! its initialisation state, per-hand poses and per-hand named actions.
//!
//! # Example
//!
//! ```ignore
//! let mut backend = create_xr_backend();
//!
//! // In your game loop:
//! backend.poll();
//!
//! if backend.init_state() == XrInitState::Success {
//!     if let Some(pose) = backend.hand_pose(Handedness::Left) {
//!         // Place the left hand
//!     }
//! }
//! ```

use crate::action::{ActionSet, Handedness, Pose};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Initialisation state of the XR runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XrInitState {
    /// Initialisation has not begun
    #[default]
    NotStarted,
    /// Initialisation is in progress
    Initializing,
    /// Runtime is up; tracked input is available
    Success,
    /// Runtime could not start; no tracked input this session
    Failed,
}

impl XrInitState {
    /// Whether the state is final (success or failure)
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// Trait for XR runtime backends
///
/// Implementations are polled once per tick before any hand reads input.
pub trait XrBackend {
    /// Process pending runtime events and start a new input frame
    fn poll(&mut self);

    /// Current initialisation state
    fn init_state(&self) -> XrInitState;

    /// Latest tracked pose of a hand, `None` while tracking is lost
    fn hand_pose(&self, hand: Handedness) -> Option<Pose>;

    /// Named actions of the controller in `hand`
    fn actions(&self, hand: Handedness) -> Option<&ActionSet>;

    /// Whether tracked input can be used
    fn is_available(&self) -> bool {
        self.init_state() == XrInitState::Success
    }
}

/// Backend for builds without an XR runtime.
///
/// Reports [`XrInitState::Failed`] immediately so the flatscreen fallback
/// is selected.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        Self
    }
}

impl XrBackend for NullBackend {
    fn poll(&mut self) {
        // No-op
    }

    fn init_state(&self) -> XrInitState {
        XrInitState::Failed
    }

    fn hand_pose(&self, _hand: Handedness) -> Option<Pose> {
        None
    }

    fn actions(&self, _hand: Handedness) -> Option<&ActionSet> {
        None
    }
}

#[derive(Debug, Clone)]
struct QueuedAction {
    hand: Handedness,
    action: String,
    down: bool,
}

/// Backend driven by a script instead of a runtime.
///
/// Used by the testbed and tests: initialisation outcome, poses and action
/// edges are queued up front and applied on [`poll`](XrBackend::poll).
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    state: XrInitState,
    pending_init: Option<(u32, XrInitState)>,
    poses: [Option<Pose>; 2],
    actions: [ActionSet; 2],
    queued: Vec<QueuedAction>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that is already initialised successfully
    pub fn ready() -> Self {
        Self {
            state: XrInitState::Success,
            ..Self::default()
        }
    }

    /// Enter `Initializing` and settle on `outcome` after `polls` polls
    /// (at least one).
    pub fn initializing_for(mut self, polls: u32, outcome: XrInitState) -> Self {
        self.state = XrInitState::Initializing;
        self.pending_init = Some((polls, outcome));
        self
    }

    pub fn set_state(&mut self, state: XrInitState) {
        self.state = state;
        self.pending_init = None;
    }

    pub fn set_pose(&mut self, hand: Handedness, pose: Pose) {
        self.poses[Self::slot(hand)] = Some(pose);
    }

    pub fn clear_pose(&mut self, hand: Handedness) {
        self.poses[Self::slot(hand)] = None;
    }

    /// Queue an action press, visible after the next poll
    pub fn queue_press(&mut self, hand: Handedness, action: &str) {
        self.queued.push(QueuedAction {
            hand,
            action: action.to_string(),
            down: true,
        });
    }

    /// Queue an action release, visible after the next poll
    pub fn queue_release(&mut self, hand: Handedness, action: &str) {
        self.queued.push(QueuedAction {
            hand,
            action: action.to_string(),
            down: false,
        });
    }

    fn slot(hand: Handedness) -> usize {
        match hand {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }
}

impl XrBackend for ScriptedBackend {
    fn poll(&mut self) {
        if let Some((remaining, outcome)) = self.pending_init {
            if remaining <= 1 {
                debug!("Scripted XR runtime settled: {:?}", outcome);
                self.state = outcome;
                self.pending_init = None;
            } else {
                self.pending_init = Some((remaining - 1, outcome));
            }
        }

        for actions in &mut self.actions {
            actions.update();
        }
        for queued in self.queued.drain(..) {
            let actions = &mut self.actions[Self::slot(queued.hand)];
            if queued.down {
                actions.press(&queued.action);
            } else {
                actions.release(&queued.action);
            }
        }
    }

    fn init_state(&self) -> XrInitState {
        self.state
    }

    fn hand_pose(&self, hand: Handedness) -> Option<Pose> {
        self.poses[Self::slot(hand)]
    }

    fn actions(&self, hand: Handedness) -> Option<&ActionSet> {
        Some(&self.actions[Self::slot(hand)])
    }
}
