//! Interaction testbed
//!
//! Builds a small scene (a cup with a handle, a lamp and a crate) and drives
//! the interaction session with a scripted input timeline, either through
//! tracked hands or through the flatscreen cursor.

pub mod scenario;

pub use scenario::{Scenario, ScenarioMode, ScenarioReport};
