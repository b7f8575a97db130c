//! Interrogation engine for a murder-mystery questioning game.
//!
//! - `game` - dialogue scripts, session state, action resolver, snapshots
//! - `command` - console input parsing for the terminal front-end

pub mod command;
pub mod game;

pub use game::engine::{EngineConfig, Interrogation};
pub use game::node::ActionKind;
pub use game::snapshot::Snapshot;
