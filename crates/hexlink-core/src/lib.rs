//! Sans-IO core of the hexlink client.
//!
//! Nothing in this crate touches a socket or spawns a task. The
//! [`Connection`] turns frames into bytes and bytes into frames, the
//! [`GameState`] mirrors the authoritative server state, [`NameTracker`]
//! keeps display names distinguishable, and [`phase`] describes what a phase
//! transition asks the runtime to do. The client crate drives all of them
//! from a single task.

pub mod connection;
pub mod error;
pub mod event;
pub mod game;
pub mod names;
pub mod phase;

pub use connection::{Connection, ConnectionState, DisconnectLatch};
pub use error::ConnectionError;
pub use event::{GameEvent, ReportKind, SettingsKind};
pub use game::GameState;
pub use names::NameTracker;
pub use phase::PhaseEffect;
