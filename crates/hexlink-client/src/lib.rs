//! Client
//!
//! Action-based client for the hexlink protocol. Mirrors the authoritative
//! game state, answers the server's handshake and feedback requests, and
//! tells the presentation layer what changed.
//!
//! # Architecture
//!
//! The [`Client`] follows the same Sans-IO pattern as [`hexlink_core`]. It
//! receives events ([`ClientEvent`]), runs them through the handler for
//! each message, and returns actions ([`ClientAction`]) for the caller to
//! execute. Nothing in it awaits or touches a socket.
//!
//! The runtime around it is three pieces:
//!
//! - [`transport`]: framed byte channels ([`TcpTransport`],
//!   [`ChannelTransport`])
//! - [`pump`]: one task per connection moving frames in and out
//! - [`session`]: the actor owning the [`Client`], executing its actions
//!
//! # Components
//!
//! - [`outbound`]: builders for every player-initiated message
//! - [`commands`]: the local `#command` surface
//! - [`gamelog`]: HTML game log and end-of-game files
//! - [`ClientConfig`]: per-session settings

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
pub mod commands;
mod config;
mod error;
mod event;
mod feedback;
pub mod gamelog;
pub mod outbound;
pub mod pump;
pub mod session;
pub mod transport;

pub use client::Client;
pub use commands::{ClientCommand, CommandContext, CommandOutput, CommandRegistry};
pub use config::ClientConfig;
pub use error::{ClientError, SessionError, TransportError};
pub use event::{ClientAction, ClientEvent, GameLogEntry};
pub use feedback::FeedbackTracker;
pub use hexlink_core::{GameEvent, GameState, ReportKind, SettingsKind};
pub use session::{Decider, HumanDecider, Session, SessionHandle, SessionSender};
pub use transport::{ChannelPeer, ChannelTransport, TcpTransport, Transport};
