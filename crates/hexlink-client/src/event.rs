//! Client events and actions.

use hexlink_core::GameEvent;
use hexlink_proto::{ClientPayload, Frame};

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Receiving frames from the network
/// - Reporting transport loss
/// - Forwarding a local request to leave
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Frame received from the server.
    FrameReceived(Frame),

    /// The transport went away underneath the session.
    TransportClosed,

    /// The local user or runtime wants to leave.
    CloseRequested,
}

/// Change to the HTML game log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameLogEntry {
    /// Truncate the log and write the document preamble.
    Start,
    /// Append text to the log.
    Append(String),
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientAction {
    /// Send a payload to the server.
    Send(ClientPayload),

    /// Tell the presentation layer (and any decider) what changed.
    Notify(GameEvent),

    /// Update the game log.
    GameLog(GameLogEntry),

    /// Write the end-of-game entity status to the log directory.
    PersistEntityStatus(String),

    /// Drop caches only the lobby needs.
    ReleaseLobbyCaches,

    /// Load caches the lobby needs.
    LoadLobbyCaches,

    /// The session is over; stop the pump and release the transport.
    Disconnect,
}

impl ClientAction {
    /// Payload to send, if this is a send action.
    #[must_use]
    pub fn as_send(&self) -> Option<&ClientPayload> {
        match self {
            Self::Send(payload) => Some(payload),
            _ => None,
        }
    }

    /// Notification, if this is a notify action.
    #[must_use]
    pub fn as_notify(&self) -> Option<&GameEvent> {
        match self {
            Self::Notify(event) => Some(event),
            _ => None,
        }
    }
}
