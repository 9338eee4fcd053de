//! Client, transport and session errors.

use std::io;

use hexlink_core::ConnectionError;
use hexlink_proto::{ProtocolError, model::FeedbackKind};
use thiserror::Error;

/// Errors raised by the client state machine and its command surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Encoding or decoding a payload failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A feedback answer arrived with nothing to answer.
    #[error("no outstanding {0:?} request")]
    NoOutstandingRequest(FeedbackKind),

    /// A local command name is not registered.
    #[error("unknown client command: {name}")]
    UnknownCommand {
        /// Name as typed, without the `#` prefix.
        name: String,
    },

    /// The session has not completed its handshake, or has ended.
    #[error("not connected")]
    NotConnected,
}

impl ClientError {
    /// Whether the session cannot continue after this error.
    ///
    /// Only protocol errors on the stream are fatal; a bad local command or
    /// a stray feedback answer leaves the session intact.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Protocol(err) => err.is_stream_fatal(),
            Self::NoOutstandingRequest(_) | Self::UnknownCommand { .. } | Self::NotConnected => {
                false
            },
        }
    }
}

/// Errors raised by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Socket failure.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The transport was closed locally or by the peer.
    #[error("transport closed")]
    Closed,

    /// The byte stream could not be framed.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<ConnectionError> for TransportError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::Closed => Self::Closed,
            ConnectionError::Protocol(reason) => Self::Protocol(reason),
            other @ ConnectionError::InvalidState { .. } => Self::Protocol(other.to_string()),
        }
    }
}

/// Errors that end or prevent a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The transport could not reach the server.
    #[error("failed to connect to {address}")]
    ConnectFailed {
        /// Address that was dialed.
        address: String,
    },

    /// The other end of a session channel went away.
    #[error("session channel closed")]
    ChannelClosed,

    /// The client refused a request.
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stream_errors_are_fatal() {
        assert!(ClientError::Protocol(ProtocolError::InvalidMagic).is_fatal());
        assert!(!ClientError::Protocol(ProtocolError::UnknownCommand(0x7f7f)).is_fatal());
        assert!(!ClientError::NoOutstandingRequest(FeedbackKind::TagTarget).is_fatal());
        assert!(!ClientError::UnknownCommand { name: "frobnicate".into() }.is_fatal());
        assert!(!ClientError::NotConnected.is_fatal());
    }

    #[test]
    fn connection_closed_maps_to_transport_closed() {
        assert!(matches!(TransportError::from(ConnectionError::Closed), TransportError::Closed));
        assert!(matches!(
            TransportError::from(ConnectionError::Protocol("bad magic".into())),
            TransportError::Protocol(reason) if reason == "bad magic"
        ));
    }
}
