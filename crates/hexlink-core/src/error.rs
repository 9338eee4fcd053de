//! Error types for the hexlink core.
//!
//! Connection errors cover lifecycle misuse and stream corruption. Store
//! operations never fail: unknown ids are no-ops, reported through their
//! return values.

use std::io;

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors raised by the connection state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Operation not allowed in the current lifecycle state.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// State when the operation was attempted.
        state: ConnectionState,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// Connection already closed.
    #[error("connection closed")]
    Closed,

    /// Inbound stream could not be framed.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ConnectionError {
    /// Whether the connection is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed | Self::Protocol(_))
    }
}

/// Boundary conversion for async I/O APIs.
impl From<ConnectionError> for io::Error {
    fn from(err: ConnectionError) -> Self {
        let kind = match &err {
            ConnectionError::InvalidState { .. } | ConnectionError::Protocol(_) => {
                io::ErrorKind::InvalidData
            },
            ConnectionError::Closed => io::ErrorKind::NotConnected,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<hexlink_proto::ProtocolError> for ConnectionError {
    fn from(err: hexlink_proto::ProtocolError) -> Self {
        Self::Protocol(err.to_string())
    }
}
