//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing, encoding or decoding protocol messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer shorter than a frame header.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Header claims more payload than the buffer holds.
    #[error("frame truncated: header claims {expected} payload bytes, got {actual}")]
    FrameTruncated {
        /// Payload size claimed by the header.
        expected: usize,
        /// Payload bytes present.
        actual: usize,
    },

    /// Magic number does not identify a hexlink frame.
    #[error("invalid magic number")]
    InvalidMagic,

    /// Frame protocol version is not supported.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Payload exceeds the protocol limit.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size in bytes.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Command tag is not known to this build.
    #[error("unknown command tag: {0:#06x}")]
    UnknownCommand(u16),

    /// Command tag is known but has no payload in this direction.
    #[error("command {0:?} is not valid in this direction")]
    WrongDirection(crate::CommandTag),

    /// CBOR serialization failed.
    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    /// CBOR payload did not match the shape required by the command tag.
    #[error("CBOR decode error for {command:?}: {reason}")]
    CborDecode {
        /// Command tag whose payload failed to decode.
        command: crate::CommandTag,
        /// Decoder diagnostic.
        reason: String,
    },
}

impl ProtocolError {
    /// Whether the error poisons the byte stream it came from.
    ///
    /// Framing errors leave the decoder without a reliable frame boundary, so
    /// the connection must be dropped. Payload errors only affect one message.
    pub fn is_stream_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic | Self::UnsupportedVersion(_) | Self::PayloadTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandTag;

    #[test]
    fn framing_errors_are_stream_fatal() {
        assert!(ProtocolError::InvalidMagic.is_stream_fatal());
        assert!(ProtocolError::UnsupportedVersion(9).is_stream_fatal());
        assert!(ProtocolError::PayloadTooLarge { size: 1, max: 0 }.is_stream_fatal());
    }

    #[test]
    fn payload_errors_are_not_stream_fatal() {
        let err = ProtocolError::CborDecode { command: CommandTag::Chat, reason: "eof".into() };
        assert!(!err.is_stream_fatal());
        assert!(!ProtocolError::UnknownCommand(0xffff).is_stream_fatal());
    }

    #[test]
    fn display_names_the_command() {
        let err = ProtocolError::CborDecode { command: CommandTag::EntityAdd, reason: "x".into() };
        assert!(err.to_string().contains("EntityAdd"));
    }
}
