//! CBOR-encoded protocol messages.
//!
//! Frame headers are raw binary; payloads use CBOR for type safety. The
//! payload type is determined by the [`CommandTag`] in the frame header, so
//! only the inner record is serialized (no variant tag in CBOR).
//!
//! Messages are split by direction: [`ServerPayload`] for inbound,
//! [`ClientPayload`] for outbound. Each variant maps to exactly one command
//! tag (enforced by match exhaustiveness).
//!
//! # Invariants
//!
//! - Shape Strictness: payload records reject unknown fields and missing
//!   fields. A payload whose shape does not match its tag fails to decode
//!   with [`ProtocolError::CborDecode`] instead of being coerced.
//!
//! - Zero-byte payloads: tags without a record must carry an empty payload.

pub mod entity;
pub mod force;
pub mod roster;
pub mod session;
pub mod turn;
pub mod world;

mod client;
mod server;

use bytes::BufMut;
use serde::{Serialize, de::DeserializeOwned};

pub use client::ClientPayload;
pub use server::ServerPayload;

use crate::{
    CommandTag, FrameHeader,
    errors::{ProtocolError, Result},
};

fn encode_cbor<T: Serialize>(value: &T, dst: &mut impl BufMut) -> Result<()> {
    ciborium::ser::into_writer(value, dst.writer())
        .map_err(|e| ProtocolError::CborEncode(e.to_string()))
}

/// Size validation happens BEFORE CBOR parsing so the parser never sees
/// oversized input.
fn check_size(bytes: &[u8]) -> Result<()> {
    if bytes.len() > FrameHeader::MAX_PAYLOAD_SIZE as usize {
        return Err(ProtocolError::PayloadTooLarge {
            size: bytes.len(),
            max: FrameHeader::MAX_PAYLOAD_SIZE as usize,
        });
    }
    Ok(())
}

fn decode_cbor<T: DeserializeOwned>(command: CommandTag, bytes: &[u8]) -> Result<T> {
    ciborium::de::from_reader(bytes)
        .map_err(|e| ProtocolError::CborDecode { command, reason: e.to_string() })
}

fn expect_empty(command: CommandTag, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        Ok(())
    } else {
        Err(ProtocolError::CborDecode {
            command,
            reason: format!("expected empty payload, got {} bytes", bytes.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_empty_rejects_bytes() {
        assert!(expect_empty(CommandTag::ServerGreeting, &[]).is_ok());
        assert!(matches!(
            expect_empty(CommandTag::ServerGreeting, &[0xa0]),
            Err(ProtocolError::CborDecode { command: CommandTag::ServerGreeting, .. })
        ));
    }

    #[test]
    fn oversized_input_rejected_before_parsing() {
        let bytes = vec![0u8; FrameHeader::MAX_PAYLOAD_SIZE as usize + 1];
        assert!(matches!(check_size(&bytes), Err(ProtocolError::PayloadTooLarge { .. })));
    }
}
