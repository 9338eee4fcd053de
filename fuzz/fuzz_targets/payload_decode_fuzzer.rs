//! Fuzz target for typed payload decoding
//!
//! # Strategy
//!
//! - Every known command tag, plus raw unknown tags
//! - Arbitrary CBOR-ish payload bytes for each
//! - Decoded both as a server and as a client payload
//!
//! # Invariants
//!
//! - NEVER panic on malformed payloads
//! - Unknown tags fail with `ProtocolError::UnknownCommand`
//! - A payload that decodes re-encodes under the same command tag

#![no_main]

use arbitrary::Arbitrary;
use hexlink_proto::{ClientPayload, CommandTag, Frame, FrameHeader, ProtocolError, ServerPayload};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Tag {
    Known(u8),
    Raw(u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    tag: Tag,
    payload: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let raw = match input.tag {
        Tag::Known(i) => CommandTag::ALL[usize::from(i) % CommandTag::ALL.len()].to_u16(),
        Tag::Raw(raw) => raw,
    };

    let Some(tag) = CommandTag::from_u16(raw) else {
        let mut bytes = FrameHeader::new(CommandTag::ALL[0]).to_bytes();
        bytes[6..8].copy_from_slice(&raw.to_be_bytes());
        if let Ok(header) = FrameHeader::from_bytes(&bytes) {
            let frame = Frame::new(*header, input.payload);
            assert!(matches!(ServerPayload::from_frame(&frame), Err(ProtocolError::UnknownCommand(_))));
        }
        return;
    };

    let frame = Frame::new(FrameHeader::new(tag), input.payload);

    if let Ok(payload) = ServerPayload::from_frame(&frame) {
        assert_eq!(payload.command(), tag);
        let _ = payload.into_frame(0);
    }
    if let Ok(payload) = ClientPayload::from_frame(&frame) {
        assert_eq!(payload.command(), tag);
        let _ = payload.into_frame(0);
    }
});
