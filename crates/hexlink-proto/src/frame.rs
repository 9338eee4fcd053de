//! Frame type combining header and payload, plus the stream decoder.
//!
//! A `Frame` is the transport-layer message consisting of:
//! - 16-byte raw binary header (Big Endian)
//! - Variable-length raw bytes (already CBOR-encoded)
//!
//! This is a pure data holder. For typed access see
//! [`ServerPayload::from_frame`](crate::ServerPayload::from_frame) and
//! [`ClientPayload::into_frame`](crate::ClientPayload::into_frame).

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    FrameHeader,
    errors::{ProtocolError, Result},
};

/// Complete protocol frame (transport layer)
///
/// Layout on the wire:
/// `[FrameHeader: 16 bytes, raw binary] + [payload: variable bytes]`
///
/// # Invariants
///
/// - Size Consistency: `payload.len()` MUST match `header.payload_size()`.
///   Enforced by [`Frame::new`] and verified by [`Frame::decode`].
///
/// - Size Limit: `payload.len()` MUST NOT exceed
///   [`FrameHeader::MAX_PAYLOAD_SIZE`]. Violations are rejected during
///   encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header (16 bytes)
    pub header: FrameHeader,

    /// Raw payload bytes (already CBOR-encoded)
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame with automatic `payload_size` calculation.
    ///
    /// Oversized payloads are not rejected here; [`Frame::encode`] is the
    /// enforcement point.
    #[must_use]
    pub fn new(mut header: FrameHeader, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();

        // Saturate instead of panicking; encode() rejects anything above the
        // protocol limit, which is far below u32::MAX.
        let payload_len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
        header.set_payload_size(payload_len);

        Self { header, payload }
    }

    /// Encoded size on the wire.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        FrameHeader::SIZE + self.payload.len()
    }

    /// Encode frame into buffer.
    ///
    /// Writes: `[header (16 bytes)] + [payload (variable)]`
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if payload exceeds `MAX_PAYLOAD_SIZE`
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        if self.payload.len() > FrameHeader::MAX_PAYLOAD_SIZE as usize {
            return Err(ProtocolError::PayloadTooLarge {
                size: self.payload.len(),
                max: FrameHeader::MAX_PAYLOAD_SIZE as usize,
            });
        }

        debug_assert_eq!(self.payload.len(), self.header.payload_size() as usize);

        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);

        Ok(())
    }

    /// Decode one frame from the start of `bytes`.
    ///
    /// Trailing data after the frame is ignored.
    ///
    /// # Errors
    ///
    /// - `ProtocolError` if header parsing fails (invalid magic, version, or
    ///   size limits)
    /// - `ProtocolError::FrameTruncated` if the payload is shorter than the
    ///   header claims
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = FrameHeader::from_bytes(bytes)?;

        let payload_size = header.payload_size() as usize;
        let total_size = FrameHeader::SIZE + payload_size;

        let Some(payload) = bytes.get(FrameHeader::SIZE..total_size) else {
            return Err(ProtocolError::FrameTruncated {
                expected: payload_size,
                actual: bytes.len().saturating_sub(FrameHeader::SIZE),
            });
        };

        Ok(Self { header: *header, payload: Bytes::copy_from_slice(payload) })
    }
}

/// Incremental decoder for a length-framed byte stream.
///
/// Bytes are pushed as they arrive from the socket; complete frames are
/// popped in order. A frame split across any number of reads decodes to the
/// same value as a frame delivered in one piece.
///
/// After a stream-fatal error (see
/// [`ProtocolError::is_stream_fatal`]) the decoder no longer knows where the
/// next frame starts. Callers must drop the connection.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes received from the stream.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes buffered but not yet returned as frames.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Pop the next complete frame, if one is buffered.
    ///
    /// Returns `Ok(None)` when more bytes are needed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.buffer.len() < FrameHeader::SIZE {
            return Ok(None);
        }

        let header = *FrameHeader::from_bytes(&self.buffer)?;
        let total_size = FrameHeader::SIZE + header.payload_size() as usize;

        if self.buffer.len() < total_size {
            self.buffer.reserve(total_size - self.buffer.len());
            return Ok(None);
        }

        let mut frame_bytes = self.buffer.split_to(total_size);
        frame_bytes.advance(FrameHeader::SIZE);

        Ok(Some(Frame { header, payload: frame_bytes.freeze() }))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::CommandTag;

    impl Arbitrary for Frame {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            (any::<FrameHeader>(), prop::collection::vec(any::<u8>(), 0..256))
                .prop_map(|(header, payload_bytes)| Self::new(header, payload_bytes))
                .boxed()
        }
    }

    proptest! {
        #[test]
        fn frame_round_trip(frame in any::<Frame>()) {
            let mut wire = Vec::new();
            frame.encode(&mut wire).expect("should encode");

            let parsed = Frame::decode(&wire).expect("should decode");
            prop_assert_eq!(frame, parsed);
        }

        #[test]
        fn split_stream_decodes_identically(
            frames in prop::collection::vec(any::<Frame>(), 1..5),
            chunk in 1usize..40,
        ) {
            let mut wire = Vec::new();
            for frame in &frames {
                frame.encode(&mut wire).expect("should encode");
            }

            let mut decoder = FrameDecoder::new();
            let mut decoded = Vec::new();
            for piece in wire.chunks(chunk) {
                decoder.push(piece);
                while let Some(frame) = decoder.next_frame().expect("valid stream") {
                    decoded.push(frame);
                }
            }

            prop_assert_eq!(decoded, frames);
            prop_assert_eq!(decoder.buffered(), 0);
        }
    }

    #[test]
    fn frame_with_payload() {
        let header = FrameHeader::new(CommandTag::Chat);
        let frame = Frame::new(header, vec![1, 2, 3, 4]);
        assert_eq!(frame.header.payload_size(), 4);
        assert_eq!(frame.wire_len(), FrameHeader::SIZE + 4);

        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("should encode");
        let parsed = Frame::decode(&wire).expect("should decode");
        assert_eq!(frame.payload, parsed.payload);
    }

    #[test]
    fn reject_truncated_frame() {
        let mut header = FrameHeader::new(CommandTag::Chat);
        header.set_payload_size(100);

        let result = Frame::decode(&header.to_bytes());
        assert!(matches!(result, Err(ProtocolError::FrameTruncated { expected: 100, actual: 0 })));
    }

    #[test]
    fn decoder_waits_for_complete_header() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&FrameHeader::new(CommandTag::Chat).to_bytes()[..7]);
        assert_eq!(decoder.next_frame(), Ok(None));
    }

    #[test]
    fn decoder_reports_garbage() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&[0xAB; FrameHeader::SIZE]);
        assert_eq!(decoder.next_frame(), Err(ProtocolError::InvalidMagic));
    }
}
