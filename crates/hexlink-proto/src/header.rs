//! Frame header implementation with zero-copy parsing.
//!
//! The `FrameHeader` is a fixed 16-byte structure serialized as raw binary
//! (Big Endian). The command tag and payload length can be read without
//! touching the CBOR payload, which lets the stream decoder find frame
//! boundaries cheaply.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    CommandTag,
    errors::{ProtocolError, Result},
};

/// Fixed 16-byte frame header (Big Endian network byte order)
///
/// Fields are stored as raw byte arrays to avoid alignment issues.
///
/// # Security
///
/// The `#[repr(C, packed)]` layout with zerocopy traits ensures this struct can
/// be safely cast from untrusted network bytes: every 16-byte pattern is a
/// valid value. Semantic checks (magic, version, payload limit) happen in
/// [`FrameHeader::from_bytes`].
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    magic: [u8; 4],                   // 0x48584C4B ("HXLK" in ASCII)
    version: u8,                      // 0x01
    reserved: u8,                     // always zero on send, ignored on receive
    pub(crate) command: [u8; 2],      // u16 command tag
    sequence: [u8; 4],                // u32 per-sender frame counter
    pub(crate) payload_size: [u8; 4], // u32 payload length
}

impl FrameHeader {
    /// Size of the serialized header (16 bytes)
    pub const SIZE: usize = 16;

    /// Magic number: "HXLK" in ASCII (0x48584C4B)
    pub const MAGIC: u32 = 0x4858_4C4B;

    /// Current protocol version
    pub const VERSION: u8 = 0x01;

    /// Maximum payload size (16 MB). Full board resyncs are the largest
    /// payloads in practice.
    pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

    /// Create a new header for the given command tag.
    #[must_use]
    pub fn new(command: CommandTag) -> Self {
        Self {
            magic: Self::MAGIC.to_be_bytes(),
            version: Self::VERSION,
            reserved: 0,
            command: command.to_u16().to_be_bytes(),
            sequence: [0; 4],
            payload_size: [0; 4],
        }
    }

    /// Parse header from network bytes (zero-copy, safe)
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooShort` if buffer is shorter than 16 bytes
    /// - `ProtocolError::InvalidMagic` if magic number is invalid
    /// - `ProtocolError::UnsupportedVersion` if protocol version is unsupported
    /// - `ProtocolError::PayloadTooLarge` if payload size exceeds maximum
    ///
    /// The command tag is NOT validated here. Unknown tags are a dispatch
    /// concern (a newer server may send tags this build does not know), not
    /// a framing error.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::FrameTooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        if u32::from_be_bytes(header.magic) != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic);
        }

        if header.version != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion(header.version));
        }

        let payload_size = u32::from_be_bytes(header.payload_size);
        if payload_size > Self::MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_size as usize,
                max: Self::MAX_PAYLOAD_SIZE as usize,
            });
        }

        Ok(header)
    }

    /// Serialize header to bytes (zero-copy)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Protocol magic number.
    #[must_use]
    pub fn magic(&self) -> u32 {
        u32::from_be_bytes(self.magic)
    }

    /// Protocol version byte.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Command tag as raw u16.
    #[must_use]
    pub fn command(&self) -> u16 {
        u16::from_be_bytes(self.command)
    }

    /// Command tag as enum. `None` if unrecognized.
    #[must_use]
    pub fn command_tag(&self) -> Option<CommandTag> {
        CommandTag::from_u16(self.command())
    }

    /// Per-sender frame counter.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        u32::from_be_bytes(self.sequence)
    }

    /// Payload size in bytes (max 16 MB).
    #[must_use]
    pub fn payload_size(&self) -> u32 {
        u32::from_be_bytes(self.payload_size)
    }

    /// Set the per-sender frame counter.
    pub fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence.to_be_bytes();
    }

    /// Set payload size.
    pub fn set_payload_size(&mut self, size: u32) {
        self.payload_size = size.to_be_bytes();
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("magic", &format!("{:#010x}", self.magic()))
            .field("version", &self.version())
            .field("command", &format!("{:#06x}", self.command()))
            .field("sequence", &self.sequence())
            .field("payload_size", &self.payload_size())
            .finish_non_exhaustive()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for FrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for FrameHeader {}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    impl Arbitrary for FrameHeader {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            (
                prop::sample::select(CommandTag::ALL.to_vec()),
                any::<u32>(),
                0u32..=Self::MAX_PAYLOAD_SIZE,
            )
                .prop_map(|(command, sequence, payload_size)| {
                    let mut header = Self::new(command);
                    header.set_sequence(sequence);
                    header.set_payload_size(payload_size);
                    header
                })
                .boxed()
        }
    }

    #[test]
    fn header_size_is_16_bytes() {
        assert_eq!(std::mem::size_of::<FrameHeader>(), FrameHeader::SIZE);
    }

    proptest! {
        #[test]
        fn header_round_trip(header in any::<FrameHeader>()) {
            let bytes = header.to_bytes();
            let parsed = FrameHeader::from_bytes(&bytes).expect("valid header");
            prop_assert_eq!(*parsed, header);
        }

        #[test]
        fn short_buffers_are_rejected(len in 0usize..FrameHeader::SIZE) {
            let bytes = vec![0u8; len];
            let result = FrameHeader::from_bytes(&bytes);
            let is_too_short = matches!(result, Err(ProtocolError::FrameTooShort { .. }));
            prop_assert!(is_too_short);
        }
    }

    #[test]
    fn new_header_fields() {
        let header = FrameHeader::new(CommandTag::Chat);
        assert_eq!(header.magic(), FrameHeader::MAGIC);
        assert_eq!(header.version(), FrameHeader::VERSION);
        assert_eq!(header.command_tag(), Some(CommandTag::Chat));
        assert_eq!(header.payload_size(), 0);
        assert_eq!(header.sequence(), 0);
    }

    #[test]
    fn reject_invalid_magic() {
        let mut bytes = FrameHeader::new(CommandTag::Chat).to_bytes();
        bytes[0] = b'X';
        assert_eq!(FrameHeader::from_bytes(&bytes), Err(ProtocolError::InvalidMagic));
    }

    #[test]
    fn reject_unsupported_version() {
        let mut bytes = FrameHeader::new(CommandTag::Chat).to_bytes();
        bytes[4] = 0x7f;
        assert_eq!(FrameHeader::from_bytes(&bytes), Err(ProtocolError::UnsupportedVersion(0x7f)));
    }

    #[test]
    fn reject_oversized_payload_claim() {
        let mut header = FrameHeader::new(CommandTag::SendingBoard);
        header.set_payload_size(FrameHeader::MAX_PAYLOAD_SIZE + 1);
        let bytes = header.to_bytes();
        assert!(matches!(
            FrameHeader::from_bytes(&bytes),
            Err(ProtocolError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn unknown_command_parses() {
        let mut bytes = FrameHeader::new(CommandTag::Chat).to_bytes();
        bytes[6..8].copy_from_slice(&0xfeedu16.to_be_bytes());
        let header = FrameHeader::from_bytes(&bytes).expect("unknown tags still frame");
        assert_eq!(header.command(), 0xfeed);
        assert_eq!(header.command_tag(), None);
    }
}
