//! Wire protocol for the hexlink game client.
//!
//! Every message on the wire is a [`Frame`]: a fixed 16-byte binary header
//! followed by a CBOR payload. The header carries the [`CommandTag`] that
//! selects the payload type, so payloads never embed their own variant tag.
//!
//! Payloads are split by direction. [`ServerPayload`] covers everything the
//! authoritative server sends, [`ClientPayload`] everything the client sends.
//! A few tags (chat, ready, entity update, feedback requests) travel both ways
//! with different shapes.
//!
//! The records shared between payloads and the local game state live in
//! [`model`].

pub mod command;
pub mod errors;
pub mod frame;
pub mod header;
pub mod model;
pub mod payloads;

pub use command::CommandTag;
pub use errors::{ProtocolError, Result};
pub use frame::{Frame, FrameDecoder};
pub use header::FrameHeader;
pub use payloads::{ClientPayload, ServerPayload};
