//! Connection framing and lifecycle.
//!
//! A [`Connection`] sits between the socket and the dispatcher. It never
//! performs I/O itself: the transport copies bytes out of
//! [`Connection::pending_output`] into the socket and feeds socket reads into
//! [`Connection::receive`]. This keeps partial writes, split reads and
//! lifecycle rules testable without a network.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐   open    ┌──────┐   close / fatal stream error   ┌────────┐
//! │ Unopened │──────────>│ Open │───────────────────────────────>│ Closed │
//! └──────────┘           └──────┘                                └────────┘
//!       │                                                             ^
//!       └─────────────────────────── close ───────────────────────────┘
//! ```

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use bytes::{Buf, BytesMut};
use hexlink_proto::{Frame, FrameDecoder};

use crate::error::ConnectionError;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, no channel yet.
    Unopened,
    /// Channel established; frames flow both ways.
    Open,
    /// Terminal.
    Closed,
}

/// Framing state of one connection.
///
/// Outbound frames are serialized into a single byte queue in the order they
/// were enqueued. The transport drains it with
/// [`pending_output`](Self::pending_output) and
/// [`consume_output`](Self::consume_output), so a short write simply leaves
/// the rest for the next flush.
#[derive(Debug)]
pub struct Connection {
    state: ConnectionState,
    outbound: BytesMut,
    decoder: FrameDecoder,
    received: VecDeque<Frame>,
    next_sequence: u32,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Create a connection in [`ConnectionState::Unopened`].
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Unopened,
            outbound: BytesMut::new(),
            decoder: FrameDecoder::new(),
            received: VecDeque::new(),
            next_sequence: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the connection reached its terminal state.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Mark the channel as established.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` unless the connection is unopened
    pub fn open(&mut self) -> Result<(), ConnectionError> {
        if self.state != ConnectionState::Unopened {
            return Err(ConnectionError::InvalidState { state: self.state, operation: "open" });
        }
        self.state = ConnectionState::Open;
        Ok(())
    }

    /// Queue a frame for sending. Stamps the next sequence number.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Closed` after close
    /// - `ConnectionError::InvalidState` before open
    /// - `ConnectionError::Protocol` if the frame cannot be encoded
    pub fn enqueue(&mut self, mut frame: Frame) -> Result<(), ConnectionError> {
        match self.state {
            ConnectionState::Open => {},
            ConnectionState::Closed => return Err(ConnectionError::Closed),
            ConnectionState::Unopened => {
                return Err(ConnectionError::InvalidState {
                    state: self.state,
                    operation: "enqueue",
                });
            },
        }

        frame.header.set_sequence(self.next_sequence);
        self.next_sequence = self.next_sequence.wrapping_add(1);

        frame.encode(&mut self.outbound)?;
        Ok(())
    }

    /// Bytes waiting to be written, oldest first.
    #[must_use]
    pub fn pending_output(&self) -> &[u8] {
        &self.outbound
    }

    /// Whether any bytes are waiting to be written.
    #[must_use]
    pub fn has_pending_output(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// Drop the first `written` bytes after a successful (possibly short)
    /// write.
    pub fn consume_output(&mut self, written: usize) {
        let written = written.min(self.outbound.len());
        self.outbound.advance(written);
    }

    /// Feed bytes read from the socket. Complete frames move to the receive
    /// queue; returns how many were completed.
    ///
    /// A corrupt stream closes the connection, since frame boundaries can no
    /// longer be found.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::Closed` after close
    /// - `ConnectionError::InvalidState` before open
    /// - `ConnectionError::Protocol` on a stream-fatal framing error
    pub fn receive(&mut self, bytes: &[u8]) -> Result<usize, ConnectionError> {
        match self.state {
            ConnectionState::Open => {},
            ConnectionState::Closed => return Err(ConnectionError::Closed),
            ConnectionState::Unopened => {
                return Err(ConnectionError::InvalidState {
                    state: self.state,
                    operation: "receive",
                });
            },
        }

        self.decoder.push(bytes);

        let mut completed = 0;
        loop {
            match self.decoder.next_frame() {
                Ok(Some(frame)) => {
                    self.received.push_back(frame);
                    completed += 1;
                },
                Ok(None) => return Ok(completed),
                Err(err) => {
                    tracing::warn!(error = %err, "inbound stream corrupt, closing connection");
                    self.close();
                    return Err(err.into());
                },
            }
        }
    }

    /// Number of decoded frames waiting to be taken.
    #[must_use]
    pub fn received_len(&self) -> usize {
        self.received.len()
    }

    /// Take every decoded frame, in arrival order.
    pub fn take_received(&mut self) -> Vec<Frame> {
        self.received.drain(..).collect()
    }

    /// Move to [`ConnectionState::Closed`] and drop unsent bytes.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// callers can tell a first close from a repeated one.
    pub fn close(&mut self) -> bool {
        if self.state == ConnectionState::Closed {
            return false;
        }
        self.state = ConnectionState::Closed;
        self.outbound.clear();
        true
    }
}

/// One-shot disconnect signal shared between a transport and its owners.
///
/// Both the local close path and the remote-hangup path call
/// [`fire`](Self::fire); only the first call reports `true`.
#[derive(Debug, Clone, Default)]
pub struct DisconnectLatch {
    fired: Arc<AtomicBool>,
}

impl DisconnectLatch {
    /// Create an unfired latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the latch. Returns `true` for the first caller only.
    pub fn fire(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Whether the latch has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{
        ClientPayload, CommandTag, FrameHeader, ServerPayload, payloads::roster::Chat,
    };

    use super::*;

    fn chat_frame(message: &str) -> Frame {
        ClientPayload::Chat(Chat { message: message.to_string() })
            .into_frame(0)
            .expect("chat encodes")
    }

    fn open_connection() -> Connection {
        let mut conn = Connection::new();
        conn.open().expect("fresh connection opens");
        conn
    }

    #[test]
    fn connection_lifecycle() {
        let mut conn = Connection::new();
        assert_eq!(conn.state(), ConnectionState::Unopened);

        conn.open().expect("open");
        assert_eq!(conn.state(), ConnectionState::Open);

        assert!(conn.close());
        assert!(conn.is_closed());
        assert!(!conn.close());
    }

    #[test]
    fn open_happens_once() {
        let mut conn = open_connection();
        assert!(matches!(
            conn.open(),
            Err(ConnectionError::InvalidState { state: ConnectionState::Open, .. })
        ));

        conn.close();
        assert!(matches!(
            conn.open(),
            Err(ConnectionError::InvalidState { state: ConnectionState::Closed, .. })
        ));
    }

    #[test]
    fn enqueue_before_open_rejected() {
        let mut conn = Connection::new();
        let result = conn.enqueue(chat_frame("early"));
        assert!(matches!(result, Err(ConnectionError::InvalidState { operation: "enqueue", .. })));
        assert!(!conn.has_pending_output());
    }

    #[test]
    fn enqueue_after_close_rejected() {
        let mut conn = open_connection();
        conn.close();
        assert_eq!(conn.enqueue(chat_frame("late")), Err(ConnectionError::Closed));
    }

    #[test]
    fn enqueue_stamps_increasing_sequence() {
        let mut conn = open_connection();
        conn.enqueue(chat_frame("a")).expect("enqueue");
        conn.enqueue(chat_frame("b")).expect("enqueue");

        let mut decoder = FrameDecoder::new();
        decoder.push(conn.pending_output());
        let first = decoder.next_frame().expect("decode").expect("frame");
        let second = decoder.next_frame().expect("decode").expect("frame");

        assert_eq!(first.header.sequence(), 0);
        assert_eq!(second.header.sequence(), 1);
    }

    #[test]
    fn partial_writes_resume_in_order() {
        let mut conn = open_connection();
        for message in ["one", "two", "three"] {
            conn.enqueue(chat_frame(message)).expect("enqueue");
        }

        let mut wire = Vec::new();
        while conn.has_pending_output() {
            let chunk = conn.pending_output().len().min(7);
            wire.extend_from_slice(&conn.pending_output()[..chunk]);
            conn.consume_output(chunk);
        }

        let mut decoder = FrameDecoder::new();
        decoder.push(&wire);
        let mut messages = Vec::new();
        while let Some(frame) = decoder.next_frame().expect("decode") {
            match ClientPayload::from_frame(&frame).expect("payload") {
                ClientPayload::Chat(chat) => messages.push(chat.message),
                other => unreachable!("unexpected payload {other:?}"),
            }
        }
        assert_eq!(messages, ["one", "two", "three"]);
    }

    #[test]
    fn consume_more_than_pending_is_clamped() {
        let mut conn = open_connection();
        conn.enqueue(chat_frame("x")).expect("enqueue");
        conn.consume_output(usize::MAX);
        assert!(!conn.has_pending_output());
    }

    #[test]
    fn receive_assembles_split_frames() {
        let mut conn = open_connection();
        let mut wire = Vec::new();
        for (sequence, payload) in
            [ServerPayload::ServerVersionCheck, ServerPayload::ServerGreeting].into_iter().enumerate()
        {
            let frame = payload.into_frame(sequence as u32).expect("encode");
            frame.encode(&mut wire).expect("encode");
        }

        let (head, tail) = wire.split_at(FrameHeader::SIZE + 3);
        assert_eq!(conn.receive(head).expect("receive"), 1);
        assert_eq!(conn.receive(tail).expect("receive"), 1);

        let tags: Vec<_> = conn.take_received().iter().map(|f| f.header.command_tag()).collect();
        assert_eq!(tags, [Some(CommandTag::ServerVersionCheck), Some(CommandTag::ServerGreeting)]);
        assert_eq!(conn.received_len(), 0);
    }

    #[test]
    fn corrupt_stream_closes_connection() {
        let mut conn = open_connection();
        conn.enqueue(chat_frame("pending")).expect("enqueue");

        let result = conn.receive(&[0u8; FrameHeader::SIZE]);
        assert!(matches!(result, Err(ConnectionError::Protocol(_))));
        assert!(conn.is_closed());
        assert!(!conn.has_pending_output());
    }

    #[test]
    fn latch_fires_once() {
        let latch = DisconnectLatch::new();
        let remote = latch.clone();

        assert!(!latch.is_fired());
        assert!(remote.fire());
        assert!(!latch.fire());
        assert!(latch.is_fired());
    }
}
