//! Byte transports under the connection pump.
//!
//! A [`Transport`] owns one channel to the server and a core
//! [`Connection`] that frames the bytes. Every method except
//! [`open`](Transport::open) and [`ready`](Transport::ready) is a bounded,
//! non-blocking step, so the pump can interleave reads, writes and its stop
//! signal without a second task.
//!
//! - [`TcpTransport`]: production transport over `tokio::net::TcpStream`
//! - [`ChannelTransport`]: in-process transport over mpsc channels, paired
//!   with a [`ChannelPeer`] playing the server

use std::{future::Future, io};

use bytes::Bytes;
use hexlink_core::Connection;
use hexlink_proto::{Frame, FrameDecoder, ServerPayload};
use tokio::{
    io::Interest,
    net::TcpStream,
    sync::mpsc::{self, error::TryRecvError},
};

use crate::error::TransportError;

/// Size of one socket read.
const READ_CHUNK: usize = 16 * 1024;

/// One framed channel to the server.
pub trait Transport: Send + 'static {
    /// Establish the channel. Returns `false` on failure, never panics.
    fn open(&mut self) -> impl Future<Output = bool> + Send;

    /// Queue a frame for the next [`flush`](Self::flush).
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` once the transport closed
    fn send(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Write as much queued output as the channel accepts without blocking.
    ///
    /// Returns the number of bytes written. A partial write resumes on the
    /// next call.
    ///
    /// # Errors
    ///
    /// - `TransportError::Io` on a socket failure; the transport closes
    fn flush(&mut self) -> Result<usize, TransportError>;

    /// One non-blocking unit of read progress.
    ///
    /// Returns the number of frames completed.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` when the peer hung up
    /// - `TransportError::Protocol` on a corrupt stream
    fn update(&mut self) -> Result<usize, TransportError>;

    /// Take every decoded frame, in arrival order.
    fn take_received(&mut self) -> Vec<Frame>;

    /// Whether the channel is gone.
    fn is_closed(&self) -> bool;

    /// Release the channel. Returns `true` for the first call only.
    fn close(&mut self) -> bool;

    /// Wait until [`update`](Self::update) or [`flush`](Self::flush) may
    /// make progress.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` if there is no channel to wait on
    fn ready(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Address this transport connects to, for diagnostics.
    fn address(&self) -> &str;
}

/// TCP transport using non-blocking `try_read`/`try_write`.
#[derive(Debug)]
pub struct TcpTransport {
    address: String,
    stream: Option<TcpStream>,
    conn: Connection,
    read_buf: Box<[u8]>,
}

impl TcpTransport {
    /// Transport for `address` (`host:port`); nothing is dialed until
    /// [`open`](Transport::open).
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            stream: None,
            conn: Connection::new(),
            read_buf: vec![0; READ_CHUNK].into_boxed_slice(),
        }
    }

    fn shutdown(&mut self) -> bool {
        self.stream = None;
        self.conn.close()
    }
}

impl Transport for TcpTransport {
    async fn open(&mut self) -> bool {
        match TcpStream::connect(&self.address).await {
            Ok(stream) => {
                if let Err(err) = stream.set_nodelay(true) {
                    tracing::debug!(error = %err, "TCP_NODELAY not set");
                }
                if let Err(err) = self.conn.open() {
                    tracing::warn!(error = %err, "transport reopened");
                    return false;
                }
                tracing::info!(address = %self.address, "connected");
                self.stream = Some(stream);
                true
            },
            Err(err) => {
                tracing::warn!(address = %self.address, error = %err, "connect failed");
                false
            },
        }
    }

    fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        self.conn.enqueue(frame)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<usize, TransportError> {
        let Some(stream) = &self.stream else {
            return Err(TransportError::Closed);
        };

        let mut written = 0;
        while self.conn.has_pending_output() {
            match stream.try_write(self.conn.pending_output()) {
                Ok(0) => {
                    self.shutdown();
                    return Err(TransportError::Closed);
                },
                Ok(n) => {
                    self.conn.consume_output(n);
                    written += n;
                },
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    self.shutdown();
                    return Err(err.into());
                },
            }
        }
        Ok(written)
    }

    fn update(&mut self) -> Result<usize, TransportError> {
        let Some(stream) = &self.stream else {
            return Err(TransportError::Closed);
        };

        match stream.try_read(&mut self.read_buf) {
            Ok(0) => {
                tracing::debug!(address = %self.address, "peer closed the connection");
                self.shutdown();
                Err(TransportError::Closed)
            },
            Ok(n) => match self.conn.receive(&self.read_buf[..n]) {
                Ok(frames) => Ok(frames),
                Err(err) => {
                    self.shutdown();
                    Err(err.into())
                },
            },
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(err) => {
                self.shutdown();
                Err(err.into())
            },
        }
    }

    fn take_received(&mut self) -> Vec<Frame> {
        self.conn.take_received()
    }

    fn is_closed(&self) -> bool {
        self.stream.is_none() || self.conn.is_closed()
    }

    fn close(&mut self) -> bool {
        self.shutdown()
    }

    async fn ready(&mut self) -> Result<(), TransportError> {
        let Some(stream) = &self.stream else {
            return Err(TransportError::Closed);
        };
        let interest = if self.conn.has_pending_output() {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        };
        stream.ready(interest).await?;
        Ok(())
    }

    fn address(&self) -> &str {
        &self.address
    }
}

/// In-process transport over mpsc channels.
///
/// Bytes, not frames, cross the channel, so framing runs exactly as it does
/// over TCP. A write limit splits output into short writes.
#[derive(Debug)]
pub struct ChannelTransport {
    conn: Connection,
    to_peer: mpsc::UnboundedSender<Bytes>,
    from_peer: mpsc::UnboundedReceiver<Bytes>,
    inbox: Option<Bytes>,
    peer_gone: bool,
    write_limit: usize,
}

/// Server side of a [`ChannelTransport`].
#[derive(Debug)]
pub struct ChannelPeer {
    to_client: mpsc::UnboundedSender<Bytes>,
    from_client: mpsc::UnboundedReceiver<Bytes>,
    decoder: FrameDecoder,
}

impl ChannelTransport {
    /// A connected transport and its peer.
    pub fn pair() -> (Self, ChannelPeer) {
        let (to_peer, from_client) = mpsc::unbounded_channel();
        let (to_client, from_peer) = mpsc::unbounded_channel();
        let transport = Self {
            conn: Connection::new(),
            to_peer,
            from_peer,
            inbox: None,
            peer_gone: false,
            write_limit: usize::MAX,
        };
        let peer = ChannelPeer { to_client, from_client, decoder: FrameDecoder::new() };
        (transport, peer)
    }

    /// Write at most `limit` bytes per flush.
    #[must_use]
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = limit.max(1);
        self
    }

    fn next_chunk(&mut self) -> Option<Bytes> {
        if let Some(chunk) = self.inbox.take() {
            return Some(chunk);
        }
        match self.from_peer.try_recv() {
            Ok(chunk) => Some(chunk),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.peer_gone = true;
                None
            },
        }
    }
}

impl Transport for ChannelTransport {
    async fn open(&mut self) -> bool {
        !self.peer_gone && self.conn.open().is_ok()
    }

    fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        self.conn.enqueue(frame)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<usize, TransportError> {
        let pending = self.conn.pending_output();
        if pending.is_empty() {
            return Ok(0);
        }

        let n = pending.len().min(self.write_limit);
        let chunk = Bytes::copy_from_slice(&pending[..n]);
        if self.to_peer.send(chunk).is_err() {
            self.peer_gone = true;
            self.conn.close();
            return Err(TransportError::Closed);
        }
        self.conn.consume_output(n);
        Ok(n)
    }

    fn update(&mut self) -> Result<usize, TransportError> {
        match self.next_chunk() {
            Some(chunk) => Ok(self.conn.receive(&chunk)?),
            None if self.peer_gone => {
                self.conn.close();
                Err(TransportError::Closed)
            },
            None => Ok(0),
        }
    }

    fn take_received(&mut self) -> Vec<Frame> {
        self.conn.take_received()
    }

    fn is_closed(&self) -> bool {
        self.conn.is_closed()
    }

    fn close(&mut self) -> bool {
        self.from_peer.close();
        self.conn.close()
    }

    async fn ready(&mut self) -> Result<(), TransportError> {
        if self.conn.is_closed() {
            return Err(TransportError::Closed);
        }
        if self.inbox.is_some() || self.peer_gone || self.conn.has_pending_output() {
            return Ok(());
        }
        match self.from_peer.recv().await {
            Some(chunk) => self.inbox = Some(chunk),
            None => self.peer_gone = true,
        }
        Ok(())
    }

    fn address(&self) -> &str {
        "in-process"
    }
}

impl ChannelPeer {
    /// Send a payload as one frame.
    ///
    /// # Errors
    ///
    /// - `TransportError::Protocol` if the payload does not encode
    /// - `TransportError::Closed` if the client side is gone
    pub fn send(&self, payload: ServerPayload) -> Result<(), TransportError> {
        let frame = payload.into_frame(0).map_err(|e| TransportError::Protocol(e.to_string()))?;
        let mut wire = Vec::with_capacity(frame.wire_len());
        frame.encode(&mut wire).map_err(|e| TransportError::Protocol(e.to_string()))?;
        self.send_bytes(wire)
    }

    /// Send raw bytes; frames may be split across calls.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` if the client side is gone
    pub fn send_bytes(&self, bytes: impl Into<Bytes>) -> Result<(), TransportError> {
        self.to_client.send(bytes.into()).map_err(|_| TransportError::Closed)
    }

    /// Frames the client wrote so far, without waiting.
    ///
    /// # Errors
    ///
    /// - `TransportError::Protocol` if the client wrote a corrupt stream
    pub fn try_frames(&mut self) -> Result<Vec<Frame>, TransportError> {
        while let Ok(chunk) = self.from_client.try_recv() {
            self.decoder.push(&chunk);
        }
        self.decoded()
    }

    /// Wait for the next frame the client writes.
    ///
    /// Returns `None` once the client side is gone.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            match self.decoder.next_frame() {
                Ok(Some(frame)) => return Some(frame),
                Ok(None) => {},
                Err(err) => {
                    tracing::warn!(error = %err, "corrupt client stream");
                    return None;
                },
            }
            let chunk = self.from_client.recv().await?;
            self.decoder.push(&chunk);
        }
    }

    fn decoded(&mut self) -> Result<Vec<Frame>, TransportError> {
        let mut frames = Vec::new();
        while let Some(frame) =
            self.decoder.next_frame().map_err(|e| TransportError::Protocol(e.to_string()))?
        {
            frames.push(frame);
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{ClientPayload, payloads::roster::Chat};

    use super::*;

    fn chat(message: &str) -> Frame {
        ClientPayload::Chat(Chat { message: message.to_owned() }).into_frame(0).expect("encodes")
    }

    #[tokio::test]
    async fn partial_writes_resume_in_order() {
        let (transport, mut peer) = ChannelTransport::pair();
        let mut transport = transport.with_write_limit(7);
        assert!(transport.open().await);

        transport.send(chat("first")).expect("open");
        transport.send(chat("second")).expect("open");
        while transport.flush().expect("peer alive") > 0 {}

        let frames = peer.try_frames().expect("clean stream");
        let messages: Vec<_> = frames
            .iter()
            .map(|f| ClientPayload::from_frame(f).expect("decodes"))
            .collect();
        assert_eq!(
            messages,
            [
                ClientPayload::Chat(Chat { message: "first".to_owned() }),
                ClientPayload::Chat(Chat { message: "second".to_owned() }),
            ]
        );
        assert_eq!(frames.iter().map(|f| f.header.sequence()).collect::<Vec<_>>(), [0, 1]);
    }

    #[tokio::test]
    async fn split_inbound_frame_waits_for_rest() {
        let (mut transport, peer) = ChannelTransport::pair();
        assert!(transport.open().await);

        let frame = ServerPayload::ServerGreeting.into_frame(0).expect("encodes");
        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("encodes");
        let (head, tail) = wire.split_at(5);

        peer.send_bytes(head.to_vec()).expect("client alive");
        transport.ready().await.expect("open");
        assert_eq!(transport.update().expect("clean"), 0);

        peer.send_bytes(tail.to_vec()).expect("client alive");
        transport.ready().await.expect("open");
        assert_eq!(transport.update().expect("clean"), 1);
        assert_eq!(transport.take_received(), [frame]);
    }

    #[tokio::test]
    async fn peer_hangup_closes_transport() {
        let (mut transport, peer) = ChannelTransport::pair();
        assert!(transport.open().await);
        drop(peer);

        transport.ready().await.expect("wakes on hangup");
        assert!(matches!(transport.update(), Err(TransportError::Closed)));
        assert!(transport.is_closed());
        assert!(!transport.close());
    }

    #[tokio::test]
    async fn tcp_connect_failure_returns_false() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let address = listener.local_addr().expect("addr").to_string();
        drop(listener);

        let mut transport = TcpTransport::new(address);
        assert!(!transport.open().await);
        assert!(transport.is_closed());
    }
}
