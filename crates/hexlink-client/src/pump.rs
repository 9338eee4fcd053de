//! Connection pump.
//!
//! One task per connection moves frames between a [`Transport`] and the
//! session. Each turn of the loop:
//!
//! 1. checks the stop flag,
//! 2. hands queued outbound frames to the transport and flushes,
//! 3. runs one read step and forwards decoded frames,
//! 4. waits for transport readiness, a new outbound frame or the stop
//!    signal.
//!
//! The wait in step 4 is the only place the task blocks, and the stop
//! signal interrupts it. Stopping never aborts the task: [`ConnectionPump::stop`]
//! sets the flag and joins, so queued output gets one final flush.

use hexlink_core::DisconnectLatch;
use hexlink_proto::Frame;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{error::TransportError, transport::Transport};

/// What the pump reports to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpEvent {
    /// A frame arrived from the server.
    Frame(Frame),
    /// The transport closed underneath the pump. Sent at most once.
    Disconnected,
}

/// Handle to a running pump task.
#[derive(Debug)]
pub struct ConnectionPump {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

enum Wake {
    Stop,
    Outbound(Option<Frame>),
    Ready(Result<(), TransportError>),
}

impl ConnectionPump {
    /// Start pumping `transport`, which must already be open.
    ///
    /// Taking the transport by value keeps a second pump off the same
    /// connection.
    pub fn spawn<T: Transport>(
        transport: T,
        outbound: mpsc::UnboundedReceiver<Frame>,
        events: mpsc::UnboundedSender<PumpEvent>,
        latch: DisconnectLatch,
    ) -> Self {
        let (stop, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run(transport, outbound, events, latch, stop_rx));
        Self { stop, task }
    }

    /// Whether the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ask the task to stop and wait for it.
    pub async fn stop(self) {
        self.stop.send_replace(true);
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "pump task failed");
        }
    }
}

async fn run<T: Transport>(
    mut transport: T,
    mut outbound: mpsc::UnboundedReceiver<Frame>,
    events: mpsc::UnboundedSender<PumpEvent>,
    latch: DisconnectLatch,
    mut stop: watch::Receiver<bool>,
) {
    let address = transport.address().to_owned();
    tracing::debug!(%address, "pump started");

    let mut outbound_open = true;
    let mut stopping = false;

    loop {
        if *stop.borrow() {
            stopping = true;
            break;
        }

        while let Ok(frame) = outbound.try_recv() {
            queue(&mut transport, frame);
        }
        if let Err(err) = transport.flush() {
            tracing::debug!(error = %err, "flush failed");
        }

        if let Err(err) = transport.update() {
            tracing::debug!(error = %err, "read step failed");
        }
        let mut session_gone = false;
        for frame in transport.take_received() {
            if events.send(PumpEvent::Frame(frame)).is_err() {
                session_gone = true;
                break;
            }
        }
        if session_gone {
            tracing::debug!("session gone, pump exiting");
            stopping = true;
            break;
        }
        if transport.is_closed() {
            break;
        }

        let wake = tokio::select! {
            biased;
            _ = stop.changed() => Wake::Stop,
            frame = outbound.recv(), if outbound_open => Wake::Outbound(frame),
            ready = transport.ready() => Wake::Ready(ready),
        };

        match wake {
            Wake::Stop => {
                stopping = true;
                break;
            },
            Wake::Outbound(Some(frame)) => queue(&mut transport, frame),
            Wake::Outbound(None) => outbound_open = false,
            Wake::Ready(Ok(())) => {},
            Wake::Ready(Err(err)) => tracing::debug!(error = %err, "readiness wait failed"),
        }
    }

    if stopping {
        while let Ok(frame) = outbound.try_recv() {
            queue(&mut transport, frame);
        }
        if let Err(err) = transport.flush() {
            tracing::debug!(error = %err, "final flush failed");
        }
    }

    let peer_closed = transport.is_closed();
    transport.close();

    if peer_closed && !stopping && latch.fire() {
        tracing::info!(%address, "connection lost");
        if events.send(PumpEvent::Disconnected).is_err() {
            tracing::debug!("session gone before disconnect report");
        }
    }
    tracing::debug!(%address, "pump stopped");
}

fn queue<T: Transport>(transport: &mut T, frame: Frame) {
    if let Err(err) = transport.send(frame) {
        tracing::warn!(error = %err, "outbound frame dropped");
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{ClientPayload, ServerPayload, payloads::roster::Chat};

    use super::*;
    use crate::transport::ChannelTransport;

    struct Harness {
        pump: ConnectionPump,
        outbound: mpsc::UnboundedSender<Frame>,
        events: mpsc::UnboundedReceiver<PumpEvent>,
        latch: DisconnectLatch,
    }

    async fn start(transport: ChannelTransport) -> Harness {
        let mut transport = transport;
        assert!(transport.open().await);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let latch = DisconnectLatch::new();
        let pump = ConnectionPump::spawn(transport, outbound_rx, events_tx, latch.clone());
        Harness { pump, outbound, events, latch }
    }

    fn chat(message: &str) -> Frame {
        ClientPayload::Chat(Chat { message: message.to_owned() }).into_frame(0).expect("encodes")
    }

    #[tokio::test]
    async fn frames_flow_both_ways() {
        let (transport, mut peer) = ChannelTransport::pair();
        let mut harness = start(transport).await;

        peer.send(ServerPayload::ServerVersionCheck).expect("client alive");
        let Some(PumpEvent::Frame(frame)) = harness.events.recv().await else {
            unreachable!("pump forwards inbound frames");
        };
        assert_eq!(ServerPayload::from_frame(&frame), Ok(ServerPayload::ServerVersionCheck));

        harness.outbound.send(chat("hello")).expect("pump alive");
        let sent = peer.next_frame().await.expect("pump writes");
        assert_eq!(
            ClientPayload::from_frame(&sent),
            Ok(ClientPayload::Chat(Chat { message: "hello".to_owned() }))
        );

        harness.pump.stop().await;
    }

    #[tokio::test]
    async fn stop_joins_and_flushes_queued_output() {
        let (transport, mut peer) = ChannelTransport::pair();
        let mut harness = start(transport).await;

        harness.outbound.send(chat("bye")).expect("pump alive");
        harness.pump.stop().await;

        let frames = peer.try_frames().expect("clean stream");
        assert_eq!(frames.len(), 1);
        assert!(harness.events.recv().await.is_none(), "no disconnect on local stop");
        assert!(!harness.latch.is_fired());
    }

    #[tokio::test]
    async fn peer_hangup_reports_once() {
        let (transport, peer) = ChannelTransport::pair();
        let mut harness = start(transport).await;
        drop(peer);

        assert_eq!(harness.events.recv().await, Some(PumpEvent::Disconnected));
        assert!(harness.events.recv().await.is_none());
        assert!(harness.latch.is_fired());
        harness.pump.stop().await;
    }

    #[tokio::test]
    async fn fired_latch_suppresses_report() {
        let (transport, peer) = ChannelTransport::pair();
        let mut harness = start(transport).await;
        assert!(harness.latch.fire());
        drop(peer);

        assert!(harness.events.recv().await.is_none());
    }
}
