//! Session actor.
//!
//! A [`Session`] opens a transport, starts its [`ConnectionPump`] and runs
//! one task that owns the [`Client`]. Inbound frames and local requests
//! arrive at that task over channels and are handled one at a time, so the
//! game state never needs a lock.
//!
//! ```text
//!  transport <──> pump ──PumpEvent──> actor ──GameEvent──> presentation
//!                  ^                  │  ^
//!                  └──── Outbox ──────┘  └── SessionCommand ── SessionSender
//! ```

use std::collections::VecDeque;

use hexlink_core::{DisconnectLatch, GameEvent, GameState};
use hexlink_proto::{
    ClientPayload, Frame,
    model::{FeedbackRequest, FeedbackResponse},
};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    client::Client,
    commands::CommandRegistry,
    config::ClientConfig,
    error::{ClientError, SessionError},
    event::{ClientAction, ClientEvent, GameLogEntry},
    gamelog::{self, GameLog},
    pump::{ConnectionPump, PumpEvent},
    transport::Transport,
};

/// FIFO of outbound frames, drained by the pump.
#[derive(Debug, Clone)]
pub struct Outbox {
    frames: mpsc::UnboundedSender<Frame>,
}

impl Outbox {
    /// Encode and queue a payload. The connection stamps the sequence.
    ///
    /// # Errors
    ///
    /// - `SessionError::Client` if the payload does not encode
    /// - `SessionError::ChannelClosed` once the pump is gone
    pub fn send(&self, payload: ClientPayload) -> Result<(), SessionError> {
        let frame = payload.into_frame(0).map_err(ClientError::from)?;
        self.frames.send(frame).map_err(|_| SessionError::ChannelClosed)
    }
}

/// Makes the decisions a seated player would make.
///
/// The default methods decide nothing, which is what a human seat wants:
/// the presentation layer answers through [`SessionSender`] instead.
pub trait Decider: Send + 'static {
    /// Whether this seat is automated; sent as the bot flag in the handshake.
    fn is_automated(&self) -> bool {
        false
    }

    /// Answer a feedback request, or `None` to leave it to the user.
    fn on_feedback(&mut self, _request: &FeedbackRequest, _game: &GameState) -> Option<FeedbackResponse> {
        None
    }

    /// React to a change; returned payloads are sent in order.
    fn on_event(&mut self, _event: &GameEvent, _game: &GameState) -> Vec<ClientPayload> {
        Vec::new()
    }
}

/// Seat played by a person.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanDecider;

impl Decider for HumanDecider {}

/// Request from outside the actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Send a payload once connected.
    Send {
        /// Payload to send.
        payload: ClientPayload,
        /// Whether the client accepted it.
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    /// Answer an outstanding feedback request.
    Answer {
        /// The answer.
        response: FeedbackResponse,
        /// Whether a request of that kind was waiting.
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    /// Run a `#command` line.
    RunCommand {
        /// Line as typed.
        line: String,
        /// Reply text.
        reply: oneshot::Sender<String>,
    },
    /// Say goodbye and end the session.
    Close,
}

/// Session under construction.
pub struct Session<T, D> {
    config: ClientConfig,
    transport: T,
    decider: D,
    commands: CommandRegistry,
}

impl<T: Transport, D: Decider> Session<T, D> {
    /// Session over `transport` with the built-in commands only.
    pub fn new(config: ClientConfig, transport: T, decider: D) -> Self {
        Self { config, transport, decider, commands: CommandRegistry::new() }
    }

    /// Use `commands` for `#command` lines.
    #[must_use]
    pub fn with_commands(mut self, commands: CommandRegistry) -> Self {
        self.commands = commands;
        self
    }

    /// Open the transport and spawn the pump and actor tasks.
    ///
    /// # Errors
    ///
    /// - `SessionError::ConnectFailed` if the transport does not open
    pub async fn start(self) -> Result<SessionHandle, SessionError> {
        let Self { config, mut transport, decider, commands } = self;

        if !transport.open().await {
            return Err(SessionError::ConnectFailed { address: transport.address().to_owned() });
        }

        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (pump_tx, pump_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let latch = DisconnectLatch::new();
        let pump = ConnectionPump::spawn(transport, frames_rx, pump_tx, latch.clone());

        let game_log = GameLog::new(config.game_log_path.clone());
        let client = Client::new(config).with_automation(decider.is_automated());
        let actor = Actor {
            client,
            decider,
            commands,
            outbox: Outbox { frames: frames_tx },
            events: events_tx,
            latch,
            game_log,
            pump: Some(pump),
        };
        let task = tokio::spawn(actor.run(pump_rx, commands_rx));

        Ok(SessionHandle { sender: SessionSender { commands: commands_tx }, events: events_rx, task })
    }
}

/// Cloneable request side of a running session.
#[derive(Debug, Clone)]
pub struct SessionSender {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionSender {
    /// Send a payload.
    ///
    /// # Errors
    ///
    /// - `SessionError::Client` if the client is not connected
    /// - `SessionError::ChannelClosed` once the session ended
    pub async fn send(&self, payload: ClientPayload) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.request(SessionCommand::Send { payload, reply })?;
        Ok(rx.await.map_err(|_| SessionError::ChannelClosed)??)
    }

    /// Answer an outstanding feedback request.
    ///
    /// # Errors
    ///
    /// - `SessionError::Client` if nothing of that kind is outstanding
    /// - `SessionError::ChannelClosed` once the session ended
    pub async fn answer(&self, response: FeedbackResponse) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.request(SessionCommand::Answer { response, reply })?;
        Ok(rx.await.map_err(|_| SessionError::ChannelClosed)??)
    }

    /// Run a `#command` line and return its reply.
    ///
    /// # Errors
    ///
    /// - `SessionError::ChannelClosed` once the session ended
    pub async fn run_command(&self, line: impl Into<String>) -> Result<String, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.request(SessionCommand::RunCommand { line: line.into(), reply })?;
        rx.await.map_err(|_| SessionError::ChannelClosed)
    }

    /// Ask the session to end.
    ///
    /// # Errors
    ///
    /// - `SessionError::ChannelClosed` if it already ended
    pub fn close(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Close)
    }

    fn request(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::ChannelClosed)
    }
}

/// Running session: requests in, notifications out.
#[derive(Debug)]
pub struct SessionHandle {
    sender: SessionSender,
    events: mpsc::UnboundedReceiver<GameEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Request side, for use from other tasks.
    #[must_use]
    pub fn sender(&self) -> SessionSender {
        self.sender.clone()
    }

    /// Next notification; `None` after the session ended and every
    /// notification was taken.
    pub async fn next_event(&mut self) -> Option<GameEvent> {
        self.events.recv().await
    }

    /// Wait for the actor to finish.
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "session task failed");
        }
    }
}

enum Input {
    Pump(Option<PumpEvent>),
    Command(Option<SessionCommand>),
}

struct Actor<D> {
    client: Client,
    decider: D,
    commands: CommandRegistry,
    outbox: Outbox,
    events: mpsc::UnboundedSender<GameEvent>,
    latch: DisconnectLatch,
    game_log: GameLog,
    pump: Option<ConnectionPump>,
}

impl<D: Decider> Actor<D> {
    async fn run(
        mut self,
        mut pump_rx: mpsc::UnboundedReceiver<PumpEvent>,
        mut commands_rx: mpsc::UnboundedReceiver<SessionCommand>,
    ) {
        while !self.client.is_ended() {
            let input = tokio::select! {
                event = pump_rx.recv() => Input::Pump(event),
                command = commands_rx.recv() => Input::Command(command),
            };

            match input {
                Input::Pump(Some(PumpEvent::Frame(frame))) => {
                    let actions = self.client.handle(ClientEvent::FrameReceived(frame));
                    self.execute(actions).await;
                },
                Input::Pump(Some(PumpEvent::Disconnected) | None) => {
                    let actions = self.client.handle(ClientEvent::TransportClosed);
                    self.execute(actions).await;
                },
                Input::Command(Some(command)) => self.on_command(command).await,
                Input::Command(None) => {
                    tracing::debug!("every session sender dropped, closing");
                    let actions = self.client.handle(ClientEvent::CloseRequested);
                    self.execute(actions).await;
                },
            }
        }

        self.stop_pump().await;
        tracing::debug!("session actor stopped");
    }

    async fn on_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Send { payload, reply } => {
                let result = self.client.send(payload).map(|action| vec![action]);
                let accepted = self.run_accepted(result).await;
                if reply.send(accepted).is_err() {
                    tracing::debug!("send requester went away");
                }
            },
            SessionCommand::Answer { response, reply } => {
                let result = self.client.answer_feedback(response).map(|action| vec![action]);
                let accepted = self.run_accepted(result).await;
                if reply.send(accepted).is_err() {
                    tracing::debug!("answer requester went away");
                }
            },
            SessionCommand::RunCommand { line, reply } => {
                let output = self.commands.run(&line, self.client.game(), self.client.local_player());
                let mut actions = Vec::new();
                for payload in output.outbound {
                    match self.client.send(payload) {
                        Ok(action) => actions.push(action),
                        Err(err) => tracing::warn!(error = %err, "command output not sent"),
                    }
                }
                self.execute(actions).await;
                if reply.send(output.reply).is_err() {
                    tracing::debug!("command requester went away");
                }
            },
            SessionCommand::Close => {
                let actions = self.client.handle(ClientEvent::CloseRequested);
                self.execute(actions).await;
            },
        }
    }

    async fn run_accepted(&mut self, result: Result<Vec<ClientAction>, ClientError>) -> Result<(), ClientError> {
        let actions = result?;
        self.execute(actions).await;
        Ok(())
    }

    /// Perform actions in order, including any the decider adds.
    async fn execute(&mut self, actions: Vec<ClientAction>) {
        let mut queue: VecDeque<_> = actions.into();
        while let Some(action) = queue.pop_front() {
            match action {
                ClientAction::Send(payload) => {
                    let command = payload.command();
                    if let Err(err) = self.outbox.send(payload) {
                        tracing::warn!(?command, error = %err, "outbound payload dropped");
                    }
                },
                ClientAction::Notify(event) => {
                    queue.extend(self.decide(&event));
                    if self.events.send(event).is_err() {
                        tracing::trace!("no listener for notifications");
                    }
                },
                ClientAction::GameLog(entry) => {
                    let result = match &entry {
                        GameLogEntry::Start => self.game_log.start(),
                        GameLogEntry::Append(text) => self.game_log.append(text),
                    };
                    if let Err(err) = result {
                        tracing::warn!(path = %self.game_log.path().display(), error = %err, "game log write failed");
                    }
                },
                ClientAction::PersistEntityStatus(status) => {
                    let now = chrono::Local::now();
                    if let Err(err) = gamelog::persist_entity_status(self.client.config(), &status, now) {
                        tracing::warn!(error = %err, "entity status not saved");
                    }
                },
                ClientAction::ReleaseLobbyCaches => tracing::debug!("lobby caches released"),
                ClientAction::LoadLobbyCaches => tracing::debug!("lobby caches loaded"),
                ClientAction::Disconnect => {
                    self.latch.fire();
                    self.stop_pump().await;
                },
            }
        }
    }

    /// Let the decider answer feedback and react to the event.
    fn decide(&mut self, event: &GameEvent) -> Vec<ClientAction> {
        let mut actions = Vec::new();

        if let GameEvent::FeedbackRequested(request) = event
            && let Some(response) = self.decider.on_feedback(request, self.client.game())
        {
            match self.client.answer_feedback(response) {
                Ok(action) => actions.push(action),
                Err(err) => tracing::warn!(error = %err, "automatic feedback answer rejected"),
            }
        }

        for payload in self.decider.on_event(event, self.client.game()) {
            match self.client.send(payload) {
                Ok(action) => actions.push(action),
                Err(err) => tracing::debug!(error = %err, "decider payload not sent"),
            }
        }
        actions
    }

    async fn stop_pump(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.stop().await;
        }
    }
}
