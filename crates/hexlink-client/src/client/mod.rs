//! Client state machine.
//!
//! The [`Client`] owns the local [`GameState`] and everything derived from
//! it. Inbound frames are decoded once and routed by command tag to the
//! handler module for their concern; handlers mutate the store and push
//! [`ClientAction`]s describing the I/O the caller has to perform.

mod entities;
mod forces;
mod handshake;
mod reports;
mod roster;
mod turns;
mod world;

use hexlink_core::{GameEvent, GameState, NameTracker};
use hexlink_proto::{
    ClientPayload, Frame, ProtocolError, ServerPayload,
    model::{FeedbackKind, FeedbackRequest, FeedbackResponse, PlayerId},
};

use crate::{
    config::ClientConfig,
    error::ClientError,
    event::{ClientAction, ClientEvent, GameLogEntry},
    feedback::FeedbackTracker,
};

/// Actions collected while handling one event.
type Actions = Vec<ClientAction>;

/// Client for one session with a hexlink server.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    automated: bool,
    name: String,
    local_player: Option<PlayerId>,
    game: GameState,
    names: NameTracker,
    feedback: FeedbackTracker,
    connected: bool,
    ended: bool,
    game_log_started: bool,
}

impl Client {
    /// Create a client for a new session.
    pub fn new(config: ClientConfig) -> Self {
        let name = config.player_name.clone();
        Self {
            config,
            automated: false,
            name,
            local_player: None,
            game: GameState::new(),
            names: NameTracker::new(),
            feedback: FeedbackTracker::new(),
            connected: false,
            ended: false,
            game_log_started: false,
        }
    }

    /// Mark this seat as played by an automated collaborator.
    #[must_use]
    pub fn with_automation(mut self, automated: bool) -> Self {
        self.automated = automated;
        self
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current player name; the server may have corrected it.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local player id, once the server assigned one.
    #[must_use]
    pub fn local_player(&self) -> Option<PlayerId> {
        self.local_player
    }

    /// Local game state.
    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Display-name tracker for local entities.
    #[must_use]
    pub fn names(&self) -> &NameTracker {
        &self.names
    }

    /// Outstanding feedback request of one kind.
    #[must_use]
    pub fn outstanding_feedback(&self, kind: FeedbackKind) -> Option<&FeedbackRequest> {
        self.feedback.outstanding(kind)
    }

    /// Whether the handshake completed and the session has not ended.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected && !self.ended
    }

    /// Whether the session ended. An ended client ignores every event.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Process an event and return the actions to execute.
    pub fn handle(&mut self, event: ClientEvent) -> Vec<ClientAction> {
        if self.ended {
            tracing::debug!(?event, "session ended, event ignored");
            return Vec::new();
        }

        let mut out = Vec::new();
        match event {
            ClientEvent::FrameReceived(frame) => self.handle_frame(&frame, &mut out),
            ClientEvent::TransportClosed => {
                tracing::info!("transport closed by peer");
                self.end_session(&mut out);
            },
            ClientEvent::CloseRequested => {
                if self.connected {
                    out.push(ClientAction::Send(ClientPayload::CloseConnection));
                }
                self.end_session(&mut out);
            },
        }
        out
    }

    /// Check an outbound payload against the session state.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` before the greeting or after the end
    pub fn send(&mut self, payload: ClientPayload) -> Result<ClientAction, ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        Ok(ClientAction::Send(payload))
    }

    /// Answer an outstanding feedback request.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` outside a live session
    /// - `ClientError::NoOutstandingRequest` if no request of the answer's
    ///   kind is waiting
    pub fn answer_feedback(
        &mut self,
        response: FeedbackResponse,
    ) -> Result<ClientAction, ClientError> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        self.feedback.answer(&response)?;
        Ok(ClientAction::Send(ClientPayload::ClientFeedbackRequest(response)))
    }

    fn handle_frame(&mut self, frame: &Frame, out: &mut Actions) {
        let payload = match ServerPayload::from_frame(frame) {
            Ok(payload) => payload,
            Err(ProtocolError::UnknownCommand(raw)) => {
                tracing::warn!(command = raw, "unknown command tag, frame ignored");
                return;
            },
            Err(err) => {
                tracing::warn!(command = frame.header.command(), error = %err, "malformed frame skipped");
                return;
            },
        };

        tracing::trace!(command = ?payload.command(), sequence = frame.header.sequence(), "dispatch");
        self.dispatch(payload, out);
    }

    fn dispatch(&mut self, payload: ServerPayload, out: &mut Actions) {
        match payload {
            ServerPayload::CloseConnection => self.on_server_close(out),
            ServerPayload::ServerVersionCheck => self.on_version_check(out),
            ServerPayload::ServerGreeting => self.on_greeting(out),
            ServerPayload::IllegalClientVersion(p) => self.on_illegal_version(p, out),
            ServerPayload::ServerCorrectName(p) => self.on_correct_name(p, out),
            ServerPayload::LocalPlayerNumber(p) => self.on_local_player(p),

            ServerPayload::PlayerAdd(p) | ServerPayload::PlayerUpdate(p) => {
                self.on_player_info(p, out);
            },
            ServerPayload::PlayerRemove(p) => self.on_player_remove(p, out),
            ServerPayload::PlayerReady(p) => self.on_player_ready(p, out),
            ServerPayload::Chat(p) => self.on_chat(p, out),

            ServerPayload::SendingEntities(p) => self.on_entity_resync(p, out),
            ServerPayload::EntityAdd(p) => self.on_entities_added(p, out),
            ServerPayload::EntityUpdate(p) => self.on_entity_update(p, out),
            ServerPayload::EntityMultiUpdate(p) => self.on_entity_batch(p, out),
            ServerPayload::EntityRemove(p) => self.on_entities_removed(p, out),
            ServerPayload::EntityVisibilityIndicator(p) => self.on_visibility(p, out),
            ServerPayload::EntityNovaNetworkChange(p) => self.on_nova_network(p, out),
            ServerPayload::EntityAttack(p) => self.on_attacks(p, out),

            ServerPayload::ForceUpdate(p) => self.on_force_update(p, out),
            ServerPayload::ForceDelete(p) => self.on_force_delete(&p.force_ids, out),

            ServerPayload::SendingBoard(p) => self.on_board(p, out),
            ServerPayload::ChangeHex(p) => self.on_hex_changes(vec![p], out),
            ServerPayload::ChangeHexes(p) => self.on_hex_changes(p.changes, out),
            ServerPayload::BuildingUpdate(p) => self.on_buildings(p, out),
            ServerPayload::BuildingCollapse(p) => self.on_building_collapse(&p.coords, out),
            ServerPayload::SendingMinefields(p) => self.on_minefields_resync(p, out),
            ServerPayload::DeployMinefields(p) => self.on_minefields_added(p.minefields, out),
            ServerPayload::RevealMinefield(p) => self.on_minefields_added(vec![p.minefield], out),
            ServerPayload::RemoveMinefield(p) => self.on_minefield_removed(&p.minefield, out),
            ServerPayload::UpdateMinefields(p) => self.on_minefield_density(&p.minefields, out),
            ServerPayload::SendingIlluminatedHexes(p) => self.on_illuminated(Some(p.coords), out),
            ServerPayload::ClearIlluminatedHexes => self.on_illuminated(None, out),
            ServerPayload::AddSmokeCloud(p) => self.on_smoke_cloud(p, out),
            ServerPayload::SendingAvailableMapSizes(p) => self.on_map_sizes(p, out),
            ServerPayload::SendingSpecialHexDisplay(p) => self.on_special_hex_displays(p, out),
            ServerPayload::SendingArtilleryAttacks(p) => self.on_artillery(p, out),
            ServerPayload::SendingFlares(p) => self.on_flares(p, out),
            ServerPayload::SendingTagInfo(p) => self.on_tag_info(Some(p.tags), out),
            ServerPayload::ResetTagInfo => self.on_tag_info(None, out),

            ServerPayload::SendingGameSettings(p) => self.on_game_settings(p, out),
            ServerPayload::SendingMapSettings(p) => self.on_map_settings(p, out),
            ServerPayload::SendingPlanetaryConditions(p) => self.on_planetary_conditions(p, out),

            ServerPayload::PhaseChange(p) => self.on_phase_change(p, out),
            ServerPayload::Turn(p) => self.on_turn(p, out),
            ServerPayload::RoundUpdate(p) => self.on_round(p, out),
            ServerPayload::SendingTurns(p) => self.on_turns(p, out),

            ServerPayload::SendingReports(p) => self.on_phase_reports(p, false, out),
            ServerPayload::SendingReportsTacticalGenius(p) => self.on_phase_reports(p, true, out),
            ServerPayload::SendingReportsSpecial(p) => self.on_special_reports(&p, out),
            ServerPayload::SendingReportsAll(p) => self.on_all_reports(p, out),

            ServerPayload::ClientFeedbackRequest(request) => self.on_feedback_request(request, out),
            ServerPayload::EndOfGame(p) => self.on_end_of_game(p, out),
            ServerPayload::GameVictoryEvent => out.push(ClientAction::Notify(GameEvent::Victory)),
        }
    }

    fn on_feedback_request(&mut self, request: FeedbackRequest, out: &mut Actions) {
        if let Some(previous) = self.feedback.record(request.clone()) {
            tracing::warn!(kind = ?previous.kind(), "unanswered feedback request replaced");
        }
        out.push(ClientAction::Notify(GameEvent::FeedbackRequested(request)));
    }

    /// End the session: one disconnect notification, then stop.
    fn end_session(&mut self, out: &mut Actions) {
        self.ended = true;
        self.connected = false;
        self.feedback.clear();
        out.push(ClientAction::Notify(GameEvent::Disconnected));
        out.push(ClientAction::Disconnect);
    }

    /// Open the game log if it is enabled and not open yet.
    fn start_game_log(&mut self, out: &mut Actions) {
        if self.config.keep_game_log && !self.game_log_started {
            self.game_log_started = true;
            out.push(ClientAction::GameLog(GameLogEntry::Start));
        }
    }

    fn append_game_log(&self, text: String, out: &mut Actions) {
        if self.config.keep_game_log && self.game_log_started {
            out.push(ClientAction::GameLog(GameLogEntry::Append(text)));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use hexlink_proto::payloads::session::LocalPlayerNumber;

    use super::*;

    /// Encode a server payload the way it arrives on the wire.
    pub(crate) fn inbound(payload: ServerPayload) -> ClientEvent {
        ClientEvent::FrameReceived(payload.into_frame(0).expect("payload encodes"))
    }

    /// A client that completed the handshake as player 1.
    pub(crate) fn connected_client() -> Client {
        let mut client = Client::new(ClientConfig { keep_game_log: false, ..ClientConfig::named("Tester") });
        client.handle(inbound(ServerPayload::ServerGreeting));
        client.handle(inbound(ServerPayload::LocalPlayerNumber(LocalPlayerNumber { player_id: 1 })));
        client
    }

    pub(crate) fn sends(actions: &[ClientAction]) -> Vec<&ClientPayload> {
        actions.iter().filter_map(ClientAction::as_send).collect()
    }

    pub(crate) fn notifications(actions: &[ClientAction]) -> Vec<&GameEvent> {
        actions.iter().filter_map(ClientAction::as_notify).collect()
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let mut client = connected_client();
        let frame = ServerPayload::ServerGreeting.into_frame(0).expect("encodes");
        let mut wire = Vec::new();
        frame.encode(&mut wire).expect("frame encodes");
        wire[6..8].copy_from_slice(&0x7f7f_u16.to_be_bytes());
        let frame = Frame::decode(&wire).expect("header still valid");

        let actions = client.handle(ClientEvent::FrameReceived(frame));
        assert!(actions.is_empty());
        assert!(client.is_connected());
    }

    #[test]
    fn malformed_payload_is_skipped() {
        let mut client = connected_client();
        let header = hexlink_proto::FrameHeader::new(hexlink_proto::CommandTag::EntityUpdate);
        let frame = Frame::new(header, vec![0xff, 0x00, 0x13]);

        let actions = client.handle(ClientEvent::FrameReceived(frame));
        assert!(actions.is_empty());
        assert!(client.is_connected());
    }

    #[test]
    fn local_close_says_goodbye_once() {
        let mut client = connected_client();

        let actions = client.handle(ClientEvent::CloseRequested);
        assert_eq!(sends(&actions), [&ClientPayload::CloseConnection]);
        assert_eq!(notifications(&actions), [&GameEvent::Disconnected]);
        assert_eq!(actions.last(), Some(&ClientAction::Disconnect));

        assert!(client.handle(ClientEvent::TransportClosed).is_empty());
        assert!(client.handle(ClientEvent::CloseRequested).is_empty());
    }

    #[test]
    fn send_requires_handshake() {
        let mut client = Client::new(ClientConfig::default());
        let payload = ClientPayload::ForwardInitiative;
        assert_eq!(client.send(payload.clone()), Err(ClientError::NotConnected));

        client.handle(inbound(ServerPayload::ServerGreeting));
        assert_eq!(client.send(payload.clone()), Ok(ClientAction::Send(payload)));
    }

    #[test]
    fn feedback_answer_requires_request() {
        let mut client = connected_client();
        let answer = FeedbackResponse::DominoEffect { path: None };
        assert_eq!(
            client.answer_feedback(answer.clone()),
            Err(ClientError::NoOutstandingRequest(FeedbackKind::DominoEffect))
        );

        let actions = client.handle(inbound(ServerPayload::ClientFeedbackRequest(
            FeedbackRequest::DominoEffect { entity_id: 9 },
        )));
        assert_eq!(
            notifications(&actions),
            [&GameEvent::FeedbackRequested(FeedbackRequest::DominoEffect { entity_id: 9 })]
        );

        let reply = client.answer_feedback(answer.clone()).expect("request outstanding");
        assert_eq!(reply, ClientAction::Send(ClientPayload::ClientFeedbackRequest(answer)));
        assert!(client.outstanding_feedback(FeedbackKind::DominoEffect).is_none());
    }
}
