//! Phase, turn and round flow, and the end of the game.

use hexlink_core::{GameEvent, PhaseEffect, phase};
use hexlink_proto::{
    ClientPayload,
    model::GamePhase,
    payloads::{
        roster::Ready,
        turn::{EndOfGame, PhaseChange, RoundUpdate, TurnChange, TurnQueue},
    },
};

use super::{Actions, Client};
use crate::event::ClientAction;

impl Client {
    /// Enter a phase and run its entry effects.
    ///
    /// The store only changes when the phase actually differs; the effects
    /// run every time the server announces the phase.
    pub(super) fn on_phase_change(&mut self, payload: PhaseChange, out: &mut Actions) {
        let phase = payload.phase;
        let changed = self.game.set_phase(phase);
        if !changed {
            tracing::debug!(%phase, "phase announced again");
        }

        for effect in phase::entry_effects(phase) {
            match effect {
                PhaseEffect::AcknowledgeReady => {
                    out.push(ClientAction::Send(ClientPayload::PlayerReady(Ready { done: true })));
                },
                PhaseEffect::ReleaseLobbyCaches => out.push(ClientAction::ReleaseLobbyCaches),
                PhaseEffect::ResetNameTracker => self.names.clear(),
                PhaseEffect::LoadLobbyCaches => out.push(ClientAction::LoadLobbyCaches),
                PhaseEffect::Checkpoint(label) => tracing::debug!(
                    phase = label,
                    entities = self.game.entity_count(),
                    out_of_game = self.game.out_of_game().len(),
                    "resource checkpoint"
                ),
            }
        }

        if changed {
            out.push(ClientAction::Notify(GameEvent::PhaseChanged { phase }));
        }
    }

    pub(super) fn on_turn(&mut self, payload: TurnChange, out: &mut Actions) {
        let requested = payload.index as usize;
        let applied = self.game.advance_turn(requested, payload.previous_player);
        if applied != requested {
            tracing::warn!(requested, applied, turns = self.game.turns().len(), "turn index clamped");
        }
        self.notify_turn(out);
    }

    pub(super) fn on_round(&mut self, payload: RoundUpdate, out: &mut Actions) {
        let round = payload.round;
        if round < self.game.round() {
            tracing::debug!(round, current = self.game.round(), "round counter moved back");
        }
        self.game.set_round(round);
        out.push(ClientAction::Notify(GameEvent::RoundChanged { round }));
    }

    pub(super) fn on_turns(&mut self, payload: TurnQueue, out: &mut Actions) {
        self.game.replace_turns(payload.turns);
        self.notify_turn(out);
    }

    pub(super) fn on_end_of_game(&mut self, payload: EndOfGame, out: &mut Actions) {
        let EndOfGame { entity_status, victory_player, victory_team } = payload;
        let entering_victory = self.game.phase() != GamePhase::Victory;

        self.game.end_game(victory_player, victory_team);
        tracing::info!(?victory_player, ?victory_team, "game over");

        out.push(ClientAction::PersistEntityStatus(entity_status));
        if entering_victory {
            out.push(ClientAction::Notify(GameEvent::PhaseChanged { phase: GamePhase::Victory }));
        }
        out.push(ClientAction::Notify(GameEvent::GameEnded { victory_player, victory_team }));
    }

    fn notify_turn(&self, out: &mut Actions) {
        let player_id = self.game.turns().current().and_then(|t| t.player_id);
        out.push(ClientAction::Notify(GameEvent::TurnChanged { player_id }));
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{ServerPayload, model::TurnDescriptor};

    use super::*;
    use crate::client::tests::{connected_client, inbound, notifications, sends};

    fn phase(phase: GamePhase) -> ServerPayload {
        ServerPayload::PhaseChange(PhaseChange { phase })
    }

    #[test]
    fn exchange_acknowledges_every_time() {
        let mut client = connected_client();
        let ready = ClientPayload::PlayerReady(Ready { done: true });

        let first = client.handle(inbound(phase(GamePhase::Exchange)));
        assert_eq!(sends(&first), [&ready]);
        assert_eq!(notifications(&first), [&GameEvent::PhaseChanged { phase: GamePhase::Exchange }]);

        let again = client.handle(inbound(phase(GamePhase::Exchange)));
        assert_eq!(sends(&again), [&ready]);
        assert!(notifications(&again).is_empty());
        assert_eq!(client.game().phase(), GamePhase::Exchange);
    }

    #[test]
    fn lounge_resets_names_and_loads_caches() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::EntityAdd(
            hexlink_proto::payloads::entity::EntitiesAdded {
                entity_ids: vec![1],
                entities: vec![hexlink_proto::model::Entity::new(1, 1, "Atlas", "")],
                forces: Vec::new(),
            },
        )));
        assert_eq!(client.names().len(), 1);

        let actions = client.handle(inbound(phase(GamePhase::Lounge)));
        assert!(client.names().is_empty());
        assert!(actions.contains(&ClientAction::LoadLobbyCaches));
    }

    #[test]
    fn deployment_releases_lobby_caches() {
        let mut client = connected_client();
        let actions = client.handle(inbound(phase(GamePhase::Deployment)));
        assert_eq!(actions.first(), Some(&ClientAction::ReleaseLobbyCaches));
    }

    #[test]
    fn turn_index_is_clamped() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::SendingTurns(TurnQueue {
            turns: vec![TurnDescriptor::normal(1), TurnDescriptor::normal(2)],
        })));

        let actions = client.handle(inbound(ServerPayload::Turn(TurnChange { index: 9, previous_player: Some(1) })));
        assert_eq!(client.game().turns().index(), 1);
        assert_eq!(notifications(&actions), [&GameEvent::TurnChanged { player_id: Some(2) }]);
    }

    #[test]
    fn end_of_game_persists_status_and_enters_victory() {
        let mut client = connected_client();
        let actions = client.handle(inbound(ServerPayload::EndOfGame(EndOfGame {
            entity_status: "Atlas: destroyed".to_owned(),
            victory_player: Some(1),
            victory_team: None,
        })));

        assert_eq!(client.game().phase(), GamePhase::Victory);
        assert_eq!(actions.first(), Some(&ClientAction::PersistEntityStatus("Atlas: destroyed".to_owned())));
        assert!(notifications(&actions)
            .contains(&&GameEvent::GameEnded { victory_player: Some(1), victory_team: None }));
        assert!(client.game().result().is_some_and(|r| r.victory_player == Some(1)));
    }
}
