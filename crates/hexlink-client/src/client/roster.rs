//! Player roster and chat.

use hexlink_core::GameEvent;
use hexlink_proto::payloads::roster::{Chat, PlayerInfo, PlayerReadyState, PlayerRemove};

use super::{Actions, Client};
use crate::event::ClientAction;

impl Client {
    pub(super) fn on_player_info(&mut self, payload: PlayerInfo, out: &mut Actions) {
        let PlayerInfo { player_id, mut player } = payload;
        if player.id != player_id {
            tracing::debug!(player_id, record_id = player.id, "player record id follows its slot");
            player.id = player_id;
        }
        self.game.upsert_player(player);
        out.push(ClientAction::Notify(GameEvent::PlayerChanged { player_id }));
    }

    pub(super) fn on_player_remove(&mut self, payload: PlayerRemove, out: &mut Actions) {
        let player_id = payload.player_id;
        if self.game.remove_player(player_id).is_none() {
            tracing::debug!(player_id, "remove of unknown player ignored");
            return;
        }
        out.push(ClientAction::Notify(GameEvent::PlayerRemoved { player_id }));
    }

    pub(super) fn on_player_ready(&mut self, payload: PlayerReadyState, out: &mut Actions) {
        let PlayerReadyState { player_id, done } = payload;
        if !self.game.set_player_done(player_id, done) {
            tracing::debug!(player_id, "ready flag for unknown player ignored");
            return;
        }
        out.push(ClientAction::Notify(GameEvent::PlayerChanged { player_id }));
    }

    pub(super) fn on_chat(&mut self, payload: Chat, out: &mut Actions) {
        self.start_game_log(out);
        self.append_game_log(payload.message.clone(), out);
        out.push(ClientAction::Notify(GameEvent::Chat { message: payload.message }));
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{ServerPayload, model::Player};

    use super::*;
    use crate::{
        client::tests::{connected_client, inbound, notifications},
        config::ClientConfig,
        event::GameLogEntry,
    };

    #[test]
    fn player_add_then_ready() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::PlayerAdd(PlayerInfo {
            player_id: 2,
            player: Player::new(2, "Hanse"),
        })));

        let actions =
            client.handle(inbound(ServerPayload::PlayerReady(PlayerReadyState { player_id: 2, done: true })));
        assert_eq!(notifications(&actions), [&GameEvent::PlayerChanged { player_id: 2 }]);
        assert!(client.game().player(2).is_some_and(|p| p.done));
    }

    #[test]
    fn ready_for_unknown_player_is_noop() {
        let mut client = connected_client();
        let actions =
            client.handle(inbound(ServerPayload::PlayerReady(PlayerReadyState { player_id: 8, done: true })));
        assert!(actions.is_empty());
        assert!(client.game().player(8).is_none());
    }

    #[test]
    fn player_remove_notifies_once() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::PlayerUpdate(PlayerInfo {
            player_id: 3,
            player: Player::new(3, "Katrina"),
        })));

        let remove = || inbound(ServerPayload::PlayerRemove(PlayerRemove { player_id: 3 }));
        assert_eq!(
            notifications(&client.handle(remove())),
            [&GameEvent::PlayerRemoved { player_id: 3 }]
        );
        assert!(client.handle(remove()).is_empty());
    }

    #[test]
    fn first_chat_starts_game_log() {
        let mut client = Client::new(ClientConfig::named("Tester"));
        let chat = |text: &str| inbound(ServerPayload::Chat(Chat { message: text.to_owned() }));

        let first = client.handle(chat("hello"));
        assert_eq!(
            first,
            [
                ClientAction::GameLog(GameLogEntry::Start),
                ClientAction::GameLog(GameLogEntry::Append("hello".to_owned())),
                ClientAction::Notify(GameEvent::Chat { message: "hello".to_owned() }),
            ]
        );

        let second = client.handle(chat("again"));
        assert_eq!(second.first(), Some(&ClientAction::GameLog(GameLogEntry::Append("again".to_owned()))));
    }

    #[test]
    fn chat_without_game_log_only_notifies() {
        let mut client = connected_client();
        let actions = client.handle(inbound(ServerPayload::Chat(Chat { message: "gg".to_owned() })));
        assert_eq!(actions, [ClientAction::Notify(GameEvent::Chat { message: "gg".to_owned() })]);
    }
}
