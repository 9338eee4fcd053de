//! Whole-session scenarios driven through the Sans-IO client.
//!
//! Frames are encoded and fed in the order a server would send them; the
//! assertions look only at returned actions and the public store.

use hexlink_client::{Client, ClientAction, ClientConfig, ClientEvent, GameEvent};
use hexlink_proto::{
    ClientPayload, ServerPayload,
    model::{Entity, GamePhase, RemovalReason, TurnDescriptor},
    payloads::{
        entity::{EntitiesAdded, EntitiesRemoved},
        roster::Chat,
        session::{IllegalClientVersion, LocalPlayerNumber},
        turn::{EndOfGame, PhaseChange, RoundUpdate, TurnChange, TurnQueue},
    },
};
use proptest::prelude::*;

fn frame(payload: ServerPayload) -> ClientEvent {
    ClientEvent::FrameReceived(payload.into_frame(0).expect("payload encodes"))
}

fn sends(actions: &[ClientAction]) -> Vec<&ClientPayload> {
    actions.iter().filter_map(ClientAction::as_send).collect()
}

fn notifications(actions: &[ClientAction]) -> Vec<&GameEvent> {
    actions.iter().filter_map(ClientAction::as_notify).collect()
}

fn quiet_config(version: &str) -> ClientConfig {
    ClientConfig { version: version.to_owned(), keep_game_log: false, ..ClientConfig::named("Natasha") }
}

fn seated_client() -> Client {
    let mut client = Client::new(quiet_config("7.0"));
    client.handle(frame(ServerPayload::ServerVersionCheck));
    client.handle(frame(ServerPayload::ServerGreeting));
    client.handle(frame(ServerPayload::LocalPlayerNumber(LocalPlayerNumber { player_id: 1 })));
    client
}

#[test]
fn version_mismatch_ends_session() {
    let mut client = Client::new(quiet_config("7.0"));

    let check = client.handle(frame(ServerPayload::ServerVersionCheck));
    let [ClientPayload::ClientVersions(versions)] = sends(&check)[..] else {
        unreachable!("version check must be answered with versions");
    };
    assert_eq!(versions.version, "7.0");

    let rejected = client.handle(frame(ServerPayload::IllegalClientVersion(IllegalClientVersion {
        server_version: "6.5".to_owned(),
    })));
    assert_eq!(
        notifications(&rejected),
        [
            &GameEvent::VersionRejected {
                server_version: "6.5".to_owned(),
                client_version: "7.0".to_owned(),
            },
            &GameEvent::Disconnected,
        ]
    );
    assert_eq!(rejected.last(), Some(&ClientAction::Disconnect));
    assert!(client.is_ended());

    let later = [
        frame(ServerPayload::ServerGreeting),
        frame(ServerPayload::Chat(Chat { message: "hello?".to_owned() })),
        frame(ServerPayload::PhaseChange(PhaseChange { phase: GamePhase::Lounge })),
        ClientEvent::TransportClosed,
        ClientEvent::CloseRequested,
    ];
    for event in later {
        assert!(client.handle(event).is_empty());
    }
    assert_eq!(client.game().phase(), GamePhase::Unknown);
}

#[test]
fn never_joined_removal_renames_survivor_once() {
    let mut client = seated_client();
    for id in [6, 5] {
        client.handle(frame(ServerPayload::EntityAdd(EntitiesAdded {
            entity_ids: vec![id],
            entities: vec![Entity::new(id, 1, "Atlas", "")],
            forces: Vec::new(),
        })));
    }
    assert_eq!(client.game().entity(6).map(Entity::display_name).as_deref(), Some("Atlas #1"));

    let actions = client.handle(frame(ServerPayload::EntityRemove(EntitiesRemoved {
        entity_ids: vec![5],
        reason: RemovalReason::NeverJoined,
        forces: Vec::new(),
    })));

    let corrections: Vec<_> = sends(&actions)
        .into_iter()
        .filter_map(|p| match p {
            ClientPayload::EntityUpdate(change) => Some(change.entity.display_name()),
            _ => None,
        })
        .collect();
    assert_eq!(corrections, ["Atlas"]);
    assert!(client.game().entity(5).is_none());
}

#[test]
fn lounge_to_victory() {
    let mut client = seated_client();

    let lounge = client.handle(frame(ServerPayload::PhaseChange(PhaseChange { phase: GamePhase::Lounge })));
    assert!(lounge.contains(&ClientAction::LoadLobbyCaches));

    client.handle(frame(ServerPayload::RoundUpdate(RoundUpdate { round: 1 })));
    client.handle(frame(ServerPayload::PhaseChange(PhaseChange { phase: GamePhase::Movement })));
    client.handle(frame(ServerPayload::SendingTurns(TurnQueue {
        turns: vec![TurnDescriptor::normal(2), TurnDescriptor::normal(1)],
    })));
    assert!(!client.game().is_my_turn(1));

    client.handle(frame(ServerPayload::Turn(TurnChange { index: 1, previous_player: Some(2) })));
    assert!(client.game().is_my_turn(1));

    let end = client.handle(frame(ServerPayload::EndOfGame(EndOfGame {
        entity_status: String::new(),
        victory_player: None,
        victory_team: Some(1),
    })));
    assert!(end.contains(&ClientAction::PersistEntityStatus(String::new())));
    assert_eq!(client.game().phase(), GamePhase::Victory);

    let victory = client.handle(frame(ServerPayload::GameVictoryEvent));
    assert_eq!(notifications(&victory), [&GameEvent::Victory]);
}

proptest! {
    #[test]
    fn turn_cursor_stays_in_queue(
        len in 0u32..6,
        steps in prop::collection::vec((0u32..12, 0u32..8), 1..20),
    ) {
        let mut client = seated_client();
        client.handle(frame(ServerPayload::SendingTurns(TurnQueue {
            turns: (0..len).map(TurnDescriptor::normal).collect(),
        })));

        let mut last_round = 0;
        for (index, round) in steps {
            let round = last_round.max(round);
            client.handle(frame(ServerPayload::RoundUpdate(RoundUpdate { round })));
            client.handle(frame(ServerPayload::Turn(TurnChange { index, previous_player: None })));

            let turns = client.game().turns();
            prop_assert!((turns.is_empty() && turns.index() == 0) || turns.index() < turns.len());
            prop_assert!(client.game().round() >= last_round);
            last_round = client.game().round();
        }
    }
}
