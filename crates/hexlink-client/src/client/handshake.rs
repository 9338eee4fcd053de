//! Version check, greeting and session identity.

use hexlink_core::GameEvent;
use hexlink_proto::{
    ClientPayload,
    payloads::session::{
        ClientName, ClientVersions, CorrectName, IllegalClientVersion, LocalPlayerNumber,
    },
};

use super::{Actions, Client};
use crate::event::ClientAction;

impl Client {
    pub(super) fn on_version_check(&self, out: &mut Actions) {
        out.push(ClientAction::Send(ClientPayload::ClientVersions(ClientVersions {
            version: self.config.version.clone(),
            build: self.config.build.clone(),
        })));
    }

    pub(super) fn on_greeting(&mut self, out: &mut Actions) {
        self.connected = true;
        tracing::info!(name = %self.name, "connected");
        out.push(ClientAction::Notify(GameEvent::Connected));
        out.push(ClientAction::Send(ClientPayload::ClientName(ClientName {
            name: self.name.clone(),
            is_bot: self.automated,
        })));
    }

    pub(super) fn on_illegal_version(&mut self, payload: IllegalClientVersion, out: &mut Actions) {
        tracing::warn!(
            server_version = %payload.server_version,
            client_version = %self.config.version,
            "server rejected client version"
        );
        out.push(ClientAction::Notify(GameEvent::VersionRejected {
            server_version: payload.server_version,
            client_version: self.config.version.clone(),
        }));
        self.end_session(out);
    }

    pub(super) fn on_correct_name(&mut self, payload: CorrectName, out: &mut Actions) {
        tracing::info!(from = %self.name, to = %payload.name, "server corrected player name");
        self.name.clone_from(&payload.name);
        out.push(ClientAction::Notify(GameEvent::NameCorrected { name: payload.name }));
    }

    pub(super) fn on_local_player(&mut self, payload: LocalPlayerNumber) {
        tracing::debug!(player_id = payload.player_id, "local player assigned");
        self.local_player = Some(payload.player_id);
    }

    pub(super) fn on_server_close(&mut self, out: &mut Actions) {
        tracing::info!("server closed the connection");
        self.end_session(out);
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::ServerPayload;

    use super::*;
    use crate::{
        client::tests::{inbound, notifications, sends},
        config::ClientConfig,
        event::ClientEvent,
    };

    fn versioned(version: &str) -> Client {
        Client::new(ClientConfig {
            version: version.to_owned(),
            build: "abc123".to_owned(),
            ..ClientConfig::named("Kerensky")
        })
    }

    #[test]
    fn version_check_answered_with_versions() {
        let mut client = versioned("7.0");
        let actions = client.handle(inbound(ServerPayload::ServerVersionCheck));
        assert_eq!(
            sends(&actions),
            [&ClientPayload::ClientVersions(ClientVersions {
                version: "7.0".to_owned(),
                build: "abc123".to_owned(),
            })]
        );
        assert!(!client.is_connected());
    }

    #[test]
    fn greeting_connects_and_sends_name() {
        let mut client = versioned("7.0").with_automation(true);
        let actions = client.handle(inbound(ServerPayload::ServerGreeting));

        assert_eq!(notifications(&actions), [&GameEvent::Connected]);
        assert_eq!(
            sends(&actions),
            [&ClientPayload::ClientName(ClientName { name: "Kerensky".to_owned(), is_bot: true })]
        );
        assert!(client.is_connected());
    }

    #[test]
    fn correct_name_renames_client() {
        let mut client = versioned("7.0");
        client.handle(inbound(ServerPayload::ServerGreeting));
        let actions = client.handle(inbound(ServerPayload::ServerCorrectName(CorrectName {
            name: "Kerensky2".to_owned(),
        })));

        assert_eq!(client.name(), "Kerensky2");
        assert_eq!(
            notifications(&actions),
            [&GameEvent::NameCorrected { name: "Kerensky2".to_owned() }]
        );
    }

    #[test]
    fn server_close_ends_session() {
        let mut client = versioned("7.0");
        client.handle(inbound(ServerPayload::ServerGreeting));

        let actions = client.handle(inbound(ServerPayload::CloseConnection));
        assert_eq!(notifications(&actions), [&GameEvent::Disconnected]);
        assert!(sends(&actions).is_empty());
        assert!(client.is_ended());
        assert!(client.handle(ClientEvent::TransportClosed).is_empty());
    }
}
