//! Line-oriented console: stdin lines in, notification text out.

use hexlink_client::{GameEvent, ReportKind, commands::COMMAND_PREFIX};

/// What a line typed at the console asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Run a local `#command`.
    Command(String),
    /// Send a chat line.
    Chat(String),
}

/// Classify one console line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with(COMMAND_PREFIX) {
        Some(Input::Command(line.to_owned()))
    } else {
        Some(Input::Chat(line.to_owned()))
    }
}

/// Text to show for a notification, if it is worth showing.
///
/// Store-level changes (entities, forces, board) are left to `#sitrep`.
pub fn describe(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::Connected => "Connected.".to_owned(),
        GameEvent::Disconnected => "Disconnected.".to_owned(),
        GameEvent::VersionRejected { server_version, client_version } => format!(
            "Server runs version {server_version}, this client is {client_version}. Connection refused."
        ),
        GameEvent::NameCorrected { name } => format!("Server renamed you to {name}."),
        GameEvent::Chat { message } => message.clone(),
        GameEvent::PhaseChanged { phase } => format!("-- {phase} --"),
        GameEvent::RoundChanged { round } => format!("Round {round}."),
        GameEvent::ReportReady { kind: ReportKind::Phase | ReportKind::Special, text } => text.clone(),
        GameEvent::FeedbackRequested(request) => {
            format!("Server asks for a decision: {:?}.", request.kind())
        },
        GameEvent::GameEnded { victory_player, victory_team } => match (victory_player, victory_team) {
            (Some(player), _) => format!("Game over. Player {player} wins."),
            (None, Some(team)) => format!("Game over. Team {team} wins."),
            (None, None) => "Game over. Draw.".to_owned(),
        },
        GameEvent::Victory => "Victory!".to_owned(),
        GameEvent::ReportReady { kind: ReportKind::Round, .. }
        | GameEvent::EntityChanged { .. }
        | GameEvent::EntitiesReplaced
        | GameEvent::EntitiesRemoved { .. }
        | GameEvent::ForcesChanged { .. }
        | GameEvent::BoardChanged
        | GameEvent::SettingsChanged(_)
        | GameEvent::PlayerChanged { .. }
        | GameEvent::PlayerRemoved { .. }
        | GameEvent::TurnChanged { .. } => return None,
    };
    Some(text)
}
