use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Entry in the player roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Player {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Team number; 0 means no team.
    pub team: u32,
    /// Ready in the lobby.
    pub ready: bool,
    /// Finished the current phase.
    pub done: bool,
    /// Played by an automated client.
    pub bot: bool,
    /// Watching only.
    pub observer: bool,
}

impl Player {
    /// A new human player with no team.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), team: 0, ready: false, done: false, bot: false, observer: false }
    }
}
