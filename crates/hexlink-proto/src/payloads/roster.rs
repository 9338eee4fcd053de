//! Player roster and chat payloads.

use serde::{Deserialize, Serialize};

use crate::model::{Player, PlayerId};

/// Player record, inbound add or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerInfo {
    /// Roster slot.
    pub player_id: PlayerId,
    /// New record.
    pub player: Player,
}

/// Player left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerRemove {
    /// Departed player.
    pub player_id: PlayerId,
}

/// Another player's done flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerReadyState {
    /// Player.
    pub player_id: PlayerId,
    /// Done flag.
    pub done: bool,
}

/// Local done flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ready {
    /// Done flag.
    pub done: bool,
}

/// Player record sent by its owner (settings, custom initiative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSettings {
    /// Record as edited locally.
    pub player: Player,
}

/// Move players to a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamChange {
    /// Players to move.
    pub player_ids: Vec<PlayerId>,
    /// Target team.
    pub team: u32,
}

/// Chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chat {
    /// Message text.
    pub message: String,
}
