//! Turn, phase, round, report and end-of-game payloads.

use serde::{Deserialize, Serialize};

use crate::model::{GamePhase, PlayerId, Report, TurnDescriptor};

/// Phase changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseChange {
    /// New phase.
    pub phase: GamePhase,
}

/// Turn cursor moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnChange {
    /// New cursor.
    pub index: u32,
    /// Player who acted last.
    pub previous_player: Option<PlayerId>,
}

/// Round counter changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundUpdate {
    /// Round number.
    pub round: u32,
}

/// Full turn queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnQueue {
    /// Turns in order.
    pub turns: Vec<TurnDescriptor>,
}

/// Report fragments for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reports {
    /// Fragments in order.
    pub reports: Vec<Report>,
}

/// Report fragments for every round, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllReports {
    /// One fragment list per round.
    pub rounds: Vec<Vec<Report>>,
}

/// Game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndOfGame {
    /// Final entity status text, persisted locally.
    pub entity_status: String,
    /// Winning player, if a single player won.
    pub victory_player: Option<PlayerId>,
    /// Winning team, if a team won.
    pub victory_team: Option<u32>,
}
