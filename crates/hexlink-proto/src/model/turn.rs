use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId};

/// Stage of a game round.
///
/// Declaration order is the order a round runs through; the lobby and
/// synchronization-only steps come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not yet known (before the first phase change).
    Unknown,
    /// Pre-game lobby.
    Lounge,
    /// Server and clients exchange final lobby state.
    Exchange,
    /// Scenario setup.
    StartingScenario,
    /// Units placed on the board.
    Deployment,
    /// Initiative rolled.
    Initiative,
    /// Initiative results.
    InitiativeReport,
    /// Off-board artillery targeting.
    Targeting,
    /// Targeting results.
    TargetingReport,
    /// Pre-movement declarations.
    PreMovement,
    /// Movement.
    Movement,
    /// Movement results.
    MovementReport,
    /// Off-board attacks.
    Offboard,
    /// Off-board results.
    OffboardReport,
    /// Pre-firing declarations.
    PreFiring,
    /// Weapon attacks.
    Firing,
    /// Firing results.
    FiringReport,
    /// Physical attacks.
    Physical,
    /// Physical results.
    PhysicalReport,
    /// End of round.
    End,
    /// End of round results.
    EndReport,
    /// Game over.
    Victory,
}

impl GamePhase {
    /// Human-readable phase name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Lounge => "lounge",
            Self::Exchange => "exchange",
            Self::StartingScenario => "starting scenario",
            Self::Deployment => "deployment",
            Self::Initiative => "initiative",
            Self::InitiativeReport => "initiative report",
            Self::Targeting => "targeting",
            Self::TargetingReport => "targeting report",
            Self::PreMovement => "pre-movement",
            Self::Movement => "movement",
            Self::MovementReport => "movement report",
            Self::Offboard => "offboard",
            Self::OffboardReport => "offboard report",
            Self::PreFiring => "pre-firing",
            Self::Firing => "firing",
            Self::FiringReport => "firing report",
            Self::Physical => "physical",
            Self::PhysicalReport => "physical report",
            Self::End => "end",
            Self::EndReport => "end report",
            Self::Victory => "victory",
        }
    }

    /// Whether this phase only displays results.
    #[must_use]
    pub const fn is_report(self) -> bool {
        matches!(
            self,
            Self::InitiativeReport
                | Self::TargetingReport
                | Self::MovementReport
                | Self::OffboardReport
                | Self::FiringReport
                | Self::PhysicalReport
                | Self::EndReport
        )
    }

    /// Whether units act in this phase.
    #[must_use]
    pub const fn has_turns(self) -> bool {
        matches!(
            self,
            Self::Deployment
                | Self::Targeting
                | Self::PreMovement
                | Self::Movement
                | Self::Offboard
                | Self::PreFiring
                | Self::Firing
                | Self::Physical
        )
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Restriction on which units may act in a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnKind {
    /// Any eligible unit of the player.
    Normal,
    /// Any unit whose class bit is set in the mask.
    EntityClass {
        /// Class bitmask.
        mask: u32,
    },
    /// Exactly one unit.
    Specific {
        /// The unit that must act.
        entity_id: EntityId,
    },
    /// Unload units stranded in a transport that cannot move.
    UnloadStranded {
        /// Stranded units.
        entity_ids: Vec<EntityId>,
    },
}

/// Entry of the turn queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnDescriptor {
    /// Player who acts; `None` lets any player with an eligible unit act.
    pub player_id: Option<PlayerId>,
    /// Unit restriction.
    pub kind: TurnKind,
}

impl TurnDescriptor {
    /// A normal turn for one player.
    #[must_use]
    pub fn normal(player_id: PlayerId) -> Self {
        Self { player_id: Some(player_id), kind: TurnKind::Normal }
    }

    /// Whether the player may act in this turn.
    #[must_use]
    pub fn is_for(&self, player_id: PlayerId) -> bool {
        self.player_id.is_none_or(|p| p == player_id)
    }

    /// Whether the turn is pinned to entities that are all in `removed`.
    ///
    /// Such turns can never be taken once those entities leave the game.
    #[must_use]
    pub fn is_orphaned_by(&self, removed: &[EntityId]) -> bool {
        match &self.kind {
            TurnKind::Specific { entity_id } => removed.contains(entity_id),
            TurnKind::UnloadStranded { entity_ids } => {
                !entity_ids.is_empty() && entity_ids.iter().all(|id| removed.contains(id))
            },
            TurnKind::Normal | TurnKind::EntityClass { .. } => false,
        }
    }
}
