use serde::{Deserialize, Serialize};

use super::{Coords, EntityId, ForceId, PlayerId};

/// A unit tracked by id in the shared game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    /// Server-assigned id.
    pub id: EntityId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Chassis, e.g. "Atlas".
    pub chassis: String,
    /// Model designation, may be empty.
    pub model: String,
    /// Disambiguation counter; 0 means no suffix.
    pub duplicate_marker: u32,
    /// Force this entity belongs to, if any.
    pub force_id: Option<ForceId>,
    /// Board position; `None` while undeployed or off board.
    pub position: Option<Coords>,
    /// Hex facing, 0..6.
    pub facing: u8,
    /// Torso or turret facing, 0..6.
    pub secondary_facing: u8,
    /// Elevation relative to the hex surface.
    pub elevation: i32,
    /// Arms flipped to fire rearward.
    pub arms_flipped: bool,
    /// Dodging this round.
    pub dodging: bool,
    /// Finished acting this phase.
    pub done: bool,
    /// Placed on the board.
    pub deployed: bool,
    /// Destroyed but not yet removed.
    pub destroyed: bool,
    /// Double-blind visibility state.
    pub visibility: Visibility,
    /// Current Nova C3 network.
    pub nova_network: Option<String>,
    /// Nova C3 network taking effect next round.
    pub pending_nova_network: Option<String>,
}

impl Entity {
    /// A fresh, undeployed entity with default settings.
    #[must_use]
    pub fn new(
        id: EntityId,
        owner_id: PlayerId,
        chassis: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner_id,
            chassis: chassis.into(),
            model: model.into(),
            duplicate_marker: 0,
            force_id: None,
            position: None,
            facing: 0,
            secondary_facing: 0,
            elevation: 0,
            arms_flipped: false,
            dodging: false,
            done: false,
            deployed: false,
            destroyed: false,
            visibility: Visibility::default(),
            nova_network: None,
            pending_nova_network: None,
        }
    }

    /// Name without the disambiguation suffix.
    #[must_use]
    pub fn base_name(&self) -> String {
        if self.model.is_empty() {
            self.chassis.clone()
        } else {
            format!("{} {}", self.chassis, self.model)
        }
    }

    /// Name as shown to players, e.g. "Atlas AS7-D #2".
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.duplicate_marker {
            0 => self.base_name(),
            n => format!("{} #{n}", self.base_name()),
        }
    }
}

/// Double-blind visibility state of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Visibility {
    /// Some enemy has seen it at least once.
    pub ever_seen_by_enemy: bool,
    /// Currently visible to an enemy.
    pub visible_to_enemy: bool,
    /// Currently detected by enemy sensors.
    pub detected_by_enemy: bool,
    /// Players that can see it.
    pub seen_by: Vec<PlayerId>,
    /// Players that can detect it.
    pub detected_by: Vec<PlayerId>,
}

/// Why an entity left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Unknown or unspecified.
    Unknown,
    /// Disabled, can be salvaged.
    Salvageable,
    /// Crew ejected.
    Ejected,
    /// Pushed off the board.
    Pushed,
    /// Captured by the enemy.
    Captured,
    /// Completely destroyed.
    Devastated,
    /// Retreated off the board.
    InRetreat,
    /// Removed in the lobby, never took part.
    NeverJoined,
}

/// Entity that left the game but is kept for history and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutOfGameEntity {
    /// Entity as it was when it left.
    pub entity: Entity,
    /// Why it left.
    pub reason: RemovalReason,
}

/// One step of a movement path as seen by other players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitLocation {
    /// Hex entered.
    pub coords: Coords,
    /// Facing after the step.
    pub facing: u8,
}

/// Kind of a single movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveStep {
    /// Move one hex forward.
    Forward,
    /// Move one hex backward.
    Backward,
    /// Turn left one hexside.
    TurnLeft,
    /// Turn right one hexside.
    TurnRight,
    /// Climb one level.
    Up,
    /// Descend one level.
    Down,
    /// Stand up from prone.
    GetUp,
    /// Go prone.
    GoProne,
    /// Unload carried units.
    Unload,
}

/// Movement path submitted by the owner of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovePath {
    /// Steps in order.
    pub steps: Vec<MoveStep>,
    /// Run instead of walk.
    pub running: bool,
}
