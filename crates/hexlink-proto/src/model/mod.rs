//! Records shared by payloads and the local game state.
//!
//! These are plain data. Consistency rules (force membership, name
//! disambiguation, turn cursor bounds) are enforced by the store in
//! `hexlink-core`, not here.

mod action;
mod board;
mod entity;
mod feedback;
mod force;
mod player;
mod report;
mod turn;
mod world;

use serde::{Deserialize, Serialize};

pub use action::{EntityAction, WeaponAttack};
pub use board::{Board, Building, Hex, SpecialHexDisplay, Terrain};
pub use entity::{
    Entity, MovePath, MoveStep, OutOfGameEntity, RemovalReason, UnitLocation, Visibility,
};
pub use feedback::{FeedbackKind, FeedbackRequest, FeedbackResponse};
pub use force::Force;
pub use player::Player;
pub use report::Report;
pub use turn::{GamePhase, TurnDescriptor, TurnKind};
pub use world::{
    ArtilleryAttack, DemolitionCharge, Flare, GameOptions, MapSettings, Minefield, MinefieldKind,
    OptionValue, PlanetaryConditions, SmokeCloud, TagInfo,
};

/// Server-assigned entity id.
pub type EntityId = u32;

/// Server-assigned player id.
pub type PlayerId = u32;

/// Server-assigned force id.
pub type ForceId = u32;

/// Building id, unique per board.
pub type BuildingId = u32;

/// Hex grid coordinates (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coords {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coords {
    /// Construct coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}{:02}", self.x + 1, self.y + 1)
    }
}

/// Board size in hexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardDimensions {
    /// Hexes per row.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_display_is_one_based() {
        assert_eq!(Coords::new(0, 0).to_string(), "0101");
        assert_eq!(Coords::new(14, 6).to_string(), "1507");
    }
}
