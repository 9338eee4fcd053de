//! Board, terrain overlay and settings payloads.

use serde::{Deserialize, Serialize};

use crate::model::{
    ArtilleryAttack, Board, BoardDimensions, Building, Coords, DemolitionCharge, Flare,
    GameOptions, Hex, MapSettings, Minefield, PlanetaryConditions, SmokeCloud, SpecialHexDisplay,
    TagInfo,
};

/// Full board resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardResync {
    /// New board.
    pub board: Board,
}

/// One hex replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HexChange {
    /// Position.
    pub coords: Coords,
    /// New content.
    pub hex: Hex,
}

/// Several hexes replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HexChanges {
    /// Changes in application order.
    pub changes: Vec<HexChange>,
}

/// Building records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Buildings {
    /// Buildings, matched by id.
    pub buildings: Vec<Building>,
}

/// Plain list of coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoordsList {
    /// Hexes.
    pub coords: Vec<Coords>,
}

/// Minefield records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Minefields {
    /// Minefields.
    pub minefields: Vec<Minefield>,
}

/// One minefield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinefieldRecord {
    /// Minefield.
    pub minefield: Minefield,
}

/// New smoke cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmokeCloudAdded {
    /// Cloud.
    pub cloud: SmokeCloud,
}

/// Board sizes the server can generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapSizes {
    /// Sizes.
    pub sizes: Vec<BoardDimensions>,
}

/// Full special hex display table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialHexDisplays {
    /// Displays.
    pub displays: Vec<SpecialHexDisplay>,
}

/// One special hex display to add or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialHexDisplayChange {
    /// Display.
    pub display: SpecialHexDisplay,
}

/// Artillery attacks in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtilleryAttacks {
    /// Attacks.
    pub attacks: Vec<ArtilleryAttack>,
}

/// Flares in the air.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flares {
    /// Flares.
    pub flares: Vec<Flare>,
}

/// TAG designations to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagInfos {
    /// Designations.
    pub tags: Vec<TagInfo>,
}

/// Detonate a demolition charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplodeBuilding {
    /// Charge.
    pub charge: DemolitionCharge,
}

/// Game options from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSettings {
    /// Options.
    pub options: GameOptions,
}

/// Game options changed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameSettingsChange {
    /// Server password, empty if none.
    pub password: String,
    /// Changed options.
    pub options: GameOptions,
}

/// Map settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapSettingsRecord {
    /// Settings.
    pub settings: MapSettings,
}

/// Planetary conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanetaryConditionsRecord {
    /// Conditions.
    pub conditions: PlanetaryConditions,
}
