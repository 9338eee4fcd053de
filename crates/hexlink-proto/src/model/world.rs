use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BoardDimensions, BuildingId, Coords, EntityId, PlayerId};

/// Kind of minefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinefieldKind {
    /// Conventional mines.
    Conventional,
    /// Command-detonated mines.
    Command,
    /// Vibration-triggered mines.
    Vibrabomb,
    /// Active (anti-hover) mines.
    Active,
    /// Inferno mines.
    Inferno,
    /// EMP mines.
    Emp,
}

/// Minefield in one hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Minefield {
    /// Hex.
    pub coords: Coords,
    /// Player who laid it.
    pub player_id: PlayerId,
    /// Kind of mines.
    pub kind: MinefieldKind,
    /// Current density.
    pub density: u32,
}

impl Minefield {
    /// Whether two records describe the same physical minefield, ignoring
    /// density.
    #[must_use]
    pub fn same_field(&self, other: &Self) -> bool {
        self.coords == other.coords && self.player_id == other.player_id && self.kind == other.kind
    }
}

/// Smoke cloud drifting over a set of hexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmokeCloud {
    /// Covered hexes.
    pub coords: Vec<Coords>,
    /// Light (1) or heavy (2).
    pub density: u8,
    /// Rounds remaining.
    pub duration: u32,
}

/// TAG designation of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagInfo {
    /// Designating entity.
    pub attacker_id: EntityId,
    /// Designated entity, if the target is a unit.
    pub target_id: Option<EntityId>,
    /// Designated hex.
    pub target_coords: Option<Coords>,
    /// Guided rounds already steered onto this designation.
    pub shots: u32,
    /// Missed designation.
    pub missed: bool,
}

/// Artillery shell in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtilleryAttack {
    /// Firing entity.
    pub entity_id: EntityId,
    /// Player who fired.
    pub player_id: PlayerId,
    /// Target hex.
    pub target: Coords,
    /// Weapon used.
    pub weapon_id: u32,
    /// Turns until impact.
    pub turns_til_hit: u32,
}

/// Illumination flare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Flare {
    /// Hex the flare hangs over.
    pub coords: Coords,
    /// Rounds remaining.
    pub turns_to_burn: u32,
    /// Illumination radius.
    pub radius: u32,
    /// Drifting or ignited.
    pub ignited: bool,
}

/// Demolition charge attached to a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemolitionCharge {
    /// Player who set the charge.
    pub player_id: PlayerId,
    /// Charge strength.
    pub damage: u32,
    /// Hex of the charge.
    pub coords: Coords,
    /// Building the charge sits in.
    pub building_id: BuildingId,
}

/// Value of a game option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionValue {
    /// On/off option.
    Bool(bool),
    /// Numeric option.
    Int(i64),
    /// Free-form or choice option.
    Text(String),
}

/// Game options keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameOptions {
    /// Option values.
    pub values: BTreeMap<String, OptionValue>,
}

impl GameOptions {
    /// Boolean option, `false` when unset or not boolean.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Bool(true)))
    }

    /// Set an option.
    pub fn set(&mut self, name: impl Into<String>, value: OptionValue) {
        self.values.insert(name.into(), value);
    }
}

/// Map generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapSettings {
    /// Size of each board.
    pub board_size: BoardDimensions,
    /// Boards per row and column.
    pub map_size: BoardDimensions,
    /// Board file names, row-major; empty entries are generated.
    pub boards: Vec<String>,
    /// Map medium, e.g. "ground" or "space".
    pub medium: String,
}

/// Weather and light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanetaryConditions {
    /// Light level, e.g. "day".
    pub light: String,
    /// Weather, e.g. "light rain".
    pub weather: String,
    /// Wind strength.
    pub wind: String,
    /// Fog.
    pub fog: String,
    /// Temperature in Celsius.
    pub temperature: i32,
    /// Gravity in tenths of a g.
    pub gravity_tenths: u32,
}
