//! Board and battlefield overlays.

use hexlink_proto::model::{
    ArtilleryAttack, Board, BoardDimensions, Building, Coords, Flare, Hex, Minefield, SmokeCloud,
    SpecialHexDisplay, TagInfo,
};

use super::GameState;

/// Everything layered on top of the hex grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct World {
    /// Known minefields.
    pub minefields: Vec<Minefield>,
    /// Hexes lit by searchlights or flares.
    pub illuminated: Vec<Coords>,
    /// Active smoke clouds.
    pub smoke_clouds: Vec<SmokeCloud>,
    /// Map sizes the server can generate.
    pub map_sizes: Vec<BoardDimensions>,
    /// Current TAG designations.
    pub tag_info: Vec<TagInfo>,
    /// Artillery in flight.
    pub artillery: Vec<ArtilleryAttack>,
    /// Flares in the air.
    pub flares: Vec<Flare>,
}

impl GameState {
    /// Replace the board.
    ///
    /// A board whose hex list does not cover exactly `width * height` cells
    /// is refused and the current board kept. Returns whether it was taken.
    pub fn set_board(&mut self, board: Board) -> bool {
        if !board.is_consistent() {
            tracing::warn!(
                width = board.width,
                height = board.height,
                hexes = board.hexes.len(),
                "board with mismatched hex count ignored"
            );
            return false;
        }
        self.board = board;
        true
    }

    /// Replace one hex. Coordinates off the board are ignored.
    ///
    /// Returns whether the hex was written.
    pub fn patch_hex(&mut self, coords: Coords, hex: Hex) -> bool {
        match self.board.hex_mut(coords) {
            Some(slot) => {
                *slot = hex;
                true
            },
            None => {
                tracing::warn!(%coords, "hex change outside the board ignored");
                false
            },
        }
    }

    /// Replace several hexes; returns how many were on the board.
    pub fn patch_hexes(&mut self, changes: Vec<(Coords, Hex)>) -> usize {
        changes.into_iter().map(|(coords, hex)| self.patch_hex(coords, hex)).filter(|&ok| ok).count()
    }

    /// Insert or replace buildings by id.
    pub fn update_buildings(&mut self, buildings: Vec<Building>) {
        for building in buildings {
            match self.board.buildings.iter_mut().find(|b| b.id == building.id) {
                Some(existing) => *existing = building,
                None => self.board.buildings.push(building),
            }
        }
    }

    /// Collapse every building covering one of the hexes.
    ///
    /// Returns how many buildings collapsed.
    pub fn collapse_buildings(&mut self, coords: &[Coords]) -> usize {
        let mut collapsed = 0;
        for building in &mut self.board.buildings {
            if !building.collapsed && building.coords.iter().any(|c| coords.contains(c)) {
                building.collapsed = true;
                building.current_cf = 0;
                collapsed += 1;
            }
        }
        collapsed
    }

    /// Replace the special hex display table.
    pub fn set_special_hex_displays(&mut self, displays: Vec<SpecialHexDisplay>) {
        self.board.special_hex_displays = displays;
    }

    /// Replace all known minefields.
    pub fn set_minefields(&mut self, minefields: Vec<Minefield>) {
        self.world.minefields = minefields;
    }

    /// Add minefields, skipping ones already known.
    pub fn add_minefields(&mut self, minefields: Vec<Minefield>) {
        for field in minefields {
            if !self.world.minefields.iter().any(|m| m.same_field(&field)) {
                self.world.minefields.push(field);
            }
        }
    }

    /// Forget a minefield. Returns whether it was known.
    pub fn remove_minefield(&mut self, minefield: &Minefield) -> bool {
        let before = self.world.minefields.len();
        self.world.minefields.retain(|m| !m.same_field(minefield));
        before != self.world.minefields.len()
    }

    /// Take over densities for minefields already known; unknown ones are
    /// ignored. Returns how many were updated.
    pub fn reset_minefield_density(&mut self, minefields: &[Minefield]) -> usize {
        let mut updated = 0;
        for field in minefields {
            if let Some(known) = self.world.minefields.iter_mut().find(|m| m.same_field(field)) {
                known.density = field.density;
                updated += 1;
            }
        }
        updated
    }

    /// Minefields in one hex.
    pub fn minefields_at(&self, coords: Coords) -> impl Iterator<Item = &Minefield> {
        self.world.minefields.iter().filter(move |m| m.coords == coords)
    }

    /// Replace the illuminated hexes.
    pub fn set_illuminated(&mut self, coords: Vec<Coords>) {
        self.world.illuminated = coords;
    }

    /// No hex is illuminated any more.
    pub fn clear_illuminated(&mut self) {
        self.world.illuminated.clear();
    }

    /// Add a smoke cloud.
    pub fn add_smoke_cloud(&mut self, cloud: SmokeCloud) {
        self.world.smoke_clouds.push(cloud);
    }

    /// Replace the available map sizes.
    pub fn set_map_sizes(&mut self, sizes: Vec<BoardDimensions>) {
        self.world.map_sizes = sizes;
    }

    /// Append TAG designations.
    pub fn add_tag_info(&mut self, tags: Vec<TagInfo>) {
        self.world.tag_info.extend(tags);
    }

    /// Drop all TAG designations.
    pub fn reset_tag_info(&mut self) {
        self.world.tag_info.clear();
    }

    /// Replace artillery in flight.
    pub fn set_artillery(&mut self, attacks: Vec<ArtilleryAttack>) {
        self.world.artillery = attacks;
    }

    /// Replace flares.
    pub fn set_flares(&mut self, flares: Vec<Flare>) {
        self.world.flares = flares;
    }
}
