use serde::{Deserialize, Serialize};

use super::{BoardDimensions, BuildingId, Coords, PlayerId};

/// Rectangular hex grid with building overlays.
///
/// Hexes are stored row-major. `hexes.len()` is expected to equal
/// `width * height`; [`Board::hex`] treats missing cells as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Board {
    /// Hexes per row.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Row-major hex cells.
    pub hexes: Vec<Hex>,
    /// Buildings standing on the board.
    pub buildings: Vec<Building>,
    /// Annotations drawn on top of hexes.
    pub special_hex_displays: Vec<SpecialHexDisplay>,
}

impl Board {
    /// A board of clear level-0 hexes.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hexes: vec![Hex::default(); (width as usize).saturating_mul(height as usize)],
            buildings: Vec::new(),
            special_hex_displays: Vec::new(),
        }
    }

    /// Width and height.
    #[must_use]
    pub fn dimensions(&self) -> BoardDimensions {
        BoardDimensions { width: self.width, height: self.height }
    }

    /// Number of cells `width * height`, or `None` if it does not fit in
    /// memory indexes.
    #[must_use]
    pub fn cell_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Whether the hex list covers exactly `width * height` cells.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cell_count() == Some(self.hexes.len())
    }

    /// Whether the coordinates fall on the board.
    #[must_use]
    pub fn contains(&self, coords: Coords) -> bool {
        self.index(coords).is_some()
    }

    /// Hex at the coordinates.
    #[must_use]
    pub fn hex(&self, coords: Coords) -> Option<&Hex> {
        self.index(coords).and_then(|i| self.hexes.get(i))
    }

    /// Mutable hex at the coordinates.
    pub fn hex_mut(&mut self, coords: Coords) -> Option<&mut Hex> {
        self.index(coords).and_then(|i| self.hexes.get_mut(i))
    }

    /// Building covering the coordinates.
    #[must_use]
    pub fn building_at(&self, coords: Coords) -> Option<&Building> {
        self.buildings.iter().find(|b| b.coords.contains(&coords))
    }

    fn index(&self, coords: Coords) -> Option<usize> {
        let x = u32::try_from(coords.x).ok()?;
        let y = u32::try_from(coords.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        (y as usize).checked_mul(self.width as usize)?.checked_add(x as usize)
    }
}

/// One hex cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hex {
    /// Ground level.
    pub level: i32,
    /// Terrain features present in the hex.
    pub terrains: Vec<Terrain>,
}

impl Hex {
    /// Terrain of the given kind, if present.
    #[must_use]
    pub fn terrain(&self, kind: &str) -> Option<&Terrain> {
        self.terrains.iter().find(|t| t.kind == kind)
    }
}

/// Terrain feature with an intensity level, e.g. `("woods", 2)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Terrain {
    /// Terrain kind name.
    pub kind: String,
    /// Intensity or height.
    pub level: i32,
}

/// Building spanning one or more hexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Building {
    /// Building id.
    pub id: BuildingId,
    /// Name shown in reports.
    pub name: String,
    /// Hexes the building occupies.
    pub coords: Vec<Coords>,
    /// Remaining construction factor.
    pub current_cf: u32,
    /// Collapsed buildings remain as rubble.
    pub collapsed: bool,
}

/// Annotation displayed on a hex (artillery markers, notes, bomb hits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecialHexDisplay {
    /// Annotated hex.
    pub coords: Coords,
    /// Display kind.
    pub kind: String,
    /// Free-form text.
    pub info: String,
    /// Round the annotation applies to, if limited.
    pub round: Option<u32>,
    /// Player who may see it; `None` for everyone.
    pub owner: Option<PlayerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_checks() {
        let board = Board::new(3, 2);
        assert!(board.contains(Coords::new(2, 1)));
        assert!(!board.contains(Coords::new(3, 0)));
        assert!(!board.contains(Coords::new(0, 2)));
        assert!(!board.contains(Coords::new(-1, 0)));
        assert_eq!(board.hexes.len(), 6);
    }

    #[test]
    fn hex_mut_writes_row_major() {
        let mut board = Board::new(3, 2);
        if let Some(hex) = board.hex_mut(Coords::new(1, 1)) {
            hex.level = 4;
        }
        assert_eq!(board.hexes[4].level, 4);
    }

    #[test]
    fn huge_dimensions_index_without_overflow() {
        let board = Board { width: 100_000, height: 100_000, ..Board::default() };
        assert!(!board.is_consistent());
        assert!(board.contains(Coords::new(0, 99_999)));
        assert_eq!(board.hex(Coords::new(0, 99_999)), None);
    }
}
