//! Marching-squares wall extraction over the tile grid.
//!
//! Every 2x2 window anchored at `(x, z)` gets a 4-bit corner code:
//! bit 3 = `(x, z+1)`, bit 2 = `(x+1, z+1)`, bit 1 = `(x+1, z)`, bit 0 = `(x, z)`,
//! set when that cell is a wall. Cells past the grid edge count as open.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use crate::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallShape {
    Corner,
    Straight,
    Diagonal,
    InnerCorner,
    Solid,
}

/// Mesh descriptor for one corner code; `rotation` counts quarter turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallPiece {
    pub shape: WallShape,
    pub rotation: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallEntry {
    pub code: u8,
    pub shape: WallShape,
    #[serde(default)]
    pub rotation: u8,
}

/// Lookup from corner code to wall piece. Codes missing from the table
/// produce no placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WallEntry>", into = "Vec<WallEntry>")]
pub struct WallTable {
    pieces: BTreeMap<u8, WallPiece>,
}

impl WallTable {
    pub fn get(&self, code: u8) -> Option<WallPiece> {
        self.pieces.get(&code).copied()
    }

    pub fn contains(&self, code: u8) -> bool {
        self.pieces.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl Default for WallTable {
    fn default() -> Self {
        use WallShape::{Corner, Diagonal, InnerCorner, Solid, Straight};
        let entries = [
            (1, Corner, 0),
            (2, Corner, 1),
            (4, Corner, 2),
            (8, Corner, 3),
            (3, Straight, 0),
            (6, Straight, 1),
            (12, Straight, 2),
            (9, Straight, 3),
            (5, Diagonal, 0),
            (10, Diagonal, 1),
            (14, InnerCorner, 0),
            (13, InnerCorner, 1),
            (11, InnerCorner, 2),
            (7, InnerCorner, 3),
            (15, Solid, 0),
        ];
        entries
            .into_iter()
            .map(|(code, shape, rotation)| WallEntry { code, shape, rotation })
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<Vec<WallEntry>> for WallTable {
    fn from(entries: Vec<WallEntry>) -> Self {
        let pieces = entries
            .into_iter()
            .filter(|entry| (1..=15).contains(&entry.code))
            .map(|entry| {
                (entry.code, WallPiece { shape: entry.shape, rotation: entry.rotation % 4 })
            })
            .collect();
        Self { pieces }
    }
}

impl From<WallTable> for Vec<WallEntry> {
    fn from(table: WallTable) -> Self {
        table
            .pieces
            .into_iter()
            .map(|(code, piece)| WallEntry { code, shape: piece.shape, rotation: piece.rotation })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallPlacement {
    pub position: Cell,
    pub corner_code: u8,
    pub piece: WallPiece,
}

pub fn corner_code(grid: &TileGrid, x: i32, z: i32) -> u8 {
    let top_left = u8::from(grid.is_wall(Cell::new(x, z + 1))) << 3;
    let top_right = u8::from(grid.is_wall(Cell::new(x + 1, z + 1))) << 2;
    let bottom_right = u8::from(grid.is_wall(Cell::new(x + 1, z))) << 1;
    let bottom_left = u8::from(grid.is_wall(Cell::new(x, z)));
    top_left | top_right | bottom_right | bottom_left
}

/// One placement per window whose code is non-zero and present in `table`.
pub(super) fn mesh_walls(grid: &TileGrid, table: &WallTable) -> Vec<WallPlacement> {
    let mut placements = Vec::new();
    for x in 0..grid.width() as i32 {
        for z in 0..grid.height() as i32 {
            let code = corner_code(grid, x, z);
            if code == 0 {
                continue;
            }
            if let Some(piece) = table.get(code) {
                placements.push(WallPlacement { position: Cell::new(x, z), corner_code: code, piece });
            }
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileKind;

    fn grid_with_walls(width: usize, height: usize, walls: &[(i32, i32)]) -> TileGrid {
        let mut grid = TileGrid::new(width, height);
        for &(x, z) in walls {
            grid.set(Cell::new(x, z), TileKind::Wall);
        }
        grid
    }

    #[test]
    fn lone_wall_cell_touches_four_windows() {
        let grid = grid_with_walls(5, 5, &[(2, 2)]);
        let placements = mesh_walls(&grid, &WallTable::default());

        let mut codes: Vec<(Cell, u8)> =
            placements.iter().map(|placement| (placement.position, placement.corner_code)).collect();
        codes.sort();
        assert_eq!(
            codes,
            vec![(Cell::new(1, 1), 4), (Cell::new(1, 2), 2), (Cell::new(2, 1), 8), (Cell::new(2, 2), 1)]
        );
    }

    #[test]
    fn floor_and_door_cells_do_not_count_as_walls() {
        let mut grid = TileGrid::new(3, 3);
        grid.set(Cell::new(0, 0), TileKind::Floor);
        grid.set(Cell::new(1, 0), TileKind::Door);
        assert!(mesh_walls(&grid, &WallTable::default()).is_empty());
    }

    #[test]
    fn solid_block_yields_full_code_inside() {
        let grid = grid_with_walls(2, 2, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(corner_code(&grid, 0, 0), 15);
        let placements = mesh_walls(&grid, &WallTable::default());
        assert_eq!(placements[0].piece, WallPiece { shape: WallShape::Solid, rotation: 0 });
    }

    #[test]
    fn codes_missing_from_the_table_are_skipped() {
        let grid = grid_with_walls(5, 5, &[(2, 2)]);
        let table = WallTable::from(vec![WallEntry { code: 1, shape: WallShape::Corner, rotation: 0 }]);
        let placements = mesh_walls(&grid, &table);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].position, Cell::new(2, 2));
    }

    #[test]
    fn default_table_covers_every_nonzero_code() {
        let table = WallTable::default();
        assert_eq!(table.len(), 15);
        assert!(!table.is_empty());
        assert!(WallTable::from(Vec::new()).is_empty());
        assert!((1..=15).all(|code| table.contains(code)));
        assert!(!table.contains(0));
    }

    #[test]
    fn table_round_trips_through_entry_list() {
        let table: WallTable = serde_json::from_str(
            r#"[{ "code": 3, "shape": "straight", "rotation": 5 }, { "code": 0, "shape": "solid" }]"#,
        )
        .expect("entry list should parse");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(3), Some(WallPiece { shape: WallShape::Straight, rotation: 1 }));
    }
}
