//! Tile grid and the rasterization of rooms and doors onto it.

use serde::{Deserialize, Serialize};

use crate::config::Bounds;
use crate::types::{Cell, Door, Room, TileKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, tiles: vec![TileKind::Empty; width * height] }
    }

    /// One extra column and row beyond the bounds, matching the lattice of wall lines.
    pub fn for_bounds(bounds: Bounds) -> Self {
        Self::new(bounds.width as usize + 1, bounds.depth as usize + 1)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.z >= 0
            && (cell.x as usize) < self.width
            && (cell.z as usize) < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell).then(|| cell.z as usize * self.width + cell.x as usize)
    }

    pub fn get(&self, cell: Cell) -> Option<TileKind> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Out-of-bounds cells read as `Empty`.
    pub fn tile_at(&self, cell: Cell) -> TileKind {
        self.get(cell).unwrap_or(TileKind::Empty)
    }

    /// Writes outside the grid are dropped.
    pub fn set(&mut self, cell: Cell, kind: TileKind) {
        if let Some(index) = self.index(cell) {
            self.tiles[index] = kind;
        }
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.tile_at(cell) == TileKind::Wall
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, TileKind)> + '_ {
        self.tiles.iter().enumerate().map(|(index, &kind)| {
            let cell = Cell::new((index % self.width) as i32, (index / self.width) as i32);
            (cell, kind)
        })
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&tile| tile == kind).count()
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_walkable()).count()
    }

    /// First walkable cell scanning rows from z = 0, preferring floor over door.
    pub fn first_floor_cell(&self) -> Option<Cell> {
        self.cells()
            .find(|&(_, kind)| kind == TileKind::Floor)
            .or_else(|| self.cells().find(|&(_, kind)| kind.is_walkable()))
            .map(|(cell, _)| cell)
    }

    /// Debug dump, highest z first so the output reads like a top-down map.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for z in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(self.tiles[z * self.width + x].glyph());
            }
            out.push('\n');
        }
        out
    }
}

/// Rooms first (interior floor, perimeter wall), then doors over the walls.
pub(super) fn rasterize(bounds: Bounds, rooms: &[Room], doors: &[Door]) -> TileGrid {
    let mut grid = TileGrid::for_bounds(bounds);
    for room in rooms {
        for z in room.min_z()..=room.max_z() {
            for x in room.min_x()..=room.max_x() {
                let cell = Cell::new(x, z);
                let kind =
                    if room.is_interior_cell(cell) { TileKind::Floor } else { TileKind::Wall };
                grid.set(cell, kind);
            }
        }
    }
    for door in doors {
        for cell in door.cells() {
            grid.set(cell, TileKind::Door);
        }
    }
    grid
}
