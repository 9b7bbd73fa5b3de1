//! Walkability check: breadth-first fill over floor and door cells.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use crate::types::{Cell, TileKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reachability {
    pub start: Cell,
    pub visited: BTreeSet<Cell>,
    /// Every floor or door cell on the grid, reached or not.
    pub walkable_total: usize,
}

impl Reachability {
    pub fn fully_connected(&self) -> bool {
        self.visited.len() == self.walkable_total
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.visited.contains(&cell)
    }
}

/// Why a fill never started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloodFillRejection {
    OutOfBounds { cell: Cell },
    NotWalkable { cell: Cell, kind: TileKind },
}

impl fmt::Display for FloodFillRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { cell } => {
                write!(f, "start cell ({}, {}) is outside the grid", cell.x, cell.z)
            }
            Self::NotWalkable { cell, kind } => {
                write!(f, "start cell ({}, {}) is {kind:?}, not floor or door", cell.x, cell.z)
            }
        }
    }
}

pub fn flood_fill(grid: &TileGrid, start: Cell) -> Result<Reachability, FloodFillRejection> {
    let Some(kind) = grid.get(start) else {
        let rejection = FloodFillRejection::OutOfBounds { cell: start };
        warn!("flood fill skipped: {rejection}");
        return Err(rejection);
    };
    if !kind.is_walkable() {
        let rejection = FloodFillRejection::NotWalkable { cell: start, kind };
        warn!("flood fill skipped: {rejection}");
        return Err(rejection);
    }

    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if grid.tile_at(next).is_walkable() && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    Ok(Reachability { start, visited, walkable_total: grid.walkable_count() })
}
