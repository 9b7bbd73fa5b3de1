//! Public output model of a generation run.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use super::connectivity::ConnectivityReport;
use super::flood_fill::Reachability;
use super::grid::TileGrid;
use super::walls::{WallPlacement, WallShape};
use crate::config::DungeonConfig;
use crate::types::{Cell, Connection, Door, DoorAxis, Room, RoomId, TileKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub seed: u64,
    pub config: DungeonConfig,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    /// Accepted connections in acceptance order.
    pub connections: Vec<Connection>,
    pub grid: TileGrid,
    pub walls: Vec<WallPlacement>,
    pub connectivity: ConnectivityReport,
    /// `None` when the flood fill had no valid start cell.
    pub reachability: Option<Reachability>,
}

impl Dungeon {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn is_connected(&self) -> bool {
        self.connectivity.is_connected()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        let bounds = self.config.bounds;
        bytes.extend(bounds.width.to_le_bytes());
        bytes.extend(bounds.depth.to_le_bytes());
        bytes.extend(bounds.height.to_le_bytes());

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.id.0.to_le_bytes());
            extend_cell(&mut bytes, room.origin);
            bytes.extend(room.size.width.to_le_bytes());
            bytes.extend(room.size.depth.to_le_bytes());
            bytes.extend(room.size.height.to_le_bytes());
        }

        bytes.extend((self.doors.len() as u32).to_le_bytes());
        for door in &self.doors {
            extend_pair(&mut bytes, door.id);
            bytes.extend(door.center.x.to_bits().to_le_bytes());
            bytes.extend(door.center.z.to_bits().to_le_bytes());
            bytes.extend(door.size.width.to_le_bytes());
            bytes.extend(door.size.depth.to_le_bytes());
            bytes.push(match door.axis {
                DoorAxis::AlongX => 0,
                DoorAxis::AlongZ => 1,
            });
        }

        bytes.extend((self.connections.len() as u32).to_le_bytes());
        for &connection in &self.connections {
            extend_pair(&mut bytes, connection);
        }

        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        for (_, kind) in self.grid.cells() {
            bytes.push(match kind {
                TileKind::Empty => 0,
                TileKind::Wall => 1,
                TileKind::Door => 2,
                TileKind::Floor => 3,
            });
        }

        bytes.extend((self.walls.len() as u32).to_le_bytes());
        for wall in &self.walls {
            extend_cell(&mut bytes, wall.position);
            bytes.push(wall.corner_code);
            bytes.push(match wall.piece.shape {
                WallShape::Corner => 0,
                WallShape::Straight => 1,
                WallShape::Diagonal => 2,
                WallShape::InnerCorner => 3,
                WallShape::Solid => 4,
            });
            bytes.push(wall.piece.rotation);
        }

        bytes.extend((self.connectivity.components as u32).to_le_bytes());
        match &self.reachability {
            Some(reach) => {
                bytes.push(1);
                extend_cell(&mut bytes, reach.start);
                bytes.extend((reach.visited.len() as u32).to_le_bytes());
                bytes.extend((reach.walkable_total as u32).to_le_bytes());
            }
            None => bytes.push(0),
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn extend_cell(bytes: &mut Vec<u8>, cell: Cell) {
    bytes.extend(cell.x.to_le_bytes());
    bytes.extend(cell.z.to_le_bytes());
}

fn extend_pair(bytes: &mut Vec<u8>, pair: Connection) {
    bytes.extend(pair.0.0.to_le_bytes());
    bytes.extend(pair.1.0.to_le_bytes());
}
