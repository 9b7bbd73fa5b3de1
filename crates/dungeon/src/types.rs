use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell { x: self.x - 1, z: self.z },
            Cell { x: self.x + 1, z: self.z },
            Cell { x: self.x, z: self.z - 1 },
            Cell { x: self.x, z: self.z + 1 },
        ]
    }
}

/// Continuous point in the XZ plane, used for centers and coverage probes.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSize {
    pub width: u32,
    pub depth: u32,
    pub height: u32,
}

/// Axis-aligned room. Covers cells `origin.x..origin.x + width` and
/// `origin.z..origin.z + depth`; the outermost ring of cells is its wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub origin: Cell,
    pub size: RoomSize,
}

impl Room {
    pub fn min_x(&self) -> i32 {
        self.origin.x
    }

    pub fn max_x(&self) -> i32 {
        self.origin.x + self.size.width as i32 - 1
    }

    pub fn min_z(&self) -> i32 {
        self.origin.z
    }

    pub fn max_z(&self) -> i32 {
        self.origin.z + self.size.depth as i32 - 1
    }

    pub fn center(&self) -> Point {
        Point {
            x: f64::from(self.origin.x) + f64::from(self.size.width - 1) / 2.0,
            z: f64::from(self.origin.z) + f64::from(self.size.depth - 1) / 2.0,
        }
    }

    /// Cell count of the room, walls included.
    pub fn area(&self) -> u64 {
        u64::from(self.size.width) * u64::from(self.size.depth)
    }

    /// Area of the footprint between the wall lines.
    pub fn footprint_area(&self) -> u64 {
        u64::from(self.size.width - 1) * u64::from(self.size.depth - 1)
    }

    pub fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.size.width,
            Axis::Z => self.size.depth,
        }
    }

    /// Closed containment against the footprint `[min, max]` on both axes.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= f64::from(self.min_x())
            && point.x <= f64::from(self.max_x())
            && point.z >= f64::from(self.min_z())
            && point.z <= f64::from(self.max_z())
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.x >= self.min_x()
            && cell.x <= self.max_x()
            && cell.z >= self.min_z()
            && cell.z <= self.max_z()
    }

    pub fn is_interior_cell(&self, cell: Cell) -> bool {
        cell.x > self.min_x()
            && cell.x < self.max_x()
            && cell.z > self.min_z()
            && cell.z < self.max_z()
    }

    pub fn is_perimeter_cell(&self, cell: Cell) -> bool {
        self.contains_cell(cell) && !self.is_interior_cell(cell)
    }
}

/// Unordered-by-meaning pair of rooms joined by a door; the first id is the
/// room that came earlier in placement order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomPair(pub RoomId, pub RoomId);

impl RoomPair {
    pub fn touches(self, room: RoomId) -> bool {
        self.0 == room || self.1 == room
    }

    pub fn other(self, room: RoomId) -> Option<RoomId> {
        if self.0 == room {
            Some(self.1)
        } else if self.1 == room {
            Some(self.0)
        } else {
            None
        }
    }
}

pub type Connection = RoomPair;

/// Axis the door's width runs along, i.e. the axis of the wall it pierces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorAxis {
    AlongX,
    AlongZ,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSize {
    pub width: u32,
    pub depth: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: RoomPair,
    pub center: Point,
    pub size: DoorSize,
    pub axis: DoorAxis,
}

impl Door {
    pub fn span(&self) -> u32 {
        match self.axis {
            DoorAxis::AlongX => self.size.width,
            DoorAxis::AlongZ => self.size.depth,
        }
    }

    /// Grid cells the door occupies, in ascending order along its axis.
    pub fn cells(&self) -> Vec<Cell> {
        let span = self.span() as i32;
        let half = f64::from(span - 1) / 2.0;
        match self.axis {
            DoorAxis::AlongX => {
                let z = self.center.z.round() as i32;
                let start = (self.center.x - half).round() as i32;
                (start..start + span).map(|x| Cell { x, z }).collect()
            }
            DoorAxis::AlongZ => {
                let x = self.center.x.round() as i32;
                let start = (self.center.z - half).round() as i32;
                (start..start + span).map(|z| Cell { x, z }).collect()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Wall,
    Door,
    Floor,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Door | Self::Floor)
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Door | Self::Floor => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(x: i32, z: i32, width: u32, depth: u32) -> Room {
        Room { id: RoomId(0), origin: Cell::new(x, z), size: RoomSize { width, depth, height: 1 } }
    }

    #[test]
    fn center_sits_between_wall_lines() {
        let center = room(2, 4, 5, 6).center();
        assert_eq!(center, Point { x: 4.0, z: 6.5 });
    }

    #[test]
    fn perimeter_and_interior_partition_the_room() {
        let r = room(0, 0, 4, 4);
        let mut interior = 0;
        let mut perimeter = 0;
        for x in 0..4 {
            for z in 0..4 {
                let cell = Cell::new(x, z);
                if r.is_interior_cell(cell) {
                    interior += 1;
                }
                if r.is_perimeter_cell(cell) {
                    perimeter += 1;
                }
            }
        }
        assert_eq!(interior, 4);
        assert_eq!(perimeter, 12);
    }

    #[test]
    fn door_cells_follow_its_axis() {
        let door = Door {
            id: RoomPair(RoomId(1), RoomId(2)),
            center: Point { x: 5.0, z: 3.5 },
            size: DoorSize { width: 1, depth: 2 },
            axis: DoorAxis::AlongZ,
        };
        assert_eq!(door.cells(), vec![Cell::new(5, 3), Cell::new(5, 4)]);
    }

    #[test]
    fn room_pair_resolves_the_other_end() {
        let pair = RoomPair(RoomId(3), RoomId(9));
        assert_eq!(pair.other(RoomId(3)), Some(RoomId(9)));
        assert_eq!(pair.other(RoomId(9)), Some(RoomId(3)));
        assert_eq!(pair.other(RoomId(4)), None);
        assert!(pair.touches(RoomId(9)));
    }
}
