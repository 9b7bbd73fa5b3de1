//! Door placement on the walls shared by adjacent rooms.

use log::debug;

use crate::progress::{GenerationEvent, ProgressObserver};
use crate::rng::DungeonRng;
use crate::types::{Door, DoorAxis, DoorSize, Point, Room, RoomPair};

/// Probe distance beyond the door's half width.
pub const DOOR_EPSILON: f64 = 0.01;
/// Walls at least this many door widths long get an off-center door first.
const OFFSET_ATTEMPT_FACTOR: f64 = 2.5;

/// Number of rooms whose footprint contains `point`, saturating at 3.
pub fn count_cover_at(rooms: &[Room], point: Point) -> usize {
    let mut count = 0;
    for room in rooms {
        if room.contains_point(point) {
            count += 1;
            if count > 2 {
                break;
            }
        }
    }
    count
}

/// Segment of wall two rooms share. `line` is the fixed coordinate across
/// the wall, `low..=high` the shared run along it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SharedWall {
    axis: DoorAxis,
    line: i32,
    low: i32,
    high: i32,
    thickness: u32,
}

impl SharedWall {
    fn between(a: &Room, b: &Room) -> Option<Self> {
        let min_x = a.min_x().max(b.min_x());
        let max_x = a.max_x().min(b.max_x());
        let min_z = a.min_z().max(b.min_z());
        let max_z = a.max_z().min(b.max_z());
        let overlap_x = max_x - min_x;
        let overlap_z = max_z - min_z;
        if overlap_x < 0 || overlap_z < 0 || (overlap_x > 0 && overlap_z > 0) {
            return None;
        }

        // The wall runs along whichever axis the overlap is longer on.
        if overlap_x < overlap_z {
            Some(Self {
                axis: DoorAxis::AlongZ,
                line: min_x,
                low: min_z,
                high: max_z,
                thickness: overlap_x as u32 + 1,
            })
        } else if overlap_z < overlap_x {
            Some(Self {
                axis: DoorAxis::AlongX,
                line: min_z,
                low: min_x,
                high: max_x,
                thickness: overlap_z as u32 + 1,
            })
        } else {
            None
        }
    }

    fn length(&self) -> i32 {
        self.high - self.low
    }

    fn door_at(&self, id: RoomPair, start: i32, door_width: u32) -> Door {
        let along = f64::from(start) + f64::from(door_width - 1) / 2.0;
        let across = f64::from(self.line);
        match self.axis {
            DoorAxis::AlongX => Door {
                id,
                center: Point { x: along, z: across },
                size: DoorSize { width: door_width, depth: self.thickness },
                axis: self.axis,
            },
            DoorAxis::AlongZ => Door {
                id,
                center: Point { x: across, z: along },
                size: DoorSize { width: self.thickness, depth: door_width },
                axis: self.axis,
            },
        }
    }
}

/// Coverage probes at the door center and just past both ends of its span.
pub fn door_probes(door: &Door) -> [Point; 3] {
    let reach = f64::from(door.span()) / 2.0 + DOOR_EPSILON;
    let center = door.center;
    match door.axis {
        DoorAxis::AlongX => [
            center,
            Point { x: center.x - reach, z: center.z },
            Point { x: center.x + reach, z: center.z },
        ],
        DoorAxis::AlongZ => [
            center,
            Point { x: center.x, z: center.z - reach },
            Point { x: center.x, z: center.z + reach },
        ],
    }
}

/// A door is valid when every probe lies on the boundary of exactly its two rooms.
pub fn is_valid_door(door: &Door, a: &Room, b: &Room, rooms: &[Room]) -> bool {
    door_probes(door).into_iter().all(|probe| {
        a.contains_point(probe) && b.contains_point(probe) && count_cover_at(rooms, probe) == 2
    })
}

fn try_place(
    a: &Room,
    b: &Room,
    rooms: &[Room],
    door_width: u32,
    rng: &mut DungeonRng,
) -> Option<Door> {
    let wall = SharedWall::between(a, b)?;
    let id = RoomPair(a.id, b.id);
    let width = door_width as i32;

    if f64::from(wall.length()) >= OFFSET_ATTEMPT_FACTOR * f64::from(door_width) {
        let from_high_end = rng.coin();
        let inset = rng.range_i32(0, width);
        let start =
            if from_high_end { wall.high - width - inset } else { wall.low + 1 + inset };
        let door = wall.door_at(id, start, door_width);
        if is_valid_door(&door, a, b, rooms) {
            return Some(door);
        }
    }

    // Corner cells of the shared run belong to the perpendicular walls.
    let free_cells = wall.length() - 1;
    if free_cells < width {
        return None;
    }
    let start = wall.low + 1 + (free_cells - width) / 2;
    let door = wall.door_at(id, start, door_width);
    is_valid_door(&door, a, b, rooms).then_some(door)
}

/// Tries every unordered room pair once, in room order.
pub(super) fn place_doors(
    rooms: &[Room],
    door_width: u32,
    rng: &mut DungeonRng,
    observer: &mut dyn ProgressObserver,
) -> Vec<Door> {
    let mut doors = Vec::new();
    for (index, a) in rooms.iter().enumerate() {
        for b in &rooms[index + 1..] {
            if let Some(door) = try_place(a, b, rooms, door_width, rng) {
                observer.on_event(&GenerationEvent::DoorPlaced { door: door.id });
                doors.push(door);
            }
        }
    }
    debug!("placed {} doors between {} rooms", doors.len(), rooms.len());
    doors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Silent;
    use crate::types::{Cell, RoomId, RoomSize};

    fn room(id: u32, x: i32, z: i32, width: u32, depth: u32) -> Room {
        Room {
            id: RoomId(id),
            origin: Cell::new(x, z),
            size: RoomSize { width, depth, height: 1 },
        }
    }

    /// One tall room on the left, two stacked rooms on the right.
    fn t_junction() -> Vec<Room> {
        vec![room(1, 0, 0, 6, 11), room(2, 5, 0, 6, 5), room(3, 5, 4, 6, 7)]
    }

    #[test]
    fn short_shared_wall_gets_a_centered_door() {
        let rooms = t_junction();
        let mut rng = DungeonRng::from_seed(1);
        let door = try_place(&rooms[0], &rooms[1], &rooms, 2, &mut rng).expect("door expected");

        assert_eq!(door.id, RoomPair(RoomId(1), RoomId(2)));
        assert_eq!(door.axis, DoorAxis::AlongZ);
        assert_eq!(door.center, Point { x: 5.0, z: 1.5 });
        assert_eq!(door.size, DoorSize { width: 1, depth: 2 });
        assert_eq!(rng.draws(), 0, "centered placement draws nothing");
    }

    #[test]
    fn long_shared_wall_gets_an_offset_door_inside_the_run() {
        let rooms = t_junction();
        for seed in 0..32 {
            let mut rng = DungeonRng::from_seed(seed);
            let door =
                try_place(&rooms[0], &rooms[2], &rooms, 2, &mut rng).expect("door expected");
            assert_eq!(rng.draws(), 2);
            for cell in door.cells() {
                assert_eq!(cell.x, 5);
                assert!((5..=9).contains(&cell.z), "door cell {cell:?} touches a corner");
            }
        }
    }

    #[test]
    fn horizontal_shared_wall_yields_door_along_x() {
        let rooms = t_junction();
        let mut rng = DungeonRng::from_seed(3);
        let door = try_place(&rooms[1], &rooms[2], &rooms, 2, &mut rng).expect("door expected");
        assert_eq!(door.axis, DoorAxis::AlongX);
        assert_eq!(door.center.z, 4.0);
        assert_eq!(door.size, DoorSize { width: 2, depth: 1 });
    }

    #[test]
    fn corner_contact_produces_no_door() {
        let rooms = vec![room(1, 0, 0, 5, 5), room(2, 4, 4, 5, 5)];
        let mut rng = DungeonRng::from_seed(1);
        assert_eq!(try_place(&rooms[0], &rooms[1], &rooms, 1, &mut rng), None);
    }

    #[test]
    fn shared_edge_narrower_than_door_is_skipped() {
        let rooms = vec![room(1, 0, 0, 5, 3), room(2, 4, 0, 5, 3)];
        let mut rng = DungeonRng::from_seed(1);
        assert_eq!(try_place(&rooms[0], &rooms[1], &rooms, 2, &mut rng), None);
    }

    #[test]
    fn disjoint_rooms_produce_no_door() {
        let rooms = vec![room(1, 0, 0, 4, 4), room(2, 10, 10, 4, 4)];
        let mut rng = DungeonRng::from_seed(1);
        assert_eq!(try_place(&rooms[0], &rooms[1], &rooms, 1, &mut rng), None);
    }

    #[test]
    fn coverage_saturates_above_two() {
        let rooms = vec![
            room(1, 0, 0, 5, 5),
            room(2, 4, 0, 5, 5),
            room(3, 0, 4, 5, 5),
            room(4, 4, 4, 5, 5),
        ];
        assert_eq!(count_cover_at(&rooms, Point { x: 4.0, z: 4.0 }), 3);
        assert_eq!(count_cover_at(&rooms, Point { x: 4.0, z: 2.0 }), 2);
        assert_eq!(count_cover_at(&rooms, Point { x: 1.0, z: 1.0 }), 1);
        assert_eq!(count_cover_at(&rooms, Point { x: 20.0, z: 1.0 }), 0);
    }

    #[test]
    fn door_across_a_junction_is_rejected() {
        let rooms = t_junction();
        let straddling = Door {
            id: RoomPair(RoomId(1), RoomId(2)),
            center: Point { x: 5.0, z: 4.0 },
            size: DoorSize { width: 1, depth: 2 },
            axis: DoorAxis::AlongZ,
        };
        assert!(!is_valid_door(&straddling, &rooms[0], &rooms[1], &rooms));
    }

    #[test]
    fn every_placed_door_passes_the_probe_test() {
        let rooms = t_junction();
        let mut rng = DungeonRng::from_seed(9);
        let doors = place_doors(&rooms, 2, &mut rng, &mut Silent);
        assert_eq!(doors.len(), 3);
        for door in &doors {
            for probe in door_probes(door) {
                assert_eq!(count_cover_at(&rooms, probe), 2, "probe {probe:?} of {door:?}");
            }
        }
    }
}
