//! Binary space partitioning of the starting bounds into leaf rooms.

use log::debug;

use crate::config::Bounds;
use crate::progress::{GenerationEvent, ProgressObserver};
use crate::rng::DungeonRng;
use crate::types::{Axis, Cell, Room, RoomId, RoomSize};

/// Rooms narrower than this along an axis are never split on that axis.
pub const MIN_SPLITTABLE_SIZE: u32 = 7;
const CUT_MARGIN: i32 = 3;

pub(super) struct RoomIds {
    next: u32,
}

impl RoomIds {
    pub(super) fn new() -> Self {
        Self { next: 0 }
    }

    fn allocate(&mut self) -> RoomId {
        let id = RoomId(self.next);
        self.next += 1;
        id
    }
}

/// Splits the bounds until every room fits `max_room_size` or can no longer be cut.
///
/// The work list is a stack: the most recently produced room is examined
/// next, and a cut position is drawn only when a split actually happens.
pub(super) fn partition_rooms(
    bounds: Bounds,
    max_room_size: u32,
    rng: &mut DungeonRng,
    observer: &mut dyn ProgressObserver,
) -> Vec<Room> {
    let mut ids = RoomIds::new();
    let root = Room {
        id: ids.allocate(),
        origin: Cell::new(0, 0),
        size: RoomSize {
            width: bounds.width as u32,
            depth: bounds.depth as u32,
            height: bounds.height as u32,
        },
    };

    let mut unfinished = vec![root];
    let mut finished = Vec::new();
    while let Some(current) = unfinished.pop() {
        match split_axis(&current, max_room_size) {
            Some(axis) => {
                let cut = rng.range_i32(CUT_MARGIN, current.extent(axis) as i32 - CUT_MARGIN);
                let (first, second) = split_room(&current, axis, cut, &mut ids);
                observer.on_event(&GenerationEvent::RoomSplit {
                    parent: current.id,
                    children: [first.id, second.id],
                });
                unfinished.push(first);
                unfinished.push(second);
            }
            None => {
                observer.on_event(&GenerationEvent::RoomFinalized { room: current.id });
                finished.push(current);
            }
        }
    }

    debug!("partitioned {}x{} bounds into {} rooms", bounds.width, bounds.depth, finished.len());
    finished
}

fn split_axis(room: &Room, max_room_size: u32) -> Option<Axis> {
    [Axis::X, Axis::Z].into_iter().find(|&axis| {
        let extent = room.extent(axis);
        extent > max_room_size && extent >= MIN_SPLITTABLE_SIZE
    })
}

/// Both halves keep the cut column (or row) as their shared wall.
fn split_room(room: &Room, axis: Axis, cut: i32, ids: &mut RoomIds) -> (Room, Room) {
    let cut_cells = cut as u32;
    let mut first = Room { id: ids.allocate(), ..*room };
    let mut second = Room { id: ids.allocate(), ..*room };
    match axis {
        Axis::X => {
            first.size.width = cut_cells + 1;
            second.origin.x += cut;
            second.size.width = room.size.width - cut_cells;
        }
        Axis::Z => {
            first.size.depth = cut_cells + 1;
            second.origin.z += cut;
            second.size.depth = room.size.depth - cut_cells;
        }
    }
    (first, second)
}
