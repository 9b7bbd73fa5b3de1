//! Removal of the smallest rooms before connectivity is resolved.

use std::collections::BTreeSet;

use log::debug;

use crate::progress::{GenerationEvent, ProgressObserver};
use crate::types::{Door, Room, RoomId};

/// Drops `floor(fraction * rooms.len())` rooms with the smallest area and
/// every door touching them. Area ties go to the room placed first; the
/// survivors keep their placement order.
pub(super) fn prune_smallest_rooms(
    rooms: &mut Vec<Room>,
    doors: &mut Vec<Door>,
    fraction: f64,
    observer: &mut dyn ProgressObserver,
) -> Vec<RoomId> {
    let prune_count = (fraction * rooms.len() as f64).floor() as usize;
    if prune_count == 0 {
        return Vec::new();
    }

    let mut by_area: Vec<&Room> = rooms.iter().collect();
    by_area.sort_by_key(|room| room.area());
    let removed: BTreeSet<RoomId> = by_area.iter().take(prune_count).map(|room| room.id).collect();

    rooms.retain(|room| !removed.contains(&room.id));
    let door_count = doors.len();
    doors.retain(|door| !removed.contains(&door.id.0) && !removed.contains(&door.id.1));
    let doors_removed = door_count - doors.len();

    let removed: Vec<RoomId> = removed.into_iter().collect();
    debug!("pruned {} rooms and {} doors", removed.len(), doors_removed);
    observer.on_event(&GenerationEvent::RoomsPruned { rooms: removed.clone(), doors_removed });
    removed
}
