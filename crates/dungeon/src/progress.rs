//! Incremental progress reporting for a generation run.

use crate::types::{RoomId, RoomPair};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Partition,
    Doors,
    Prune,
    Connectivity,
    Raster,
    Walls,
    FloodFill,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GenerationEvent {
    RoomSplit { parent: RoomId, children: [RoomId; 2] },
    RoomFinalized { room: RoomId },
    DoorPlaced { door: RoomPair },
    RoomsPruned { rooms: Vec<RoomId>, doors_removed: usize },
    ConnectionAccepted { connection: RoomPair, forced: bool },
    StageComplete(Stage),
    /// Rooms and doors are final; rasterization may start.
    LayoutReady,
    /// Flood fill finished; the reachable set is available for navigation.
    NavigationReady,
}

pub trait ProgressObserver {
    fn on_event(&mut self, event: &GenerationEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&GenerationEvent),
{
    fn on_event(&mut self, event: &GenerationEvent) {
        self(event);
    }
}

/// Observer that ignores everything.
pub struct Silent;

impl ProgressObserver for Silent {
    fn on_event(&mut self, _event: &GenerationEvent) {}
}
