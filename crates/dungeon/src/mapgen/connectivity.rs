//! Door selection that keeps every surviving room reachable.
//!
//! A randomized breadth-first wave starts from a random room. Each dequeued
//! room always connects one unvisited neighbor (when it has any) and
//! connects further doors with `branch_chance`, which also closes loops
//! back into already visited rooms. Rooms the wave misses are either
//! dropped or bridged in by a forced door followed by another wave.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::ConnectivityMode;
use crate::progress::{GenerationEvent, ProgressObserver};
use crate::rng::DungeonRng;
use crate::types::{Connection, Door, Room, RoomId};

/// Room id to the indices of the doors touching it.
pub struct AdjacencyGraph {
    incident: BTreeMap<RoomId, Vec<usize>>,
}

impl AdjacencyGraph {
    pub fn build(rooms: &[Room], doors: &[Door]) -> Self {
        let mut incident: BTreeMap<RoomId, Vec<usize>> =
            rooms.iter().map(|room| (room.id, Vec::new())).collect();
        for (index, door) in doors.iter().enumerate() {
            for end in [door.id.0, door.id.1] {
                if let Some(list) = incident.get_mut(&end) {
                    list.push(index);
                }
            }
        }
        Self { incident }
    }

    pub fn doors_of(&self, room: RoomId) -> &[usize] {
        self.incident.get(&room).map_or(&[], Vec::as_slice)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub waves: usize,
    pub forced_bridges: usize,
    /// Connected components of the final room/door graph.
    pub components: usize,
    /// Rooms outside the component of the first traversal root.
    pub unreachable: Vec<RoomId>,
    /// Rooms dropped because no wave reached them.
    pub removed_rooms: Vec<RoomId>,
}

impl ConnectivityReport {
    pub fn is_connected(&self) -> bool {
        self.components <= 1
    }
}

pub(super) struct ConnectivityParams {
    pub(super) mode: ConnectivityMode,
    pub(super) branch_chance: f64,
}

struct Traversal<'a> {
    doors: &'a [Door],
    graph: &'a AdjacencyGraph,
    branch_chance: f64,
    visited: BTreeSet<RoomId>,
    accepted: BTreeSet<Connection>,
    connections: Vec<Connection>,
}

impl Traversal<'_> {
    fn accept(
        &mut self,
        connection: Connection,
        forced: bool,
        observer: &mut dyn ProgressObserver,
    ) {
        if self.accepted.insert(connection) {
            self.connections.push(connection);
            observer.on_event(&GenerationEvent::ConnectionAccepted { connection, forced });
        }
    }

    fn wave(&mut self, root: RoomId, rng: &mut DungeonRng, observer: &mut dyn ProgressObserver) {
        let mut queue = VecDeque::from([root]);
        self.visited.insert(root);

        while let Some(current) = queue.pop_front() {
            let mut incident = self.graph.doors_of(current).to_vec();
            rng.shuffle(&mut incident);

            let mut guaranteed_connected = false;
            for door_index in incident {
                let connection = self.doors[door_index].id;
                if self.accepted.contains(&connection) {
                    continue;
                }
                let Some(neighbor) = connection.other(current) else {
                    continue;
                };

                if !self.visited.contains(&neighbor) {
                    if guaranteed_connected && !rng.chance(self.branch_chance) {
                        continue;
                    }
                    guaranteed_connected = true;
                    self.visited.insert(neighbor);
                    queue.push_back(neighbor);
                    self.accept(connection, false, observer);
                } else if rng.chance(self.branch_chance) {
                    self.accept(connection, false, observer);
                }
            }
        }
    }

    /// First door, in placement order, leading from the visited set outward.
    fn bridge(&self) -> Option<(Connection, RoomId)> {
        self.doors.iter().find_map(|door| {
            let a_visited = self.visited.contains(&door.id.0);
            let b_visited = self.visited.contains(&door.id.1);
            match (a_visited, b_visited) {
                (true, false) => Some((door.id, door.id.1)),
                (false, true) => Some((door.id, door.id.0)),
                _ => None,
            }
        })
    }
}

pub(super) struct ConnectivityOutcome {
    pub(super) connections: Vec<Connection>,
    pub(super) report: ConnectivityReport,
}

/// Selects the final doors. On return `doors` holds only connected doors and,
/// in prune mode, `rooms` holds only reached rooms.
pub(super) fn resolve_connectivity(
    rooms: &mut Vec<Room>,
    doors: &mut Vec<Door>,
    params: &ConnectivityParams,
    rng: &mut DungeonRng,
    observer: &mut dyn ProgressObserver,
) -> ConnectivityOutcome {
    let Some(&root) = rng.pick(rooms.as_slice()) else {
        return ConnectivityOutcome {
            connections: Vec::new(),
            report: ConnectivityReport::default(),
        };
    };

    let graph = AdjacencyGraph::build(rooms, doors);
    let mut traversal = Traversal {
        doors: doors.as_slice(),
        graph: &graph,
        branch_chance: params.branch_chance,
        visited: BTreeSet::new(),
        accepted: BTreeSet::new(),
        connections: Vec::new(),
    };
    let mut report = ConnectivityReport::default();

    traversal.wave(root.id, rng, observer);
    report.waves = 1;

    match params.mode {
        ConnectivityMode::PruneUnreached => {
            report.removed_rooms = rooms
                .iter()
                .map(|room| room.id)
                .filter(|id| !traversal.visited.contains(id))
                .collect();
        }
        ConnectivityMode::Bridge => {
            let mut main_component: Option<BTreeSet<RoomId>> = None;
            loop {
                let unvisited: Vec<RoomId> = rooms
                    .iter()
                    .map(|room| room.id)
                    .filter(|id| !traversal.visited.contains(id))
                    .collect();
                if unvisited.is_empty() {
                    break;
                }

                let next_root = match traversal.bridge() {
                    Some((connection, outside)) => {
                        traversal.accept(connection, true, observer);
                        report.forced_bridges += 1;
                        outside
                    }
                    None => {
                        warn!(
                            "no door bridges {} visited rooms to {} remaining rooms",
                            traversal.visited.len(),
                            unvisited.len()
                        );
                        main_component.get_or_insert_with(|| traversal.visited.clone());
                        unvisited[rng.index(unvisited.len())]
                    }
                };
                traversal.wave(next_root, rng, observer);
                report.waves += 1;
            }

            if let Some(main_component) = main_component {
                report.unreachable = rooms
                    .iter()
                    .map(|room| room.id)
                    .filter(|id| !main_component.contains(id))
                    .collect();
            }
        }
    }

    let Traversal { accepted, connections, .. } = traversal;
    let removed: BTreeSet<RoomId> = report.removed_rooms.iter().copied().collect();
    rooms.retain(|room| !removed.contains(&room.id));
    let candidate_doors = doors.len();
    doors.retain(|door| accepted.contains(&door.id));
    report.components = count_components(rooms, doors);

    debug!(
        "kept {} of {} doors over {} waves ({} forced, {} rooms dropped)",
        doors.len(),
        candidate_doors,
        report.waves,
        report.forced_bridges,
        report.removed_rooms.len()
    );
    ConnectivityOutcome { connections, report }
}

/// Connected components of the room graph induced by `doors`.
pub fn count_components(rooms: &[Room], doors: &[Door]) -> usize {
    let graph = AdjacencyGraph::build(rooms, doors);
    let mut seen = BTreeSet::new();
    let mut components = 0;
    for room in rooms {
        if !seen.insert(room.id) {
            continue;
        }
        components += 1;
        let mut queue = VecDeque::from([room.id]);
        while let Some(current) = queue.pop_front() {
            for &door_index in graph.doors_of(current) {
                if let Some(next) = doors[door_index].id.other(current)
                    && seen.insert(next)
                {
                    queue.push_back(next);
                }
            }
        }
    }
    components
}
