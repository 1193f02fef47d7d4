//! Chamber type quotas and their placement over shuffled candidate cells.

use crate::map::Map;
use crate::rng::Roller;
use crate::types::{ChamberKind, Pos};

/// Share of all cells per special chamber kind, assigned in this order.
pub const QUOTA_PERCENTS: [(ChamberKind, usize); 5] = [
    (ChamberKind::Treasure, 15),
    (ChamberKind::Trap, 12),
    (ChamberKind::Puzzle, 8),
    (ChamberKind::Npc, 5),
    (ChamberKind::Locked, 8),
];

pub fn quota_counts(total_cells: usize) -> [usize; 5] {
    QUOTA_PERCENTS.map(|(_, percent)| total_cells * percent / 100)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct PlacedKinds {
    pub(super) treasure: usize,
    pub(super) trap: usize,
    pub(super) puzzle: usize,
    pub(super) npc: usize,
    pub(super) locked: usize,
}

impl PlacedKinds {
    fn record(&mut self, kind: ChamberKind) {
        match kind {
            ChamberKind::Treasure => self.treasure += 1,
            ChamberKind::Trap => self.trap += 1,
            ChamberKind::Puzzle => self.puzzle += 1,
            ChamberKind::Npc => self.npc += 1,
            ChamberKind::Locked => self.locked += 1,
            _ => {}
        }
    }
}

/// Corners hold spawns and the centre block is reserved for the goal.
fn candidate_cells(map: &Map) -> Vec<Pos> {
    let mut cells = Vec::new();
    for y in 0..map.height as i32 {
        for x in 0..map.width as i32 {
            let pos = Pos::new(x, y);
            if !map.is_corner(pos) && !map.is_center_block(pos) {
                cells.push(pos);
            }
        }
    }
    cells
}

pub(super) fn assign_chamber_kinds(map: &mut Map, roller: &mut impl Roller) -> PlacedKinds {
    let mut candidates = candidate_cells(map);
    roller.shuffle(&mut candidates);

    let counts = quota_counts(map.width * map.height);
    let mut queue = candidates.into_iter();
    let mut placed = PlacedKinds::default();
    for ((kind, _), count) in QUOTA_PERCENTS.into_iter().zip(counts) {
        for pos in queue.by_ref().take(count) {
            map.set_kind(pos, kind);
            placed.record(kind);
        }
    }
    placed
}
