//! Spawn-to-goal path carving and the reachability repair pass that follows it.

use crate::map::{Chamber, Map};
use crate::rng::Roller;
use crate::types::{ChamberKind, Pos};

/// Steps from the spawn during which any lock is demoted.
const EARLY_STEPS: usize = 2;

fn toward(from: i32, to: i32) -> i32 {
    if from < to { from + 1 } else { from - 1 }
}

/// Walks one cell at a time toward `to`, choosing the x axis half of the time
/// when both axes are off target. Returns the visited cells including `from`.
pub(super) fn carve_path(map: &mut Map, from: Pos, to: Pos, roller: &mut impl Roller) -> Vec<Pos> {
    let mut path = vec![from];
    let mut current = from;
    while current != to {
        let use_x = current.x != to.x && (current.y == to.y || roller.chance(50));
        current = if use_x {
            Pos::new(toward(current.x, to.x), current.y)
        } else {
            Pos::new(current.x, toward(current.y, to.y))
        };
        path.push(current);

        if path.len() <= EARLY_STEPS + 1
            && let Some(chamber) = map.chamber_mut(current)
            && chamber.kind == ChamberKind::Locked
        {
            chamber.kind = ChamberKind::Empty;
        }
    }
    path
}

fn lock_free(chamber: &Chamber) -> bool {
    chamber.kind != ChamberKind::Locked
}

/// Any spawn that cannot reach the goal without crossing a lock gets every lock
/// on its carved path demoted. Returns the number of demoted locks.
pub(super) fn repair_unreachable_spawns(map: &mut Map, paths: &[Vec<Pos>]) -> usize {
    let goal = map.goal;
    let mut demoted = 0;
    for path in paths {
        let Some(&spawn) = path.first() else { continue };
        if map.path_exists(spawn, goal, lock_free) {
            continue;
        }
        for &pos in path {
            if map.kind_at(pos) == Some(ChamberKind::Locked) {
                map.set_kind(pos, ChamberKind::Empty);
                demoted += 1;
            }
        }
        tracing::debug!(%spawn, demoted, "spawn cut off from goal, cleared carved path");
    }
    demoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GameRng, ScriptedRoller};

    #[test]
    fn carved_path_is_contiguous_and_ends_at_target() {
        let mut map = Map::new(9, 7);
        let mut rng = GameRng::from_seed(17);
        let path = carve_path(&mut map, Pos::new(0, 6), Pos::new(4, 3), &mut rng);
        assert_eq!(path.first(), Some(&Pos::new(0, 6)));
        assert_eq!(path.last(), Some(&Pos::new(4, 3)));
        assert_eq!(path.len(), 8);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn locks_in_the_first_two_steps_are_demoted() {
        let mut map = Map::new(5, 5);
        for x in 1..=3 {
            map.set_kind(Pos::new(x, 0), ChamberKind::Locked);
        }
        let mut roller = ScriptedRoller::default();
        let path = carve_path(&mut map, Pos::new(0, 0), Pos::new(3, 0), &mut roller);
        assert_eq!(path.len(), 4);
        assert_eq!(map.kind_at(Pos::new(1, 0)), Some(ChamberKind::Empty));
        assert_eq!(map.kind_at(Pos::new(2, 0)), Some(ChamberKind::Empty));
        assert_eq!(map.kind_at(Pos::new(3, 0)), Some(ChamberKind::Locked));
    }

    #[test]
    fn repair_opens_a_walled_in_spawn() {
        let mut map = Map::new(5, 5);
        map.set_kind(map.goal, ChamberKind::Secret);
        for y in 0..5 {
            map.set_kind(Pos::new(1, y), ChamberKind::Locked);
        }
        let path = vec![Pos::new(0, 2), Pos::new(1, 2), Pos::new(2, 2)];
        assert!(!map.path_exists(Pos::new(0, 2), map.goal, lock_free));

        assert_eq!(repair_unreachable_spawns(&mut map, &[path]), 1);
        assert!(map.path_exists(Pos::new(0, 2), map.goal, lock_free));
        assert_eq!(map.kind_at(Pos::new(1, 0)), Some(ChamberKind::Locked));
    }
}
