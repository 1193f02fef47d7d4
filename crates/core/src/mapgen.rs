//! Procedural chamber map generation split into layout, carving, and lock stages.

mod carve;
mod layout;
mod locks;

use crate::map::Map;
use crate::rng::Roller;
use crate::types::{ChamberKind, Pos};

pub use layout::{QUOTA_PERCENTS, quota_counts};

pub struct MapGenerator {
    width: usize,
    height: usize,
}

impl MapGenerator {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn generate(&self, player_count: usize, roller: &mut impl Roller) -> Map {
        let mut map = Map::new(self.width, self.height);

        let placed = layout::assign_chamber_kinds(&mut map, roller);
        tracing::debug!(
            width = self.width,
            height = self.height,
            treasure = placed.treasure,
            trap = placed.trap,
            puzzle = placed.puzzle,
            npc = placed.npc,
            locked = placed.locked,
            "assigned chamber quotas"
        );

        let goal = map.goal;
        map.set_kind(goal, ChamberKind::Secret);

        map.spawns =
            spawn_corners(self.width, self.height).into_iter().take(player_count).collect();
        for spawn in map.spawns.clone() {
            map.set_kind(spawn, ChamberKind::Spawn);
        }

        let mut paths = Vec::with_capacity(map.spawns.len());
        for spawn in map.spawns.clone() {
            paths.push(carve::carve_path(&mut map, spawn, goal, roller));
        }
        let repaired = carve::repair_unreachable_spawns(&mut map, &paths);
        if repaired > 0 {
            tracing::debug!(repaired, "demoted locks blocking spawn paths");
        }

        let keyless = locks::place_locks_and_keys(&mut map, roller);
        if keyless > 0 {
            tracing::debug!(keyless, "locks left without a key");
        }

        map
    }
}

/// Corner order: top-left, top-right, bottom-left, bottom-right.
pub fn spawn_corners(width: usize, height: usize) -> [Pos; 4] {
    let right = width as i32 - 1;
    let bottom = height as i32 - 1;
    [Pos::new(0, 0), Pos::new(right, 0), Pos::new(0, bottom), Pos::new(right, bottom)]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use slotmap::SlotMap;

    use super::*;
    use crate::map::Chamber;
    use crate::rng::GameRng;
    use crate::types::{ItemKind, KeyId, PlayerId};

    fn generate(seed: u64, width: usize, height: usize, players: usize) -> Map {
        MapGenerator::new(width, height).generate(players, &mut GameRng::from_seed(seed))
    }

    fn lock_free(chamber: &Chamber) -> bool {
        chamber.kind != ChamberKind::Locked
    }

    #[test]
    fn default_map_has_one_goal_at_centre_and_spawns_in_corners() {
        let map = generate(42, 8, 8, 4);
        assert_eq!(map.count_kind(ChamberKind::Secret), 1);
        assert_eq!(map.goal, Pos::new(4, 4));
        assert_eq!(map.kind_at(map.goal), Some(ChamberKind::Secret));
        assert_eq!(
            map.spawns,
            vec![Pos::new(0, 0), Pos::new(7, 0), Pos::new(0, 7), Pos::new(7, 7)]
        );
        assert_eq!(map.count_kind(ChamberKind::Spawn), 4);
    }

    #[test]
    fn fewer_players_leave_remaining_corners_untouched() {
        let map = generate(7, 8, 8, 2);
        assert_eq!(map.spawns.len(), 2);
        assert_eq!(map.count_kind(ChamberKind::Spawn), 2);
        assert_eq!(map.kind_at(Pos::new(0, 7)), Some(ChamberKind::Empty));
    }

    #[test]
    fn same_seed_generates_identical_maps() {
        assert_eq!(generate(2024, 10, 9, 4), generate(2024, 10, 9, 4));
    }

    #[test]
    fn every_key_opens_an_existing_lock() {
        for seed in [1_u64, 2, 3, 99, 1_024] {
            let map = generate(seed, 10, 10, 4);
            for chamber in map.chambers() {
                let Some(item) = chamber.item else { continue };
                assert_eq!(item.kind, ItemKind::Key);
                assert_eq!(chamber.kind, ChamberKind::Treasure);
                let KeyId(lock) = item.key.unwrap();
                let locked = map.chamber(lock).unwrap();
                assert_eq!(locked.kind, ChamberKind::Locked);
                assert_eq!(locked.required_key, item.key);
            }
        }
    }

    #[test]
    fn generated_maps_keep_fog_unexplored() {
        let map = generate(5, 8, 8, 4);
        let mut arena: SlotMap<PlayerId, ()> = SlotMap::with_key();
        let player = arena.insert(());
        assert_eq!(map.explored_count(player), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn every_spawn_reaches_the_goal_without_crossing_locks(
            seed in any::<u64>(),
            width in 3_usize..14,
            height in 3_usize..14,
            players in 1_usize..=4,
        ) {
            let map = generate(seed, width, height, players);
            prop_assert_eq!(map.count_kind(ChamberKind::Secret), 1);
            prop_assert_eq!(map.spawns.len(), players);
            for spawn in &map.spawns {
                prop_assert!(map.is_corner(*spawn));
                prop_assert!(
                    map.path_exists(*spawn, map.goal, lock_free),
                    "seed={seed} {width}x{height} spawn={spawn} cannot reach the goal"
                );
            }
        }

        #[test]
        fn quotas_never_exceed_their_share(seed in any::<u64>(), size in 3_usize..16) {
            let map = generate(seed, size, size, 4);
            let counts = quota_counts(size * size);
            prop_assert!(map.count_kind(ChamberKind::Treasure) <= counts[0]);
            prop_assert!(map.count_kind(ChamberKind::Trap) <= counts[1]);
            prop_assert!(map.count_kind(ChamberKind::Puzzle) <= counts[2]);
            prop_assert!(map.count_kind(ChamberKind::Npc) <= counts[3]);
            prop_assert!(map.count_kind(ChamberKind::Locked) <= counts[4]);
        }
    }
}
