//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating map and seat setup across many tests.
//! It does not own production gameplay logic.

use super::*;

pub(super) fn single_human_config() -> GameConfig {
    GameConfig { player_count: 1, human_seat: Some(0), ..GameConfig::default() }
}

pub(super) fn single_bot_config() -> GameConfig {
    GameConfig {
        player_count: 1,
        human_seat: None,
        bot_strategies: vec![Strategy::Balanced.label().to_string()],
        ..GameConfig::default()
    }
}

pub(super) fn all_bots_config() -> GameConfig {
    GameConfig { human_seat: None, ..GameConfig::default() }
}

/// A 4x1 corridor: spawn at (0, 0), `middle` at (1, 0), the Secret Chamber at (3, 0).
pub(super) fn corridor_map(middle: ChamberKind) -> Map {
    let mut map = Map::new(4, 1);
    map.set_kind(Pos::new(0, 0), ChamberKind::Spawn);
    map.set_kind(Pos::new(1, 0), middle);
    map.goal = Pos::new(3, 0);
    map.set_kind(map.goal, ChamberKind::Secret);
    map.spawns = vec![Pos::new(0, 0)];
    map
}

pub(super) fn corridor_game(middle: ChamberKind) -> Game {
    Game::with_map(single_human_config(), 1, corridor_map(middle)).unwrap()
}

pub(super) fn bot_corridor_game(middle: ChamberKind) -> Game {
    Game::with_map(single_bot_config(), 1, corridor_map(middle)).unwrap()
}

/// One balanced bot at (1, 1) of an empty 5x5 room.
pub(super) fn bot_open_room_game() -> Game {
    let mut map = Map::new(5, 5);
    map.set_kind(map.goal, ChamberKind::Secret);
    map.spawns = vec![Pos::new(1, 1)];
    Game::with_map(single_bot_config(), 1, map).unwrap()
}

/// Turns `pos` into a locked door whose key is named after it.
pub(super) fn lock(game: &mut Game, pos: Pos) {
    let chamber = game.map.chamber_mut(pos).unwrap();
    chamber.kind = ChamberKind::Locked;
    chamber.required_key = Some(KeyId(pos));
}
