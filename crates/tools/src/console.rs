//! Plain-text rendering of snapshots for `--watch`.

use chambers::{ChamberKind, Cue, RenderSink, RenderSnapshot};

fn glyph(kind: ChamberKind) -> char {
    match kind {
        ChamberKind::Unknown => '#',
        ChamberKind::Empty => '.',
        ChamberKind::Spawn => 's',
        ChamberKind::Treasure => '$',
        ChamberKind::Trap => '^',
        ChamberKind::Puzzle => '?',
        ChamberKind::Locked => 'L',
        ChamberKind::Npc => 'n',
        ChamberKind::Secret => '*',
    }
}

/// Draws the viewer's fogged map with seat numbers over occupied chambers.
pub fn draw_map(snapshot: &RenderSnapshot) -> String {
    let map = &snapshot.map;
    let mut out = String::with_capacity((map.width + 1) * map.height);
    for row in map.cells.chunks(map.width.max(1)) {
        for cell in row {
            let token = snapshot
                .players
                .iter()
                .find(|player| player.alive && player.pos == cell.pos)
                .and_then(|player| char::from_digit(player.seat as u32, 10));
            out.push(token.unwrap_or_else(|| glyph(cell.kind)));
        }
        out.push('\n');
    }
    out
}

#[derive(Default)]
pub struct ConsoleSink {
    frames: u64,
}

impl RenderSink for ConsoleSink {
    fn render(&mut self, snapshot: &RenderSnapshot) {
        self.frames += 1;
        let turn = &snapshot.turn;
        println!(
            "-- round {} | {:?} | seat {:?} | {}/{} alive --",
            turn.round, turn.phase, turn.active_seat, turn.players_alive, turn.total_players
        );
        print!("{}", draw_map(snapshot));
        for player in &snapshot.players {
            println!(
                "  [{}] {:<12} hp {:>3}/{} gold {:>3} score {:>4}{}",
                player.seat,
                player.name,
                player.health,
                player.max_health,
                player.gold,
                player.score,
                if player.alive { "" } else { " (fallen)" }
            );
        }
        if let Some(line) = snapshot.log.last() {
            println!("  > {}", line.message);
        }
    }

    fn cue(&mut self, cue: &Cue) {
        tracing::trace!(frame = self.frames, ?cue, "cue");
    }
}

#[cfg(test)]
mod tests {
    use chambers::{Game, GameConfig, Map, Pos};

    use super::*;

    #[test]
    fn map_shows_seats_over_fog() {
        let mut map = Map::new(3, 3);
        map.spawns = vec![Pos::new(0, 0)];
        map.set_kind(Pos::new(1, 1), ChamberKind::Secret);
        let config = GameConfig { player_count: 1, ..GameConfig::default() };
        let game = Game::with_map(config, 1, map).unwrap();
        let snapshot = game.snapshot(game.human().unwrap());
        assert_eq!(draw_map(&snapshot), "0.#\n.*#\n###\n");
    }
}
