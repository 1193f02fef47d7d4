//! Bot turn execution once the thinking delay has elapsed.
//! This module exists to translate policy decisions into controller moves.
//! It does not own move scoring; see `crate::bot` for that.

use super::*;
use crate::bot::{self, BotView};
use crate::rng::Roller;

impl Game {
    pub(super) fn execute_bot_turn(&mut self, id: PlayerId) -> Option<MoveReport> {
        if !self.players.get(id).is_some_and(|player| player.alive && player.is_bot()) {
            tracing::warn!(?id, "bot turn fired for a seat that cannot move");
            self.end_turn();
            return None;
        }

        for kind in bot::planned_item_uses(&self.players[id]) {
            if let Err(err) = self.apply_item(id, kind) {
                tracing::debug!(player = %self.players[id].name, ?kind, %err, "bot item use skipped");
            }
        }

        let view = BotView { map: &self.map, players: &self.players };
        let Some(choice) = bot::decide(&self.players[id], view, &mut self.rng) else {
            self.push_log(Severity::Info, format!("{} has nowhere to go.", self.players[id].name));
            self.end_turn();
            return None;
        };
        let target = choice.target;
        let required_key = if choice.blocked { choice.chamber.required_key } else { None };

        let (target, unlocked) = match required_key {
            None => (target, None),
            Some(key) if self.players[id].has_key(key) => {
                self.unlock_with_key(id, target, key);
                (target, Some(key))
            }
            Some(_) => match self.fallback_move(id) {
                Some(fallback) => (fallback, None),
                None => {
                    self.end_turn();
                    return None;
                }
            },
        };
        Some(self.execute_move(id, target, unlocked))
    }

    /// Any open neighbour, picked uniformly, for a bot that chose a door it cannot open.
    fn fallback_move(&mut self, id: PlayerId) -> Option<Pos> {
        let open: Vec<Pos> = self
            .map
            .valid_moves(self.players[id].pos)
            .into_iter()
            .filter(|step| !step.blocked)
            .map(|step| step.target)
            .collect();
        if open.is_empty() {
            return None;
        }
        Some(open[self.rng.pick_index(open.len())])
    }
}
