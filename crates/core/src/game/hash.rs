//! Stable snapshot hashing for determinism checks.
//! This module exists to keep hashing concerns separate from simulation control code.
//! It does not own replay or persistence policies.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl Game {
    /// Fingerprint of seed, turn state, positions and vitals. Two games fed the same
    /// inputs from the same seed hash equal after every step.
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.scheduler.round());
        hasher.write_u8(match self.scheduler.phase() {
            TurnPhase::Waiting => 0,
            TurnPhase::PlayerTurn => 1,
            TurnPhase::BotThinking => 2,
            TurnPhase::GameOver => 3,
        });
        let active = self.scheduler.current().and_then(|id| self.seat_of(id));
        hasher.write_u8(active.map_or(u8::MAX, |seat| seat as u8));
        for id in &self.seats {
            let player = &self.players[*id];
            hasher.write_i32(player.pos.x);
            hasher.write_i32(player.pos.y);
            hasher.write_i32(player.health);
            hasher.write_u32(player.gold);
            hasher.write_i32(player.score);
            hasher.write_u8(u8::from(player.alive));
            hasher.write_u32(player.turns_taken);
        }
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(GameOutcome::AllDefeated) => 1,
            Some(GameOutcome::Winner(id)) => 2 + self.seat_of(id).map_or(0, |seat| seat as u8),
        });
        hasher.finish()
    }
}
