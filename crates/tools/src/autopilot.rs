//! Plays the human seat when no person is at the keyboard.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chambers::puzzles::PUZZLE_POOL;
use chambers::{Game, GameRng, ItemKind, Pos, PuzzlePrompt, Roller};

/// Health below which the autopilot drinks a potion before moving.
const DRINK_BELOW: i32 = 50;

pub struct Autopilot {
    rng: GameRng,
    visits: HashMap<Pos, u32>,
    solve_percent: u32,
}

impl Autopilot {
    pub fn new(seed: u64, solve_percent: u32) -> Self {
        Self { rng: GameRng::from_seed(seed ^ 0x5eed), visits: HashMap::new(), solve_percent }
    }

    /// One human turn: an optional potion, then a step toward the least-visited open
    /// neighbour closest to the goal.
    pub fn take_turn(&mut self, game: &mut Game) -> Result<()> {
        let human = game.human().context("autopilot needs a human seat")?;
        let player = &game.players()[human];
        if player.health < DRINK_BELOW && player.has_item(ItemKind::HealthPotion) {
            game.use_item(ItemKind::HealthPotion).context("drinking a potion")?;
        }

        let player = &game.players()[human];
        let goal = game.map().goal;
        let visits = &self.visits;
        let target = game
            .map()
            .valid_moves(player.pos)
            .into_iter()
            .filter(|step| {
                !step.blocked || step.chamber.required_key.is_some_and(|key| player.has_key(key))
            })
            .min_by_key(|step| {
                (visits.get(&step.target).copied().unwrap_or(0), step.target.manhattan(goal))
            })
            .map(|step| step.target)
            .context("no open neighbour to move to")?;
        *self.visits.entry(target).or_default() += 1;
        tracing::debug!(%target, "autopilot move");
        game.request_move(target).with_context(|| format!("moving to {target}"))?;
        Ok(())
    }

    /// Answers correctly `solve_percent` of the time, after reading one hint.
    pub fn answer(&mut self, game: &mut Game, prompt: PuzzlePrompt) -> Result<()> {
        game.puzzle_hint().context("asking for a hint")?;
        let solve = self.rng.chance(self.solve_percent);
        let answer = match PUZZLE_POOL.iter().find(|puzzle| puzzle.id == prompt.id) {
            Some(puzzle) if solve => puzzle.answer,
            _ => "I give up",
        };
        let result = game.answer_puzzle(answer).context("answering the puzzle")?;
        tracing::debug!(puzzle = prompt.id, correct = result.is_correct(), "autopilot answered");
        Ok(())
    }
}
