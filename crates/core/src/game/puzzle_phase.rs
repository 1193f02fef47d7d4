//! The human puzzle sub-phase: prompt, hints, answer, and reward or penalty.
//! This module exists to keep the paused-scheduler flow separate from movement.
//! It does not own puzzle content or answer matching.

use super::*;
use crate::content;
use crate::puzzles::{AnswerResult, PuzzleEffect, PuzzleKind};

/// What the human needs to see to answer the pending puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzlePrompt {
    pub id: &'static str,
    pub kind: PuzzleKind,
    pub question: &'static str,
    pub hints_shown: usize,
    pub hints_available: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PuzzleResolution {
    AwaitingAnswer(PuzzlePrompt),
    Resolved(AnswerResult),
}

impl Game {
    pub fn pending_puzzle(&self) -> Option<PuzzlePrompt> {
        self.pending_puzzle.map(|pending| PuzzlePrompt {
            id: pending.puzzle.id,
            kind: pending.puzzle.kind,
            question: pending.puzzle.question,
            hints_shown: pending.hints_shown,
            hints_available: pending.puzzle.hints.len(),
        })
    }

    /// Reveals the next hint. Asking past the last one is allowed and says so.
    pub fn puzzle_hint(&mut self) -> Result<&'static str, GameError> {
        let pending = self.pending_puzzle.as_mut().ok_or(GameError::NoPendingPuzzle)?;
        let hint = self.puzzles.hint(pending.puzzle, pending.hints_shown);
        if pending.hints_shown < pending.puzzle.hints.len() {
            pending.hints_shown += 1;
        }
        self.push_log(Severity::Info, format!("Hint: {hint}"));
        Ok(hint)
    }

    /// Checks the answer, applies the reward or penalty, and resumes turn rotation.
    pub fn answer_puzzle(&mut self, answer: &str) -> Result<AnswerResult, GameError> {
        let pending = self.pending_puzzle.take().ok_or(GameError::NoPendingPuzzle)?;
        let result = self.puzzles.check_answer(pending.puzzle, answer);
        let was_alive = self.players[pending.player].alive;
        self.apply_puzzle_result(pending.player, pending.chamber, result);
        self.map.set_kind(pending.chamber, ChamberKind::Empty);
        if was_alive && !self.players[pending.player].alive {
            self.announce_death(pending.player);
        }

        self.scheduler.resume(&self.players);
        self.end_turn();
        self.notify_render_sink();
        Ok(result)
    }

    pub(super) fn apply_puzzle_result(&mut self, id: PlayerId, chamber: Pos, result: AnswerResult) {
        let name = self.players[id].name.clone();
        match result {
            AnswerResult::Correct(reward) => {
                self.players[id].puzzles_solved += 1;
                let detail = self.apply_puzzle_effect(id, chamber, reward);
                self.push_log(Severity::Success, format!("{name}: Puzzle solved! {detail}"));
                self.cue(Cue::Particles { pos: chamber, color: "#44ff44", count: 15 });
            }
            AnswerResult::Wrong(penalty) => {
                let detail = self.apply_puzzle_effect(id, chamber, penalty);
                self.push_log(Severity::Danger, format!("{name}: Wrong answer! {detail}"));
                self.cue(Cue::Shake { intensity: 3 });
            }
        }
        tracing::debug!(player = %name, solved = result.is_correct(), "puzzle resolved");
    }

    fn apply_puzzle_effect(&mut self, id: PlayerId, chamber: Pos, effect: PuzzleEffect) -> String {
        let player = &mut self.players[id];
        match effect {
            PuzzleEffect::GainGold { amount } => {
                player.add_gold(amount);
                format!("(+{amount} gold)")
            }
            PuzzleEffect::GrantItem { item } => {
                let item = Item::of(item);
                let name = content::item_name(&item);
                if player.inventory.add(item).is_err() {
                    self.leave_in_chamber(chamber, item);
                }
                format!("(Received {name})")
            }
            PuzzleEffect::Damage { amount } => {
                let dealt = player.take_damage(amount);
                format!("(-{dealt} HP)")
            }
            PuzzleEffect::LoseGold { amount } => {
                let lost = player.remove_gold(amount);
                format!("(-{lost} gold)")
            }
        }
    }
}
