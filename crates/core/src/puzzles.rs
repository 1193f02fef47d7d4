//! Puzzle pool, non-repeating issuance, and answer checking.

use std::collections::BTreeSet;
use std::iter;

use serde::Serialize;

use crate::rng::Roller;
use crate::types::ItemKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    Riddle,
    Math,
    Sequence,
    Cipher,
    Logic,
    Pattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PuzzleEffect {
    GainGold { amount: u32 },
    GrantItem { item: ItemKind },
    Damage { amount: i32 },
    LoseGold { amount: u32 },
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Puzzle {
    pub id: &'static str,
    pub kind: PuzzleKind,
    pub question: &'static str,
    pub answer: &'static str,
    pub aliases: &'static [&'static str],
    pub hints: &'static [&'static str],
    pub reward: PuzzleEffect,
    pub penalty: PuzzleEffect,
}

impl Puzzle {
    /// Trimmed, case-insensitive exact match against the answer or any alias.
    pub fn accepts(&self, answer: &str) -> bool {
        let normalized = answer.trim().to_lowercase();
        iter::once(self.answer)
            .chain(self.aliases.iter().copied())
            .any(|accepted| accepted.to_lowercase() == normalized)
    }

    pub fn hint(&self, index: usize) -> Option<&'static str> {
        self.hints.get(index).copied()
    }
}

pub static PUZZLE_POOL: [Puzzle; 8] = [
    Puzzle {
        id: "riddle-1",
        kind: PuzzleKind::Riddle,
        question: "I have keys but no locks. I have space but no room. You can enter but can't go inside. What am I?",
        answer: "keyboard",
        aliases: &[],
        hints: &["Think about what you're using right now.", "It has keys, but not for doors."],
        reward: PuzzleEffect::GainGold { amount: 30 },
        penalty: PuzzleEffect::Damage { amount: 5 },
    },
    Puzzle {
        id: "riddle-2",
        kind: PuzzleKind::Riddle,
        question: "The more you take, the more you leave behind. What am I?",
        answer: "footsteps",
        aliases: &[],
        hints: &["Think about walking.", "You leave them on the ground."],
        reward: PuzzleEffect::GrantItem { item: ItemKind::HealthPotion },
        penalty: PuzzleEffect::Damage { amount: 5 },
    },
    Puzzle {
        id: "math-1",
        kind: PuzzleKind::Math,
        question: "A chamber has 4 walls. Each wall has 3 torches. Each torch burns for 2 hours. How many total torch-hours light this room?",
        answer: "24",
        aliases: &[],
        hints: &["Multiply step by step.", "4 × 3 × 2"],
        reward: PuzzleEffect::GainGold { amount: 25 },
        penalty: PuzzleEffect::LoseGold { amount: 10 },
    },
    Puzzle {
        id: "sequence-1",
        kind: PuzzleKind::Sequence,
        question: "What comes next? 🏰 💎 🏰 💎 💎 🏰 💎 💎 💎 🏰 ...",
        answer: "💎💎💎💎",
        aliases: &["4 diamonds", "4", "four diamonds"],
        hints: &["Count the 💎 between each 🏰.", "The pattern: 1, 2, 3, ..."],
        reward: PuzzleEffect::GrantItem { item: ItemKind::Compass },
        penalty: PuzzleEffect::Damage { amount: 10 },
    },
    Puzzle {
        id: "cipher-1",
        kind: PuzzleKind::Cipher,
        question: "Decode this message: YLFWRULD -> ???\n(Hint: Caesar cipher, shift 3 backwards)",
        answer: "victoria",
        aliases: &[],
        hints: &["Each letter shifts back by 3.", "Y→V, L→I, F→C..."],
        reward: PuzzleEffect::GrantItem { item: ItemKind::VisionScroll },
        penalty: PuzzleEffect::Damage { amount: 5 },
    },
    Puzzle {
        id: "logic-1",
        kind: PuzzleKind::Logic,
        question: "Three chests: Gold, Silver, Bronze. One has treasure, one has a trap, one is empty.\n- The Gold chest says: \"The trap is in Silver.\"\n- The Silver chest says: \"I am empty.\"\n- The Bronze chest says: \"The treasure is in Gold.\"\nExactly ONE chest tells the truth. Which chest has the treasure?",
        answer: "silver",
        aliases: &[],
        hints: &[
            "If Gold is telling the truth, what follows?",
            "Try assuming each one is the truth-teller.",
        ],
        reward: PuzzleEffect::GrantItem { item: ItemKind::Shield },
        penalty: PuzzleEffect::Damage { amount: 15 },
    },
    Puzzle {
        id: "riddle-3",
        kind: PuzzleKind::Riddle,
        question: "I am not alive, but I grow. I don't have lungs, but I need air. I don't have a mouth, but water kills me. What am I?",
        answer: "fire",
        aliases: &[],
        hints: &["It's an element.", "It's hot."],
        reward: PuzzleEffect::GainGold { amount: 20 },
        penalty: PuzzleEffect::Damage { amount: 5 },
    },
    Puzzle {
        id: "pattern-1",
        kind: PuzzleKind::Pattern,
        question: "Complete the pattern:\n🔴⚪🔴🔴⚪🔴🔴🔴⚪...\nWhat are the next 4 symbols?",
        answer: "🔴🔴🔴🔴",
        aliases: &["4 red", "rrrr", "four red"],
        hints: &["Count the reds between each white.", "1, 2, 3, ..."],
        reward: PuzzleEffect::GrantItem { item: ItemKind::TrapKit },
        penalty: PuzzleEffect::LoseGold { amount: 15 },
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerResult {
    Correct(PuzzleEffect),
    Wrong(PuzzleEffect),
}

impl AnswerResult {
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerResult::Correct(_))
    }

    pub fn effect(self) -> PuzzleEffect {
        match self {
            AnswerResult::Correct(effect) | AnswerResult::Wrong(effect) => effect,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PuzzleManager {
    pool: &'static [Puzzle],
    issued: BTreeSet<&'static str>,
}

impl Default for PuzzleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleManager {
    pub fn new() -> Self {
        Self::with_pool(&PUZZLE_POOL)
    }

    pub fn with_pool(pool: &'static [Puzzle]) -> Self {
        Self { pool, issued: BTreeSet::new() }
    }

    /// Uniform over puzzles not yet issued this cycle. An exhausted cycle starts over
    /// and the drawn puzzle opens the new one.
    pub fn next_puzzle(&mut self, roller: &mut impl Roller) -> Option<&'static Puzzle> {
        let pool = self.pool;
        if pool.is_empty() {
            return None;
        }
        let mut available: Vec<&'static Puzzle> =
            pool.iter().filter(|puzzle| !self.issued.contains(puzzle.id)).collect();
        if available.is_empty() {
            tracing::debug!(pool = pool.len(), "puzzle pool exhausted, starting a new cycle");
            self.issued.clear();
            available = pool.iter().collect();
        }
        let puzzle = available[roller.pick_index(available.len())];
        self.issued.insert(puzzle.id);
        Some(puzzle)
    }

    pub fn check_answer(&self, puzzle: &Puzzle, answer: &str) -> AnswerResult {
        if puzzle.accepts(answer) {
            AnswerResult::Correct(puzzle.reward)
        } else {
            AnswerResult::Wrong(puzzle.penalty)
        }
    }

    pub fn hint(&self, puzzle: &Puzzle, index: usize) -> &'static str {
        puzzle.hint(index).unwrap_or("No more hints available.")
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GameRng, ScriptedRoller};

    fn puzzle(id: &str) -> &'static Puzzle {
        PUZZLE_POOL.iter().find(|puzzle| puzzle.id == id).unwrap()
    }

    #[test]
    fn answers_match_trimmed_and_case_insensitive() {
        let manager = PuzzleManager::new();
        let riddle = puzzle("riddle-1");
        assert!(manager.check_answer(riddle, "  KeyBoard \n").is_correct());
        assert_eq!(manager.check_answer(riddle, "keyboards"), AnswerResult::Wrong(riddle.penalty));
        assert!(!manager.check_answer(riddle, "").is_correct());
    }

    #[test]
    fn every_alias_is_accepted() {
        let manager = PuzzleManager::new();
        for puzzle in &PUZZLE_POOL {
            assert!(manager.check_answer(puzzle, puzzle.answer).is_correct(), "{}", puzzle.id);
            for alias in puzzle.aliases {
                let shouted = alias.to_uppercase();
                assert_eq!(
                    manager.check_answer(puzzle, &shouted),
                    AnswerResult::Correct(puzzle.reward),
                    "{} should accept {alias}",
                    puzzle.id
                );
            }
        }
    }

    #[test]
    fn a_full_cycle_issues_each_puzzle_once() {
        let mut manager = PuzzleManager::new();
        let mut rng = GameRng::from_seed(31);
        let mut seen = BTreeSet::new();
        for _ in 0..PUZZLE_POOL.len() {
            let puzzle = manager.next_puzzle(&mut rng).unwrap();
            assert!(seen.insert(puzzle.id), "{} issued twice in one cycle", puzzle.id);
        }
        assert_eq!(manager.issued_count(), PUZZLE_POOL.len());

        manager.next_puzzle(&mut rng).unwrap();
        assert_eq!(manager.issued_count(), 1);
    }

    #[test]
    fn draws_skip_already_issued_puzzles() {
        let mut manager = PuzzleManager::new();
        let first = manager.next_puzzle(&mut ScriptedRoller::new([0])).unwrap();
        let second = manager.next_puzzle(&mut ScriptedRoller::new([0])).unwrap();
        assert_eq!(first.id, "riddle-1");
        assert_eq!(second.id, "riddle-2");
    }

    #[test]
    fn hints_run_out_politely() {
        let manager = PuzzleManager::new();
        let math = puzzle("math-1");
        assert_eq!(manager.hint(math, 0), "Multiply step by step.");
        assert_eq!(manager.hint(math, 2), "No more hints available.");
    }

    #[test]
    fn empty_pool_yields_nothing() {
        static EMPTY: [Puzzle; 0] = [];
        let mut manager = PuzzleManager::with_pool(&EMPTY);
        assert!(manager.next_puzzle(&mut ScriptedRoller::default()).is_none());
    }
}
