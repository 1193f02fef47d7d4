//! Random sources for generation, dice, and bot jitter.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Every random decision in the engine goes through this trait so dice can be forced in tests.
pub trait Roller {
    fn next_u64(&mut self) -> u64;

    /// Uniform integer in `min..=max`.
    fn roll(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        let span = u64::from(max - min) + 1;
        min + (self.next_u64() % span) as u32
    }

    fn roll_d20(&mut self) -> u32 {
        self.roll(1, 20)
    }

    fn chance(&mut self, percent: u32) -> bool {
        self.roll(0, 99) < percent
    }

    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.roll(0, (len - 1) as u32) as usize
    }

    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.roll(0, i as u32) as usize;
            items.swap(i, j);
        }
    }
}

pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl Roller for GameRng {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

/// Replays queued roll results, clamped into the requested range.
/// Once drained every roll returns the range minimum.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRoller {
    rolls: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self { rolls: rolls.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Roller for ScriptedRoller {
    fn next_u64(&mut self) -> u64 {
        self.rolls.pop_front().map_or(0, u64::from)
    }

    fn roll(&mut self, min: u32, max: u32) -> u32 {
        self.rolls.pop_front().map_or(min, |value| value.clamp(min, max))
    }
}
