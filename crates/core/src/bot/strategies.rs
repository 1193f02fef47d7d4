//! Per-strategy move scoring. Each strategy is one function over the same inputs.

use slotmap::SlotMap;

use crate::map::{Map, Move};
use crate::player::Player;
use crate::types::{ChamberKind, PlayerId, Pos, Strategy};

/// Manhattan reach of the goal-pull term; farther targets contribute negatively.
const GOAL_PULL_BASE: i32 = 16;

pub(super) struct MoveContext<'a, 'm> {
    pub(super) player: &'a Player,
    pub(super) candidate: &'a Move<'m>,
    pub(super) map: &'a Map,
    pub(super) players: &'a SlotMap<PlayerId, Player>,
}

impl MoveContext<'_, '_> {
    fn kind(&self) -> ChamberKind {
        self.candidate.chamber.kind
    }

    fn target(&self) -> Pos {
        self.candidate.target
    }

    fn goal_pull(&self, weight: i32) -> i32 {
        (GOAL_PULL_BASE - self.target().manhattan(self.map.goal) as i32) * weight
    }

    fn explored(&self) -> bool {
        self.candidate.chamber.is_explored_by(self.player.id)
    }

    fn rivals(&self) -> impl Iterator<Item = &Player> {
        let me = self.player.id;
        self.players.values().filter(move |other| other.id != me && other.alive)
    }

    fn health_fraction(&self) -> f32 {
        self.player.health as f32 / self.player.max_health as f32
    }
}

pub(super) fn score(strategy: Strategy, ctx: &MoveContext<'_, '_>) -> i32 {
    match strategy {
        Strategy::Aggressive => aggressive(ctx),
        Strategy::Cautious => cautious(ctx),
        Strategy::Explorer => explorer(ctx),
        Strategy::Balanced => balanced(ctx),
    }
}

/// Upper bound of the per-move random bonus. Aggressive must stay strictly the widest.
pub(super) const fn jitter_max(strategy: Strategy) -> u32 {
    match strategy {
        Strategy::Aggressive => 14,
        Strategy::Cautious => 8,
        Strategy::Explorer => 12,
        Strategy::Balanced => 10,
    }
}

fn aggressive(ctx: &MoveContext<'_, '_>) -> i32 {
    let mut score = 0;
    for rival in ctx.rivals() {
        let before = ctx.player.pos.manhattan(rival.pos);
        let after = ctx.target().manhattan(rival.pos);
        if after < before {
            score += 30;
        }
        if after == 0 {
            score += 50;
        }
    }
    score += ctx.goal_pull(3);
    match ctx.kind() {
        ChamberKind::Treasure => score += 15,
        ChamberKind::Trap => score -= 5,
        _ => {}
    }
    score
}

fn cautious(ctx: &MoveContext<'_, '_>) -> i32 {
    let mut score = 0;
    match ctx.kind() {
        ChamberKind::Trap => score -= 40,
        ChamberKind::Treasure => score += 30,
        ChamberKind::Npc => score += 20,
        _ => {}
    }
    for rival in ctx.rivals() {
        if ctx.target().manhattan(rival.pos) <= 1 {
            score -= 25;
        }
    }
    score += ctx.goal_pull(2);
    if ctx.explored() {
        score += 5;
    }
    score
}

fn explorer(ctx: &MoveContext<'_, '_>) -> i32 {
    let mut score = 0;
    if !ctx.explored() {
        score += 50;
    }
    match ctx.kind() {
        ChamberKind::Puzzle => score += 25,
        ChamberKind::Treasure => score += 20,
        ChamberKind::Npc => score += 15,
        ChamberKind::Trap => score -= 15,
        _ => {}
    }
    score + ctx.goal_pull(1)
}

fn balanced(ctx: &MoveContext<'_, '_>) -> i32 {
    let health = ctx.health_fraction();
    let mut score = ctx.goal_pull(4);
    match ctx.kind() {
        ChamberKind::Treasure => score += 25,
        ChamberKind::Trap => score -= if health > 0.5 { 10 } else { 35 },
        _ => {}
    }
    for rival in ctx.rivals() {
        if ctx.target().manhattan(rival.pos) <= 1 {
            score += if health > 0.6 { 15 } else { -20 };
        }
    }
    if !ctx.explored() {
        score += 10;
    }
    score
}
