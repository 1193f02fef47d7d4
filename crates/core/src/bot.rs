//! Stateless bot policy: move choice, proactive item use, and puzzle attempts.

mod strategies;

use slotmap::SlotMap;

use crate::map::{Map, Move};
use crate::player::Player;
use crate::rng::Roller;
use crate::types::{ItemKind, PlayerId, Strategy};

use strategies::MoveContext;

/// Read-only game state a bot may inspect.
#[derive(Clone, Copy)]
pub struct BotView<'a> {
    pub map: &'a Map,
    pub players: &'a SlotMap<PlayerId, Player>,
}

fn strategy_of(player: &Player) -> Strategy {
    player.control.strategy().unwrap_or(Strategy::Balanced)
}

/// Scores every valid move, blocked ones included, and returns the first maximum.
/// `None` only when the player has no on-grid neighbour.
pub fn decide<'a>(
    player: &Player,
    view: BotView<'a>,
    roller: &mut impl Roller,
) -> Option<Move<'a>> {
    let strategy = strategy_of(player);
    let jitter = strategies::jitter_max(strategy);

    let mut best: Option<(i32, Move<'a>)> = None;
    for candidate in view.map.valid_moves(player.pos) {
        let ctx = MoveContext { player, candidate: &candidate, map: view.map, players: view.players };
        let score = strategies::score(strategy, &ctx) + roller.roll(0, jitter) as i32;
        tracing::trace!(
            bot = %player.name,
            strategy = strategy.label(),
            target = %candidate.target,
            score,
            "scored move"
        );
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, chosen)| chosen)
}

/// Items the bot drinks or reads at the start of its turn.
pub fn planned_item_uses(player: &Player) -> Vec<ItemKind> {
    let heal_below = match strategy_of(player) {
        Strategy::Cautious => Some(40),
        Strategy::Balanced => Some(50),
        Strategy::Aggressive | Strategy::Explorer => None,
    };
    let mut uses = Vec::new();
    if let Some(threshold) = heal_below
        && player.health < threshold
        && player.has_item(ItemKind::HealthPotion)
    {
        uses.push(ItemKind::HealthPotion);
    }
    if strategy_of(player) == Strategy::Explorer {
        let boosts = [ItemKind::Compass, ItemKind::VisionScroll];
        uses.extend(boosts.into_iter().filter(|kind| player.has_item(*kind)));
    }
    uses
}

pub const fn solve_chance_percent(strategy: Strategy) -> u32 {
    match strategy {
        Strategy::Aggressive => 30,
        Strategy::Cautious => 50,
        Strategy::Explorer => 70,
        Strategy::Balanced => 50,
    }
}

/// A weighted coin flip; the puzzle itself is never read.
pub fn solve_puzzle(player: &Player, roller: &mut impl Roller) -> bool {
    roller.chance(solve_chance_percent(strategy_of(player)))
}
