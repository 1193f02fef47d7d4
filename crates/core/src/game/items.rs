//! Active item use for humans and bots.
//! This module exists to keep item effects apart from movement and turn flow.
//! It does not own inventory storage or item definitions.

use super::*;
use crate::content::{HEALTH_POTION_HEAL, TRAP_KIT_DAMAGE, VISION_SCROLL_RADIUS, item_def};
use crate::map::PlayerTrap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemUse {
    Healed { amount: i32, health: i32 },
    Compass { heading: String, distance: u32 },
    TrapSet { at: Pos },
    Revealed { radius: i32, newly_explored: usize },
}

impl ItemUse {
    pub fn message(&self) -> String {
        match self {
            ItemUse::Healed { amount, .. } => format!("Restored {amount} HP!"),
            ItemUse::Compass { distance: 0, .. } => {
                "The compass spins wildly. You are standing in the Secret Chamber!".to_string()
            }
            ItemUse::Compass { heading, distance } => {
                format!("The compass points {heading}. (~{distance} chambers away)")
            }
            ItemUse::TrapSet { .. } => "Trap placed in this chamber!".to_string(),
            ItemUse::Revealed { .. } => "The surrounding chambers are revealed!".to_string(),
        }
    }
}

/// Compass wording: the vertical component first, e.g. `NorthEast`.
fn heading(from: Pos, to: Pos) -> String {
    let mut heading = String::new();
    if to.y < from.y {
        heading.push_str("North");
    } else if to.y > from.y {
        heading.push_str("South");
    }
    if to.x > from.x {
        heading.push_str("East");
    } else if to.x < from.x {
        heading.push_str("West");
    }
    heading
}

impl Game {
    /// Uses one item on the human's turn. Using an item does not end the turn.
    pub fn use_item(&mut self, kind: ItemKind) -> Result<ItemUse, GameError> {
        if self.outcome.is_some() || self.pending_puzzle.is_some() {
            return Err(GameError::NotAccepting);
        }
        let Some(human) = self.human else {
            return Err(GameError::NotYourTurn);
        };
        if !self.scheduler.is_human_turn(&self.players) || self.scheduler.current() != Some(human) {
            return Err(GameError::NotYourTurn);
        }
        match self.apply_item(human, kind) {
            Ok(used) => {
                self.notify_render_sink();
                Ok(used)
            }
            Err(err) => {
                self.push_log(Severity::Warning, err.to_string());
                Err(err.into())
            }
        }
    }

    pub(super) fn apply_item(&mut self, id: PlayerId, kind: ItemKind) -> Result<ItemUse, ItemUseError> {
        let pos = self.players[id].pos;
        if kind == ItemKind::TrapKit
            && item_def(kind).usable
            && self.players[id].has_item(kind)
            && self.map.chamber(pos).is_some_and(|chamber| chamber.player_trap.is_some())
        {
            return Err(ItemUseError::TrapAlreadySet);
        }
        self.players[id].consume_item(kind)?;

        let used = match kind {
            ItemKind::HealthPotion => {
                let player = &mut self.players[id];
                let amount = player.heal(HEALTH_POTION_HEAL);
                self.cue(Cue::Particles { pos, color: "#44ff44", count: 10 });
                ItemUse::Healed { amount, health: self.players[id].health }
            }
            ItemKind::Compass => {
                let goal = self.map.goal;
                ItemUse::Compass { heading: heading(pos, goal), distance: pos.manhattan(goal) }
            }
            ItemKind::TrapKit => {
                let message = format!("You triggered {}'s trap!", self.players[id].name);
                if let Some(chamber) = self.map.chamber_mut(pos) {
                    chamber.player_trap = Some(PlayerTrap { owner: id, damage: TRAP_KIT_DAMAGE, message });
                }
                ItemUse::TrapSet { at: pos }
            }
            ItemKind::VisionScroll => {
                let newly_explored = self.map.reveal(id, pos, VISION_SCROLL_RADIUS);
                ItemUse::Revealed { radius: VISION_SCROLL_RADIUS, newly_explored }
            }
            ItemKind::Key | ItemKind::Shield => return Err(ItemUseError::NotUsable),
        };

        let name = self.players[id].name.clone();
        self.push_log(Severity::Success, format!("{name}: {}", used.message()));
        tracing::debug!(player = %name, ?kind, "item used");
        Ok(used)
    }
}
