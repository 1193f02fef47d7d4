//! What happens when a player steps into a chamber: item pickup, one-shot effects, puzzles.
//! This module exists to keep chamber-kind dispatch out of the move pipeline.
//! It does not own PvP, player-placed traps, or win detection.

use super::*;
use crate::bot;
use crate::content::{self, ChamberEffect, NpcEncounter};
use crate::inventory::AddOutcome;
use crate::puzzles::AnswerResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChamberEntry {
    pub kind: ChamberKind,
    pub picked_up: Option<Item>,
    pub effect: Option<ChamberEffect>,
    pub puzzle: Option<PuzzleResolution>,
}

impl Game {
    pub(super) fn enter_chamber(&mut self, id: PlayerId, pos: Pos) -> ChamberEntry {
        let kind = self.map.kind_at(pos).unwrap_or(ChamberKind::Empty);
        let picked_up = self.pick_up_item(id, pos);
        let effect = content::trigger_chamber_effect(kind, &mut self.players[id], &mut self.rng);
        if let Some(effect) = &effect {
            self.report_chamber_effect(id, pos, effect);
            self.map.set_kind(pos, ChamberKind::Empty);
        }
        let puzzle = if kind == ChamberKind::Puzzle { self.open_puzzle(id, pos) } else { None };
        ChamberEntry { kind, picked_up, effect, puzzle }
    }

    fn pick_up_item(&mut self, id: PlayerId, pos: Pos) -> Option<Item> {
        let item = self.map.chamber(pos)?.item?;
        let player = &mut self.players[id];
        let name = content::item_name(&item);
        match player.inventory.add(item) {
            Ok(added) => {
                let message = match added {
                    AddOutcome::NewSlot => format!("{}: Picked up {name}!", player.name),
                    AddOutcome::Stacked { count } => {
                        format!("{}: Added {name}. (x{count})", player.name)
                    }
                };
                if let Some(chamber) = self.map.chamber_mut(pos) {
                    chamber.item = None;
                }
                self.push_log(Severity::Success, message);
                Some(item)
            }
            Err(err) => {
                let message = format!("{}: {err} {name} stays on the floor.", player.name);
                self.push_log(Severity::Warning, message);
                None
            }
        }
    }

    fn report_chamber_effect(&mut self, id: PlayerId, pos: Pos, effect: &ChamberEffect) {
        let line = format!("{}: {}", self.players[id].name, effect.message());
        match effect {
            ChamberEffect::Treasure { .. } => {
                self.push_log(Severity::Success, line);
                self.cue(Cue::Particles { pos, color: "#ffd700", count: 12 });
            }
            ChamberEffect::Trap { .. } => {
                self.push_log(Severity::Danger, line);
                self.cue(Cue::Shake { intensity: 5 });
                self.cue(Cue::Particles { pos, color: "#ff4444", count: 10 });
            }
            ChamberEffect::Npc { encounter } => {
                self.push_log(Severity::Npc, line);
                self.receive_gift(id, pos, *encounter);
            }
        }
    }

    fn receive_gift(&mut self, id: PlayerId, pos: Pos, encounter: NpcEncounter) {
        let Some(gift) = encounter.gift() else {
            return;
        };
        let name = content::item_name(&gift);
        if self.players[id].inventory.add(gift).is_ok() {
            let message = format!("{}: Received a {name}!", self.players[id].name);
            self.push_log(Severity::Success, message);
        } else {
            self.leave_in_chamber(pos, gift);
        }
    }

    /// Drops an item that did not fit. A chamber holds at most one item; extras are lost.
    pub(super) fn leave_in_chamber(&mut self, pos: Pos, item: Item) {
        let name = content::item_name(&item);
        match self.map.chamber_mut(pos) {
            Some(chamber) if chamber.item.is_none() => {
                chamber.item = Some(item);
                self.push_log(Severity::Warning, format!("Inventory full! The {name} is left behind."));
            }
            _ => {
                tracing::warn!(%pos, item = %name, "no room for item in full inventory or chamber");
                self.push_log(Severity::Warning, format!("Inventory full! The {name} is lost."));
            }
        }
    }

    /// Bots settle the puzzle on the spot. The human gets a pending prompt and the
    /// scheduler pauses until an answer arrives.
    fn open_puzzle(&mut self, id: PlayerId, pos: Pos) -> Option<PuzzleResolution> {
        let Some(puzzle) = self.puzzles.next_puzzle(&mut self.rng) else {
            self.map.set_kind(pos, ChamberKind::Empty);
            return None;
        };
        let player = &self.players[id];
        if !player.is_bot() {
            self.pending_puzzle = Some(PendingPuzzle { player: id, chamber: pos, puzzle, hints_shown: 0 });
            self.scheduler.pause();
            self.push_log(Severity::Info, "A puzzle blocks your way! Answer it to continue.");
            return self.pending_puzzle().map(PuzzleResolution::AwaitingAnswer);
        }

        let solved = bot::solve_puzzle(player, &mut self.rng);
        let result = if solved {
            AnswerResult::Correct(puzzle.reward)
        } else {
            AnswerResult::Wrong(puzzle.penalty)
        };
        self.apply_puzzle_result(id, pos, result);
        self.map.set_kind(pos, ChamberKind::Empty);
        Some(PuzzleResolution::Resolved(result))
    }
}
