//! Read-only views handed to renderers, plus final standings.
//! This module exists to keep presentation shapes out of simulation code.
//! It does not own any drawing or terminal output.

use serde::Serialize;

use super::*;
use crate::inventory::ItemStack;
use crate::map::MapView;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub seat: usize,
    pub name: String,
    pub color: &'static str,
    pub pos: Pos,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub gold: u32,
    pub score: i32,
    pub strategy: Option<Strategy>,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnView {
    pub round: u32,
    pub phase: TurnPhase,
    pub active_seat: Option<usize>,
    pub players_alive: usize,
    pub total_players: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub viewer_seat: Option<usize>,
    pub map: MapView,
    pub players: Vec<PlayerView>,
    pub inventory: Vec<ItemStack>,
    pub log: Vec<LogLine>,
    pub turn: TurnView,
    pub winner_seat: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub seat: usize,
    pub name: String,
    pub score: i32,
    pub winner: bool,
}

/// Receives a snapshot after every resolved move and the cosmetic cues it produced.
pub trait RenderSink {
    fn render(&mut self, snapshot: &RenderSnapshot);

    fn cue(&mut self, _cue: &Cue) {}
}

impl Game {
    /// Everything `viewer` may see: their own fog of war, all player tokens, and the log tail.
    pub fn snapshot(&self, viewer: PlayerId) -> RenderSnapshot {
        let active = self.scheduler.current();
        let players = self
            .seats
            .iter()
            .enumerate()
            .map(|(seat, id)| {
                let player = &self.players[*id];
                PlayerView {
                    seat,
                    name: player.name.clone(),
                    color: player.color,
                    pos: player.pos,
                    health: player.health,
                    max_health: player.max_health,
                    alive: player.alive,
                    gold: player.gold,
                    score: player.score,
                    strategy: player.control.strategy(),
                    active: active == Some(*id),
                }
            })
            .collect();
        let inventory =
            self.players.get(viewer).map(|player| player.inventory.stacks().to_vec()).unwrap_or_default();
        let tail = self.log.len().saturating_sub(self.config.log_tail);
        let winner_seat = match self.outcome {
            Some(GameOutcome::Winner(id)) => self.seat_of(id),
            Some(GameOutcome::AllDefeated) | None => None,
        };

        RenderSnapshot {
            viewer_seat: self.seat_of(viewer),
            map: self.map.visible_view(viewer),
            players,
            inventory,
            log: self.log[tail..].to_vec(),
            turn: TurnView {
                round: self.scheduler.round(),
                phase: self.scheduler.phase(),
                active_seat: active.and_then(|id| self.seat_of(id)),
                players_alive: self.players.values().filter(|player| player.alive).count(),
                total_players: self.seats.len(),
            },
            winner_seat,
        }
    }

    /// Winner first, everyone else by `calculate_score`, highest first. Seat order breaks ties.
    pub fn standings(&self) -> Vec<Standing> {
        let winner = match self.outcome {
            Some(GameOutcome::Winner(id)) => Some(id),
            Some(GameOutcome::AllDefeated) | None => None,
        };
        let mut standings: Vec<Standing> = self
            .seats
            .iter()
            .enumerate()
            .map(|(seat, id)| {
                let player = &self.players[*id];
                Standing {
                    seat,
                    name: player.name.clone(),
                    score: player.calculate_score(),
                    winner: winner == Some(*id),
                }
            })
            .collect();
        standings.sort_by(|a, b| b.winner.cmp(&a.winner).then(b.score.cmp(&a.score)));
        standings
    }

    /// The seat the render sink follows: the human, or seat 0 in an all-bot game.
    fn render_viewer(&self) -> Option<PlayerId> {
        self.human.or_else(|| self.seats.first().copied())
    }

    pub(super) fn notify_render_sink(&mut self) {
        if self.render_sink.is_none() {
            return;
        }
        let Some(viewer) = self.render_viewer() else {
            return;
        };
        let snapshot = self.snapshot(viewer);
        let cues: Vec<Cue> = self.cues.drain(..).collect();
        if let Some(sink) = self.render_sink.as_mut() {
            sink.render(&snapshot);
            for cue in &cues {
                sink.cue(cue);
            }
        }
    }
}
