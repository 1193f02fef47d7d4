//! Human move requests and the shared move-resolution pipeline.
//! This module exists to keep the fixed per-move ordering in one place.
//! It does not own chamber effects or puzzle answering.

use super::*;
use crate::combat::{PvpReport, TrapTrigger};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub player: PlayerId,
    pub from: Pos,
    pub to: Pos,
    pub unlocked: Option<KeyId>,
    pub entry: ChamberEntry,
    pub pvp: Vec<PvpReport>,
    pub trap: Option<TrapTrigger>,
    pub won: bool,
    pub died: bool,
}

impl Game {
    /// Moves the human one chamber. A locked chamber opens with the matching key;
    /// without one the request is rejected and the turn is not spent.
    pub fn request_move(&mut self, target: Pos) -> Result<MoveReport, GameError> {
        if self.outcome.is_some() || self.pending_puzzle.is_some() {
            return Err(GameError::NotAccepting);
        }
        let Some(human) = self.human else {
            return Err(GameError::NotYourTurn);
        };
        if !self.scheduler.is_human_turn(&self.players) || self.scheduler.current() != Some(human) {
            return Err(GameError::NotYourTurn);
        }

        let from = self.players[human].pos;
        let Some(step) = self.map.valid_moves(from).into_iter().find(|step| step.target == target)
        else {
            return Err(GameError::NotAdjacent(target));
        };
        let required_key = if step.blocked { step.chamber.required_key } else { None };

        let unlocked = match required_key {
            Some(key) if self.players[human].has_key(key) => {
                self.unlock_with_key(human, target, key);
                Some(key)
            }
            Some(key) => {
                self.push_log(Severity::Warning, "This chamber is locked. You need a key!");
                return Err(GameError::Locked(key));
            }
            None => None,
        };
        Ok(self.execute_move(human, target, unlocked))
    }

    /// Spends the key and opens the door permanently.
    pub(super) fn unlock_with_key(&mut self, id: PlayerId, target: Pos, key: KeyId) {
        let player = &mut self.players[id];
        player.inventory.remove_key(key);
        if let Some(chamber) = self.map.chamber_mut(target) {
            chamber.unlock();
        }
        let message = if player.is_bot() {
            format!("{} unlocked a chamber!", player.name)
        } else {
            "Used key to unlock the chamber!".to_string()
        };
        self.push_log(Severity::Success, message);
    }

    /// Resolves one accepted move for any player. The target must be adjacent and open.
    pub(super) fn execute_move(
        &mut self,
        id: PlayerId,
        target: Pos,
        unlocked: Option<KeyId>,
    ) -> MoveReport {
        let alive_before: Vec<(PlayerId, bool)> =
            self.players.iter().map(|(other, player)| (other, player.alive)).collect();

        let player = &mut self.players[id];
        let from = player.pos;
        player.move_to(target);
        player.chambers_explored += 1;
        self.map.reveal(id, target, self.config.vision_radius);
        if Some(id) == self.human {
            self.cue(Cue::Focus { pos: target });
        }
        tracing::debug!(player = %self.players[id].name, %from, %target, "move");

        let entry = self.enter_chamber(id, target);
        let pvp = self.resolve_pvp(id);
        let trap = self.resolve_player_trap(id, target);

        let won = self.players[id].alive
            && self.map.kind_at(target) == Some(ChamberKind::Secret)
            && self.outcome.is_none();
        if won {
            self.declare_winner(id);
        }

        for (other, was_alive) in alive_before {
            if was_alive && !self.players[other].alive {
                self.announce_death(other);
            }
        }
        let died = !self.players[id].alive;
        if died && self.pending_puzzle.is_some_and(|pending| pending.player == id) {
            self.pending_puzzle = None;
            self.scheduler.resume(&self.players);
        }

        let awaiting_answer = self.pending_puzzle.is_some_and(|pending| pending.player == id);
        if !awaiting_answer {
            self.end_turn();
        }
        self.notify_render_sink();

        MoveReport { player: id, from, to: target, unlocked, entry, pvp, trap, won, died }
    }

    fn resolve_pvp(&mut self, id: PlayerId) -> Vec<PvpReport> {
        let reports = self.combat.check_pvp_on_tile(id, &mut self.players, &mut self.rng);
        let pos = self.players[id].pos;
        for report in &reports {
            for entry in &report.entries {
                self.push_log(Severity::Combat, entry.message.clone());
            }
            self.cue(Cue::Shake { intensity: 6 });
            self.cue(Cue::Particles { pos, color: "#ff4444", count: 8 });
        }
        reports
    }

    fn resolve_player_trap(&mut self, id: PlayerId, target: Pos) -> Option<TrapTrigger> {
        let chamber = self.map.chamber_mut(target)?;
        let trigger = self.combat.check_player_traps(chamber, &mut self.players[id])?;
        self.push_log(Severity::Danger, trigger.message.clone());
        self.cue(Cue::Shake { intensity: 4 });
        Some(trigger)
    }

    fn declare_winner(&mut self, id: PlayerId) {
        let bonus = self.config.win_bonus;
        let player = &mut self.players[id];
        player.score += bonus;
        let message = format!("{} reached the Secret Chamber and WINS!", player.name);
        let pos = player.pos;
        self.outcome = Some(GameOutcome::Winner(id));
        self.scheduler.finish();
        self.absorb_turn_events();
        self.push_log(Severity::Success, message);
        self.cue(Cue::Particles { pos, color: "#ffd700", count: 30 });
        self.cue(Cue::Shake { intensity: 10 });
    }

    pub(super) fn announce_death(&mut self, id: PlayerId) {
        let player = &self.players[id];
        let message = format!("{} has fallen!", player.name);
        let pos = player.pos;
        tracing::info!(player = %player.name, "player died");
        self.push_log(Severity::Danger, message);
        self.cue(Cue::Particles { pos, color: "#880000", count: 20 });
    }

    /// Hands the turn to the next living seat; ends the game when nobody is left.
    pub(super) fn end_turn(&mut self) {
        if self.outcome.is_none() {
            self.scheduler.next_turn(&self.players);
        }
        self.absorb_turn_events();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::content::ChamberEffect;
    use crate::map::PlayerTrap;

    #[test]
    fn only_adjacent_chambers_are_reachable() {
        let mut game = corridor_game(ChamberKind::Empty);
        assert_eq!(game.request_move(Pos::new(2, 0)), Err(GameError::NotAdjacent(Pos::new(2, 0))));
        let moves: Vec<Pos> =
            game.map().valid_moves(Pos::new(0, 0)).iter().map(|step| step.target).collect();
        assert_eq!(moves, vec![Pos::new(1, 0)]);
    }

    #[test]
    fn empty_chamber_move_advances_the_turn() {
        let mut game = corridor_game(ChamberKind::Empty);
        let human = game.human().unwrap();
        let report = game.request_move(Pos::new(1, 0)).unwrap();
        assert_eq!(report.from, Pos::new(0, 0));
        assert!(!report.won && !report.died);
        let player = &game.players()[human];
        assert_eq!(player.pos, Pos::new(1, 0));
        assert_eq!(player.chambers_explored, 1);
        assert_eq!(player.turns_taken, 1);
        assert_eq!(game.round(), 2);
        assert!(game.is_human_turn());
    }

    #[test]
    fn trap_chamber_hurts_once_and_empties() {
        let mut game = corridor_game(ChamberKind::Trap);
        let human = game.human().unwrap();
        let report = game.request_move(Pos::new(1, 0)).unwrap();
        let Some(ChamberEffect::Trap { damage, .. }) = report.entry.effect else {
            panic!("expected a trap effect, got {:?}", report.entry.effect);
        };
        assert_eq!(game.players()[human].health, 100 - damage);
        assert_eq!(game.players()[human].traps_triggered, 1);
        assert_eq!(game.map().kind_at(Pos::new(1, 0)), Some(ChamberKind::Empty));
        assert_eq!(game.log().last().unwrap().severity, Severity::Danger);
    }

    #[test]
    fn reaching_the_secret_chamber_wins() {
        let mut game = corridor_game(ChamberKind::Empty);
        let human = game.human().unwrap();
        game.request_move(Pos::new(1, 0)).unwrap();
        game.request_move(Pos::new(2, 0)).unwrap();
        let report = game.request_move(Pos::new(3, 0)).unwrap();
        assert!(report.won);
        assert_eq!(game.outcome(), Some(GameOutcome::Winner(human)));
        assert_eq!(game.players()[human].score, 100);
        assert_eq!(game.phase(), TurnPhase::GameOver);
        assert_eq!(game.request_move(Pos::new(2, 0)), Err(GameError::NotAccepting));
        assert!(game.log().iter().any(|line| line.message == "You reached the Secret Chamber and WINS!"));
    }

    #[test]
    fn locked_chamber_without_key_costs_nothing() {
        let mut game = corridor_game(ChamberKind::Empty);
        lock(&mut game, Pos::new(1, 0));
        let human = game.human().unwrap();
        let err = game.request_move(Pos::new(1, 0));
        assert_eq!(err, Err(GameError::Locked(KeyId(Pos::new(1, 0)))));
        assert_eq!(game.players()[human].pos, Pos::new(0, 0));
        assert_eq!(game.players()[human].turns_taken, 0);
        assert!(game.is_human_turn());
    }

    #[test]
    fn matching_key_opens_the_door_and_is_spent() {
        let mut game = corridor_game(ChamberKind::Empty);
        let door = Pos::new(1, 0);
        lock(&mut game, door);
        let human = game.human().unwrap();
        game.players[human].inventory.add(Item::key(KeyId(door))).unwrap();

        let report = game.request_move(door).unwrap();
        assert_eq!(report.unlocked, Some(KeyId(door)));
        assert!(!game.players()[human].has_key(KeyId(door)));
        assert_eq!(game.map().kind_at(door), Some(ChamberKind::Empty));
        assert!(!game.map().chamber(door).unwrap().is_blocking());
    }

    #[test]
    fn a_rival_trap_springs_on_entry() {
        let mut game = corridor_game(ChamberKind::Empty);
        let human = game.human().unwrap();
        let owner = game.players.insert_with_key(|id| {
            Player::new(id, "Red Rogue", "#FF4444", Control::Bot(Strategy::Aggressive), 8)
        });
        game.map.chamber_mut(Pos::new(1, 0)).unwrap().player_trap = Some(PlayerTrap {
            owner,
            damage: 15,
            message: "You triggered Red Rogue's trap!".to_string(),
        });

        let report = game.request_move(Pos::new(1, 0)).unwrap();
        assert_eq!(report.trap.map(|trap| trap.damage), Some(15));
        assert_eq!(game.players()[human].health, 85);
        assert!(game.map().chamber(Pos::new(1, 0)).unwrap().player_trap.is_none());
    }

    #[test]
    fn human_move_is_rejected_while_bots_think() {
        let mut game = corridor_game(ChamberKind::Empty);
        game.scheduler.pause();
        assert_eq!(game.request_move(Pos::new(1, 0)), Err(GameError::NotYourTurn));
    }
}
