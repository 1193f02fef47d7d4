//! Game controller: owns every piece of mutable game state and resolves moves in a fixed order.
//! Submodules split the controller by concern; each adds an `impl Game` block.

use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::combat::CombatResolver;
use crate::config::GameConfig;
use crate::content::{BOT_NAMES, HUMAN_NAME, PLAYER_COLORS};
use crate::map::Map;
use crate::mapgen::MapGenerator;
use crate::player::Player;
use crate::puzzles::{Puzzle, PuzzleManager};
use crate::rng::GameRng;
use crate::turns::{TurnEvent, TurnScheduler};
use crate::types::*;

mod bot_turn;
mod entry;
mod hash;
mod items;
mod movement;
mod puzzle_phase;
mod snapshot;
#[cfg(test)]
mod test_support;

pub use entry::ChamberEntry;
pub use items::ItemUse;
pub use movement::MoveReport;
pub use puzzle_phase::{PuzzlePrompt, PuzzleResolution};
pub use snapshot::{PlayerView, RenderSink, RenderSnapshot, Standing, TurnView};

/// Cosmetic cues kept when nobody drains them.
const MAX_PENDING_CUES: usize = 64;
/// Event log lines retained; older lines are dropped first.
pub const MAX_LOG_LINES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    AwaitingHumanMove,
    AwaitingPuzzleAnswer(PuzzlePrompt),
    Finished(GameOutcome),
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceResult {
    pub bot_turns: u32,
    pub elapsed_ms: u64,
    pub stop_reason: StopReason,
}

#[derive(Clone, Copy, Debug)]
struct PendingPuzzle {
    player: PlayerId,
    chamber: Pos,
    puzzle: &'static Puzzle,
    hints_shown: usize,
}

pub struct Game {
    config: GameConfig,
    seed: u64,
    rng: GameRng,
    map: Map,
    players: SlotMap<PlayerId, Player>,
    seats: Vec<PlayerId>,
    human: Option<PlayerId>,
    scheduler: TurnScheduler,
    combat: CombatResolver,
    puzzles: PuzzleManager,
    pending_puzzle: Option<PendingPuzzle>,
    outcome: Option<GameOutcome>,
    log: Vec<LogLine>,
    cues: VecDeque<Cue>,
    render_sink: Option<Box<dyn RenderSink>>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = GameRng::from_seed(seed);
        let map = MapGenerator::new(config.width, config.height).generate(config.player_count, &mut rng);
        Ok(Self::assemble(config, seed, rng, map))
    }

    /// Starts a game on a caller-built map. Seat `i` spawns at `map.spawns[i]`.
    pub fn with_map(config: GameConfig, seed: u64, map: Map) -> Result<Self, GameError> {
        config.validate_seats()?;
        if map.spawns.len() < config.player_count {
            return Err(ConfigError::NotEnoughSpawns {
                spawns: map.spawns.len(),
                player_count: config.player_count,
            }
            .into());
        }
        Ok(Self::assemble(config, seed, GameRng::from_seed(seed), map))
    }

    fn assemble(config: GameConfig, seed: u64, rng: GameRng, mut map: Map) -> Self {
        let mut players = SlotMap::with_key();
        let mut seats = Vec::with_capacity(config.player_count);
        let mut human = None;
        for seat in 0..config.player_count {
            let control = if config.is_human_seat(seat) {
                Control::Human
            } else {
                Control::Bot(config.strategy_for_seat(seat))
            };
            let name = match control {
                Control::Human => HUMAN_NAME,
                Control::Bot(_) => BOT_NAMES[seat],
            };
            let spawn = map.spawns[seat];
            let id = players.insert_with_key(|id| {
                let mut player =
                    Player::new(id, name, PLAYER_COLORS[seat], control, config.inventory_slots);
                player.spawn(spawn);
                player
            });
            map.reveal(id, spawn, config.vision_radius);
            if control == Control::Human {
                human = Some(id);
            }
            seats.push(id);
        }

        let mut scheduler = TurnScheduler::new(config.bot_think_delay_ms);
        scheduler.init(seats.clone());

        let mut game = Self {
            config,
            seed,
            rng,
            map,
            players,
            seats,
            human,
            scheduler,
            combat: CombatResolver::new(),
            puzzles: PuzzleManager::new(),
            pending_puzzle: None,
            outcome: None,
            log: Vec::new(),
            cues: VecDeque::new(),
            render_sink: None,
        };
        game.push_log(Severity::System, "Welcome to the Chambers!");
        game.push_log(Severity::System, "Reach the Secret Chamber at the center of the map to win.");
        game.push_log(Severity::Info, "Explore chambers, collect treasure, and outsmart your rivals.");
        game.scheduler.start(&game.players);
        game.absorb_turn_events();
        tracing::info!(seed, players = game.seats.len(), "game started");
        game
    }

    /// Rebuilds the game from scratch. The old scheduler is shut down first so its
    /// pending bot move cannot fire into the new game.
    pub fn restart(&mut self, seed: u64) -> Result<(), GameError> {
        self.scheduler.shutdown();
        let sink = self.render_sink.take();
        *self = Self::new(self.config.clone(), seed)?;
        self.render_sink = sink;
        self.notify_render_sink();
        Ok(())
    }

    pub fn set_render_sink(&mut self, sink: Box<dyn RenderSink>) {
        self.render_sink = Some(sink);
        self.notify_render_sink();
    }

    /// Moves the scheduler clock forward and plays the bot whose thinking delay ran out.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<MoveReport> {
        let due = self.scheduler.advance_clock(elapsed_ms);
        self.absorb_turn_events();
        let bot = due?;
        if self.outcome.is_some() {
            return None;
        }
        self.execute_bot_turn(bot)
    }

    /// Plays bot turns until the human has to act, the game ends, or `max_bot_turns`
    /// bot turns have been played.
    pub fn advance(&mut self, max_bot_turns: u32) -> AdvanceResult {
        let mut bot_turns = 0;
        let mut elapsed_ms = 0;
        let stop_reason = loop {
            if let Some(outcome) = self.outcome {
                break StopReason::Finished(outcome);
            }
            if let Some(prompt) = self.pending_puzzle() {
                break StopReason::AwaitingPuzzleAnswer(prompt);
            }
            if self.scheduler.is_human_turn(&self.players) {
                break StopReason::AwaitingHumanMove;
            }
            if bot_turns >= max_bot_turns {
                break StopReason::BudgetExhausted;
            }
            let Some(wait) = self.scheduler.time_until_bot_move() else {
                tracing::warn!(phase = ?self.scheduler.phase(), "no bot move armed and nobody to wait on");
                break StopReason::BudgetExhausted;
            };
            elapsed_ms += wait;
            self.tick(wait);
            bot_turns += 1;
        };
        AdvanceResult { bot_turns, elapsed_ms, stop_reason }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn players(&self) -> &SlotMap<PlayerId, Player> {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Player ids in seat order.
    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn human(&self) -> Option<PlayerId> {
        self.human
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.scheduler.current()
    }

    pub fn phase(&self) -> TurnPhase {
        self.scheduler.phase()
    }

    pub fn round(&self) -> u32 {
        self.scheduler.round()
    }

    pub fn is_human_turn(&self) -> bool {
        self.outcome.is_none()
            && self.pending_puzzle.is_none()
            && self.scheduler.is_human_turn(&self.players)
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn log(&self) -> &[LogLine] {
        &self.log
    }

    pub fn combat_log(&self) -> &CombatResolver {
        &self.combat
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        self.cues.drain(..).collect()
    }

    fn push_log(&mut self, severity: Severity, message: impl Into<String>) {
        if self.log.len() == MAX_LOG_LINES {
            self.log.remove(0);
        }
        self.log.push(LogLine { severity, message: message.into() });
    }

    fn cue(&mut self, cue: Cue) {
        if self.cues.len() == MAX_PENDING_CUES {
            self.cues.pop_front();
        }
        self.cues.push_back(cue);
    }

    fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|seat| *seat == id)
    }

    fn absorb_turn_events(&mut self) {
        for event in self.scheduler.drain_events() {
            match event {
                TurnEvent::TurnStarted(id) => {
                    tracing::info!(round = self.scheduler.round(), seat = ?self.seat_of(id), "turn started");
                    if Some(id) == self.human
                        && let Some(player) = self.players.get(id)
                    {
                        self.cue(Cue::Focus { pos: player.pos });
                    }
                }
                TurnEvent::TurnEnded(id) => {
                    tracing::debug!(seat = ?self.seat_of(id), "turn ended");
                }
                TurnEvent::BotMoveDue(id) => {
                    tracing::debug!(seat = ?self.seat_of(id), "bot move due");
                }
                TurnEvent::GameOver => {
                    if self.outcome.is_none() {
                        self.outcome = Some(GameOutcome::AllDefeated);
                        self.push_log(Severity::Danger, "Every adventurer has fallen. No one claims the Secret Chamber.");
                    }
                    tracing::info!(outcome = ?self.outcome, "game over");
                }
            }
        }
    }
}
