//! Turn rotation state machine with a cancellable bot "thinking" timer.
//! Time only moves through `advance_clock`, so callers decide how fast bots play.

use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::player::Player;
use crate::types::{PlayerId, TurnPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    TurnEnded(PlayerId),
    TurnStarted(PlayerId),
    BotMoveDue(PlayerId),
    GameOver,
}

/// Armed for one seat; a timer whose seat is no longer active never fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BotTimer {
    due_ms: u64,
    player: PlayerId,
}

#[derive(Clone, Debug)]
pub struct TurnScheduler {
    order: Vec<PlayerId>,
    active: usize,
    round: u32,
    phase: TurnPhase,
    bot_delay_ms: u64,
    now_ms: u64,
    timer: Option<BotTimer>,
    events: VecDeque<TurnEvent>,
}

fn is_live_bot(players: &SlotMap<PlayerId, Player>, id: PlayerId) -> bool {
    players.get(id).is_some_and(|player| player.alive && player.is_bot())
}

impl TurnScheduler {
    pub fn new(bot_delay_ms: u64) -> Self {
        Self {
            order: Vec::new(),
            active: 0,
            round: 1,
            phase: TurnPhase::Waiting,
            bot_delay_ms,
            now_ms: 0,
            timer: None,
            events: VecDeque::new(),
        }
    }

    pub fn init(&mut self, order: Vec<PlayerId>) {
        self.order = order;
        self.active = 0;
        self.round = 1;
        self.phase = TurnPhase::PlayerTurn;
        self.timer = None;
        self.events.clear();
    }

    /// Announces the first seat and arms the timer when that seat is a bot.
    pub fn start(&mut self, players: &SlotMap<PlayerId, Player>) {
        let Some(current) = self.current() else {
            return;
        };
        self.events.push_back(TurnEvent::TurnStarted(current));
        if is_live_bot(players, current) {
            self.arm(current);
        }
    }

    pub fn current(&self) -> Option<PlayerId> {
        self.order.get(self.active).copied()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn arm(&mut self, player: PlayerId) {
        self.phase = TurnPhase::BotThinking;
        self.timer = Some(BotTimer { due_ms: self.now_ms + self.bot_delay_ms, player });
    }

    /// Moves to the next living seat. The round counter ticks each time rotation wraps.
    /// Returns `None` and ends the game once nobody is alive.
    pub fn next_turn(&mut self, players: &SlotMap<PlayerId, Player>) -> Option<PlayerId> {
        if self.phase == TurnPhase::GameOver || self.order.is_empty() {
            return None;
        }
        if let Some(current) = self.current() {
            self.events.push_back(TurnEvent::TurnEnded(current));
        }
        self.timer = None;

        let alive = |id: PlayerId| players.get(id).is_some_and(|player| player.alive);
        let seats = self.order.len();
        for _ in 0..seats {
            self.active = (self.active + 1) % seats;
            if self.active == 0 {
                self.round += 1;
            }
            if alive(self.order[self.active]) {
                break;
            }
        }

        let current = self.order[self.active];
        if !alive(current) {
            self.finish();
            return None;
        }

        self.phase = TurnPhase::PlayerTurn;
        self.events.push_back(TurnEvent::TurnStarted(current));
        if is_live_bot(players, current) {
            self.arm(current);
        }
        tracing::debug!(round = self.round, seat = self.active, phase = ?self.phase, "turn started");
        Some(current)
    }

    /// Suspends rotation for an interactive sub-phase and drops any pending bot move.
    pub fn pause(&mut self) {
        self.timer = None;
        if self.phase != TurnPhase::GameOver {
            self.phase = TurnPhase::Waiting;
        }
    }

    pub fn resume(&mut self, players: &SlotMap<PlayerId, Player>) {
        if self.phase == TurnPhase::GameOver {
            return;
        }
        self.phase = TurnPhase::PlayerTurn;
        if let Some(current) = self.current()
            && is_live_bot(players, current)
        {
            self.arm(current);
        }
    }

    pub fn finish(&mut self) {
        self.timer = None;
        if self.phase != TurnPhase::GameOver {
            self.phase = TurnPhase::GameOver;
            self.events.push_back(TurnEvent::GameOver);
        }
    }

    /// Cancels the pending bot move without touching rotation.
    pub fn shutdown(&mut self) {
        self.timer = None;
    }

    pub fn is_human_turn(&self, players: &SlotMap<PlayerId, Player>) -> bool {
        self.phase == TurnPhase::PlayerTurn
            && self
                .current()
                .and_then(|id| players.get(id))
                .is_some_and(|player| player.alive && !player.is_bot())
    }

    pub fn time_until_bot_move(&self) -> Option<u64> {
        self.timer.map(|timer| timer.due_ms.saturating_sub(self.now_ms))
    }

    /// Advances the clock. When the armed bot timer comes due the phase returns to
    /// `PlayerTurn` and the bot whose move is due is returned.
    pub fn advance_clock(&mut self, elapsed_ms: u64) -> Option<PlayerId> {
        self.now_ms += elapsed_ms;
        let timer = self.timer?;
        if timer.due_ms > self.now_ms {
            return None;
        }
        self.timer = None;
        if self.current() != Some(timer.player) {
            tracing::warn!(player = ?timer.player, "dropped bot timer for a seat that is no longer active");
            return None;
        }
        self.phase = TurnPhase::PlayerTurn;
        self.events.push_back(TurnEvent::BotMoveDue(timer.player));
        Some(timer.player)
    }

    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Control, Strategy};

    fn table(controls: &[Control]) -> (SlotMap<PlayerId, Player>, Vec<PlayerId>) {
        let mut players = SlotMap::with_key();
        let order = controls
            .iter()
            .map(|control| players.insert_with_key(|id| Player::new(id, "P", "#FFFFFF", *control, 8)))
            .collect();
        (players, order)
    }

    fn humans(count: usize) -> (SlotMap<PlayerId, Player>, Vec<PlayerId>) {
        table(&vec![Control::Human; count])
    }

    #[test]
    fn init_starts_first_seat_in_player_turn() {
        let (_, order) = humans(3);
        let mut scheduler = TurnScheduler::new(600);
        assert_eq!(scheduler.phase(), TurnPhase::Waiting);
        scheduler.init(order.clone());
        assert_eq!(scheduler.phase(), TurnPhase::PlayerTurn);
        assert_eq!(scheduler.current(), Some(order[0]));
        assert_eq!(scheduler.round(), 1);
    }

    #[test]
    fn full_lap_returns_to_first_seat_and_counts_one_round() {
        for count in 1..=4 {
            let (players, order) = humans(count);
            let mut scheduler = TurnScheduler::new(600);
            scheduler.init(order.clone());
            for _ in 0..count {
                scheduler.next_turn(&players);
            }
            assert_eq!(scheduler.current(), Some(order[0]), "{count} seats");
            assert_eq!(scheduler.round(), 2, "{count} seats");
        }
    }

    #[test]
    fn dead_players_are_never_activated() {
        let (mut players, order) = humans(4);
        players[order[1]].alive = false;
        players[order[2]].alive = false;
        let mut scheduler = TurnScheduler::new(600);
        scheduler.init(order.clone());
        for _ in 0..10 {
            let next = scheduler.next_turn(&players).unwrap();
            assert!(next == order[0] || next == order[3]);
        }
    }

    #[test]
    fn nobody_alive_means_game_over() {
        let (mut players, order) = humans(2);
        for id in &order {
            players[*id].alive = false;
        }
        let mut scheduler = TurnScheduler::new(600);
        scheduler.init(order);
        assert_eq!(scheduler.next_turn(&players), None);
        assert_eq!(scheduler.phase(), TurnPhase::GameOver);
        assert_eq!(scheduler.drain_events().last(), Some(&TurnEvent::GameOver));
        assert_eq!(scheduler.next_turn(&players), None);
    }

    #[test]
    fn bot_turn_fires_after_the_thinking_delay() {
        let (players, order) = table(&[Control::Human, Control::Bot(Strategy::Explorer)]);
        let mut scheduler = TurnScheduler::new(600);
        scheduler.init(order.clone());
        scheduler.next_turn(&players);
        assert_eq!(scheduler.phase(), TurnPhase::BotThinking);
        assert!(!scheduler.is_human_turn(&players));

        assert_eq!(scheduler.advance_clock(599), None);
        assert_eq!(scheduler.time_until_bot_move(), Some(1));
        assert_eq!(scheduler.advance_clock(1), Some(order[1]));
        assert_eq!(scheduler.phase(), TurnPhase::PlayerTurn);
        assert_eq!(scheduler.advance_clock(10_000), None);

        scheduler.next_turn(&players);
        assert!(scheduler.is_human_turn(&players));
        let events = scheduler.drain_events();
        assert_eq!(
            events,
            vec![
                TurnEvent::TurnEnded(order[0]),
                TurnEvent::TurnStarted(order[1]),
                TurnEvent::BotMoveDue(order[1]),
                TurnEvent::TurnEnded(order[1]),
                TurnEvent::TurnStarted(order[0]),
            ]
        );
    }

    #[test]
    fn pause_cancels_pending_bot_move_and_resume_rearms_it() {
        let (players, order) = table(&[Control::Bot(Strategy::Aggressive), Control::Human]);
        let mut scheduler = TurnScheduler::new(600);
        scheduler.init(order.clone());
        scheduler.start(&players);
        assert_eq!(scheduler.phase(), TurnPhase::BotThinking);

        scheduler.advance_clock(300);
        scheduler.pause();
        assert_eq!(scheduler.phase(), TurnPhase::Waiting);
        assert_eq!(scheduler.advance_clock(5_000), None);
        assert_eq!(scheduler.current(), Some(order[0]));

        scheduler.resume(&players);
        assert_eq!(scheduler.time_until_bot_move(), Some(600));
        assert_eq!(scheduler.advance_clock(600), Some(order[0]));
    }

    #[test]
    fn shutdown_drops_the_timer() {
        let (players, order) = table(&[Control::Bot(Strategy::Balanced)]);
        let mut scheduler = TurnScheduler::new(50);
        scheduler.init(order);
        scheduler.start(&players);
        scheduler.shutdown();
        assert_eq!(scheduler.time_until_bot_move(), None);
        assert_eq!(scheduler.advance_clock(1_000), None);
    }

    #[test]
    fn human_turn_gate_requires_player_turn_phase() {
        let (players, order) = humans(1);
        let mut scheduler = TurnScheduler::new(600);
        scheduler.init(order);
        assert!(scheduler.is_human_turn(&players));
        scheduler.pause();
        assert!(!scheduler.is_human_turn(&players));
        scheduler.finish();
        scheduler.resume(&players);
        assert_eq!(scheduler.phase(), TurnPhase::GameOver);
    }
}
