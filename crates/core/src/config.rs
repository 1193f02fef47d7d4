//! Tunable game setup shared by the engine and the tools binaries.

use serde::{Deserialize, Serialize};

use crate::types::{ConfigError, Strategy};

pub const MAX_PLAYERS: usize = 4;
/// Largest side length accepted for a generated map.
pub const MAX_MAP_SIDE: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub player_count: usize,
    /// Seat driven by external input. `None` makes every seat a bot.
    pub human_seat: Option<usize>,
    /// Strategy tag per seat; the human seat's entry is ignored.
    pub bot_strategies: Vec<String>,
    pub bot_think_delay_ms: u64,
    pub vision_radius: i32,
    pub inventory_slots: usize,
    pub win_bonus: i32,
    pub log_tail: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            player_count: MAX_PLAYERS,
            human_seat: Some(0),
            bot_strategies: Strategy::ALL.iter().map(|s| s.label().to_string()).collect(),
            bot_think_delay_ms: 600,
            vision_radius: 1,
            inventory_slots: 8,
            win_bonus: 100,
            log_tail: 50,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::MapTooSmall { width: self.width, height: self.height });
        }
        if self.width > MAX_MAP_SIDE || self.height > MAX_MAP_SIDE {
            return Err(ConfigError::MapTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_MAP_SIDE,
            });
        }
        if self.vision_radius < 0 {
            return Err(ConfigError::NegativeVisionRadius(self.vision_radius));
        }
        self.validate_seats()
    }

    /// Seat and inventory checks only; used when the map is supplied by the caller.
    pub fn validate_seats(&self) -> Result<(), ConfigError> {
        if self.player_count == 0 || self.player_count > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if let Some(seat) = self.human_seat
            && seat >= self.player_count
        {
            return Err(ConfigError::HumanSeat { seat, player_count: self.player_count });
        }
        if self.inventory_slots == 0 {
            return Err(ConfigError::NoInventorySlots);
        }
        Ok(())
    }

    pub fn strategy_for_seat(&self, seat: usize) -> Strategy {
        self.bot_strategies.get(seat).map_or(Strategy::Balanced, |tag| Strategy::from_tag(tag))
    }

    pub fn is_human_seat(&self, seat: usize) -> bool {
        self.human_seat == Some(seat)
    }
}
