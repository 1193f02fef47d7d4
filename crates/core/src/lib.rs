pub mod bot;
pub mod combat;
pub mod config;
pub mod content;
pub mod game;
pub mod inventory;
pub mod map;
pub mod mapgen;
pub mod player;
pub mod puzzles;
pub mod rng;
pub mod turns;
pub mod types;

pub use config::GameConfig;
pub use game::{
    AdvanceResult, Game, ItemUse, MoveReport, PuzzlePrompt, PuzzleResolution, RenderSink,
    RenderSnapshot, Standing, StopReason,
};
pub use map::Map;
pub use mapgen::MapGenerator;
pub use player::Player;
pub use rng::{GameRng, Roller, ScriptedRoller};
pub use types::*;
