use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    pub struct PlayerId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn step(self, direction: Direction) -> Pos {
        let (dx, dy) = direction.delta();
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Enumeration order used for move candidates.
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    pub fn between(from: Pos, to: Pos) -> Option<Direction> {
        Direction::ALL.into_iter().find(|direction| from.step(*direction) == to)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChamberKind {
    Empty,
    Spawn,
    Treasure,
    Trap,
    Puzzle,
    Locked,
    Npc,
    Secret,
    Unknown,
}

/// Identifies the locked chamber a key opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyId(pub Pos);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key-{}-{}", self.0.x, self.0.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Key,
    HealthPotion,
    Shield,
    Compass,
    TrapKit,
    VisionScroll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub key: Option<KeyId>,
}

impl Item {
    pub const fn of(kind: ItemKind) -> Self {
        Self { kind, key: None }
    }

    pub const fn key(id: KeyId) -> Self {
        Self { kind: ItemKind::Key, key: Some(id) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Aggressive,
    Cautious,
    Explorer,
    Balanced,
}

impl Strategy {
    pub const ALL: [Strategy; 4] =
        [Strategy::Aggressive, Strategy::Cautious, Strategy::Explorer, Strategy::Balanced];

    /// Unknown tags fall back to `Balanced`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "aggressive" => Strategy::Aggressive,
            "cautious" => Strategy::Cautious,
            "explorer" => Strategy::Explorer,
            "balanced" => Strategy::Balanced,
            other => {
                tracing::warn!(tag = other, "unknown bot strategy tag, using balanced");
                Strategy::Balanced
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Strategy::Aggressive => "aggressive",
            Strategy::Cautious => "cautious",
            Strategy::Explorer => "explorer",
            Strategy::Balanced => "balanced",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Human,
    Bot(Strategy),
}

impl Control {
    pub fn is_bot(self) -> bool {
        matches!(self, Control::Bot(_))
    }

    pub fn strategy(self) -> Option<Strategy> {
        match self {
            Control::Human => None,
            Control::Bot(strategy) => Some(strategy),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    System,
    Success,
    Warning,
    Danger,
    Combat,
    Info,
    Npc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub severity: Severity,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Waiting,
    PlayerTurn,
    BotThinking,
    GameOver,
}

/// Cosmetic triggers for the render layer. No engine state depends on them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Cue {
    Focus { pos: Pos },
    Shake { intensity: u32 },
    Particles { pos: Pos, color: &'static str, count: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(PlayerId),
    AllDefeated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("map must be at least 3x3, got {width}x{height}")]
    MapTooSmall { width: usize, height: usize },
    #[error("map must be at most {max}x{max}, got {width}x{height}")]
    MapTooLarge { width: usize, height: usize, max: usize },
    #[error("vision radius must not be negative, got {0}")]
    NegativeVisionRadius(i32),
    #[error("player count must be between 1 and 4, got {0}")]
    PlayerCount(usize),
    #[error("human seat {seat} is outside the {player_count} configured players")]
    HumanSeat { seat: usize, player_count: usize },
    #[error("inventory needs at least one slot")]
    NoInventorySlots,
    #[error("map has {spawns} spawn points for {player_count} players")]
    NotEnoughSpawns { spawns: usize, player_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("Inventory full!")]
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ItemUseError {
    #[error("Cannot use that item.")]
    NotUsable,
    #[error("You don't have that item.")]
    NotHeld,
    #[error("A trap is already set in this chamber.")]
    TrapAlreadySet,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is not accepting input right now")]
    NotAccepting,
    #[error("it is not the human player's turn")]
    NotYourTurn,
    #[error("{0} is not adjacent to the active player")]
    NotAdjacent(Pos),
    #[error("this chamber is locked and needs {0}")]
    Locked(KeyId),
    #[error("no puzzle is waiting for an answer")]
    NoPendingPuzzle,
    #[error(transparent)]
    Item(#[from] ItemUseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
