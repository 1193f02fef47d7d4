//! Static catalogs: chamber kinds, items, trap and NPC tables, seat defaults.

use serde::Serialize;

use crate::player::Player;
use crate::rng::Roller;
use crate::types::{ChamberKind, Item, ItemKind};

pub const HEALTH_POTION_HEAL: i32 = 30;
pub const SHIELD_DAMAGE_REDUCTION_PERCENT: u32 = 50;
pub const TRAP_KIT_DAMAGE: i32 = 15;
pub const VISION_SCROLL_RADIUS: i32 = 3;
pub const THIEF_STEAL_PERCENT: u32 = 30;
pub const TREASURE_GOLD_MIN: u32 = 10;
pub const TREASURE_GOLD_MAX: u32 = 59;

pub const BOT_NAMES: [&str; 4] = ["Red Rogue", "Blue Mage", "Green Ranger", "Gold Knight"];
pub const HUMAN_NAME: &str = "You";
pub const PLAYER_COLORS: [&str; 4] = ["#FF4444", "#44AAFF", "#44FF44", "#FFAA44"];

pub struct ChamberInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn chamber_info(kind: ChamberKind) -> ChamberInfo {
    match kind {
        ChamberKind::Empty => ChamberInfo {
            name: "Empty Chamber",
            description: "A quiet room. Dust motes float in the dim light.",
        },
        ChamberKind::Spawn => ChamberInfo {
            name: "Starting Chamber",
            description: "Your starting position. The adventure begins here.",
        },
        ChamberKind::Treasure => ChamberInfo {
            name: "Treasure Chamber",
            description: "Something glints in the corner...",
        },
        ChamberKind::Trap => {
            ChamberInfo { name: "Trap Chamber", description: "The floor creaks ominously..." }
        }
        ChamberKind::Puzzle => {
            ChamberInfo { name: "Puzzle Chamber", description: "Strange symbols cover the walls..." }
        }
        ChamberKind::Locked => ChamberInfo {
            name: "Locked Chamber",
            description: "A heavy door blocks your path. It needs a key.",
        },
        ChamberKind::Npc => {
            ChamberInfo { name: "NPC Chamber", description: "Someone is waiting here..." }
        }
        ChamberKind::Secret => ChamberInfo {
            name: "Secret Chamber",
            description: "The air hums with energy. This is it. The final chamber.",
        },
        ChamberKind::Unknown => ChamberInfo {
            name: "???",
            description: "Shrouded in darkness. Move closer to reveal.",
        },
    }
}

pub struct ItemDef {
    pub name: &'static str,
    pub description: &'static str,
    pub stackable: bool,
    pub usable: bool,
    pub trap_damage_reduction_percent: Option<u32>,
}

pub fn item_def(kind: ItemKind) -> ItemDef {
    match kind {
        ItemKind::Key => ItemDef {
            name: "Key",
            description: "Opens a locked chamber.",
            stackable: false,
            usable: false,
            trap_damage_reduction_percent: None,
        },
        ItemKind::HealthPotion => ItemDef {
            name: "Health Potion",
            description: "Restores 30 HP.",
            stackable: true,
            usable: true,
            trap_damage_reduction_percent: None,
        },
        ItemKind::Shield => ItemDef {
            name: "Shield",
            description: "Reduces trap damage by 50%.",
            stackable: false,
            usable: false,
            trap_damage_reduction_percent: Some(SHIELD_DAMAGE_REDUCTION_PERCENT),
        },
        ItemKind::Compass => ItemDef {
            name: "Compass",
            description: "Reveals the direction of the Secret Chamber.",
            stackable: false,
            usable: true,
            trap_damage_reduction_percent: None,
        },
        ItemKind::TrapKit => ItemDef {
            name: "Trap Kit",
            description: "Place a trap in the current chamber for other players.",
            stackable: true,
            usable: true,
            trap_damage_reduction_percent: None,
        },
        ItemKind::VisionScroll => ItemDef {
            name: "Vision Scroll",
            description: "Reveals all chambers within 3 tiles.",
            stackable: true,
            usable: true,
            trap_damage_reduction_percent: None,
        },
    }
}

pub fn item_name(item: &Item) -> String {
    match item.key {
        Some(key) => format!("Key to Chamber {}", key.0),
        None => item_def(item.kind).name.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrapKind {
    SpikeTrap,
    PoisonGas,
    FallingRocks,
    Thief,
}

impl TrapKind {
    pub const ALL: [TrapKind; 4] =
        [TrapKind::SpikeTrap, TrapKind::PoisonGas, TrapKind::FallingRocks, TrapKind::Thief];

    pub const fn damage(self) -> i32 {
        match self {
            TrapKind::SpikeTrap => 15,
            TrapKind::PoisonGas => 10,
            TrapKind::FallingRocks => 20,
            TrapKind::Thief => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TrapKind::SpikeTrap => "Spike Trap",
            TrapKind::PoisonGas => "Poison Gas",
            TrapKind::FallingRocks => "Falling Rocks",
            TrapKind::Thief => "Thief",
        }
    }

    const fn message(self) -> &'static str {
        match self {
            TrapKind::SpikeTrap => "Spikes shoot from the floor!",
            TrapKind::PoisonGas => "A green mist fills the room...",
            TrapKind::FallingRocks => "The ceiling collapses!",
            TrapKind::Thief => "A shadow darts past, your pocket feels lighter!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NpcEncounter {
    Trader,
    Warning,
    Gift,
}

impl NpcEncounter {
    pub const ALL: [NpcEncounter; 3] = [NpcEncounter::Trader, NpcEncounter::Warning, NpcEncounter::Gift];

    pub const fn line(self) -> &'static str {
        match self {
            NpcEncounter::Trader => "\"Psst! I'll trade a hint for 20 gold.\"",
            NpcEncounter::Warning => "\"Beware the chamber to the north...\"",
            NpcEncounter::Gift => "\"Take this. You'll need it.\"",
        }
    }

    pub const fn gift(self) -> Option<Item> {
        match self {
            NpcEncounter::Gift => Some(Item::of(ItemKind::HealthPotion)),
            NpcEncounter::Trader | NpcEncounter::Warning => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ChamberEffect {
    Treasure { gold: u32 },
    Trap { trap: TrapKind, damage: i32, stolen: u32 },
    Npc { encounter: NpcEncounter },
}

impl ChamberEffect {
    pub fn message(&self) -> String {
        match self {
            ChamberEffect::Treasure { gold } => format!("Found {gold} gold!"),
            ChamberEffect::Trap { trap, damage, stolen } => {
                let mut message = trap.message().to_string();
                if *damage > 0 {
                    message.push_str(&format!(" (-{damage} HP)"));
                }
                if *stolen > 0 {
                    message.push_str(&format!(" Lost {stolen} gold!"));
                }
                message
            }
            ChamberEffect::Npc { encounter } => encounter.line().to_string(),
        }
    }
}

/// Applies the one-shot entry effect of a chamber kind to a player.
/// Kinds without an effect return `None` and leave the player untouched.
pub fn trigger_chamber_effect(
    kind: ChamberKind,
    player: &mut Player,
    roller: &mut impl Roller,
) -> Option<ChamberEffect> {
    match kind {
        ChamberKind::Treasure => {
            let gold = roller.roll(TREASURE_GOLD_MIN, TREASURE_GOLD_MAX);
            player.add_gold(gold);
            Some(ChamberEffect::Treasure { gold })
        }
        ChamberKind::Trap => {
            let trap = TrapKind::ALL[roller.pick_index(TrapKind::ALL.len())];
            let damage = if trap.damage() > 0 { player.take_damage(trap.damage()) } else { 0 };
            let stolen = if trap == TrapKind::Thief && player.gold > 0 {
                player.remove_gold(player.gold * THIEF_STEAL_PERCENT / 100)
            } else {
                0
            };
            player.traps_triggered += 1;
            Some(ChamberEffect::Trap { trap, damage, stolen })
        }
        ChamberKind::Npc => {
            let encounter = NpcEncounter::ALL[roller.pick_index(NpcEncounter::ALL.len())];
            Some(ChamberEffect::Npc { encounter })
        }
        ChamberKind::Empty
        | ChamberKind::Spawn
        | ChamberKind::Puzzle
        | ChamberKind::Locked
        | ChamberKind::Secret
        | ChamberKind::Unknown => None,
    }
}
