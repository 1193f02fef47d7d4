use crate::content::item_def;
use crate::inventory::Inventory;
use crate::types::{Control, Direction, ItemKind, ItemUseError, KeyId, PlayerId, Pos};

pub const MAX_HEALTH: i32 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: &'static str,
    pub control: Control,
    pub pos: Pos,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub gold: u32,
    pub score: i32,
    pub inventory: Inventory,
    pub turns_taken: u32,
    pub chambers_explored: u32,
    pub puzzles_solved: u32,
    pub traps_triggered: u32,
    pub facing: Direction,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        color: &'static str,
        control: Control,
        inventory_slots: usize,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            control,
            pos: Pos::new(0, 0),
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            alive: true,
            gold: 0,
            score: 0,
            inventory: Inventory::new(inventory_slots),
            turns_taken: 0,
            chambers_explored: 0,
            puzzles_solved: 0,
            traps_triggered: 0,
            facing: Direction::South,
        }
    }

    pub fn spawn(&mut self, pos: Pos) {
        self.pos = pos;
    }

    pub fn is_bot(&self) -> bool {
        self.control.is_bot()
    }

    pub fn move_to(&mut self, target: Pos) {
        if let Some(direction) = Direction::between(self.pos, target) {
            self.facing = direction;
        }
        self.pos = target;
        self.turns_taken += 1;
    }

    /// Applies passive reduction, returns the damage actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let reduction = self.inventory.trap_damage_reduction_percent() as i32;
        let reduced = (amount * (100 - reduction)) / 100;
        let taken = reduced.clamp(0, self.health);
        self.health -= taken;
        if self.health == 0 {
            self.alive = false;
        }
        taken
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.clamp(0, self.max_health - self.health);
        self.health += healed;
        healed
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold += amount;
        self.score += amount as i32;
    }

    /// Never takes more than the player holds.
    pub fn remove_gold(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.gold);
        self.gold -= removed;
        removed
    }

    pub fn has_key(&self, key: KeyId) -> bool {
        self.inventory.has_key(key)
    }

    pub fn has_item(&self, kind: ItemKind) -> bool {
        self.inventory.has(kind)
    }

    pub fn consume_item(&mut self, kind: ItemKind) -> Result<(), ItemUseError> {
        if !item_def(kind).usable {
            return Err(ItemUseError::NotUsable);
        }
        if !self.inventory.remove(kind) {
            return Err(ItemUseError::NotHeld);
        }
        Ok(())
    }

    pub fn calculate_score(&self) -> i32 {
        self.gold as i32 + 5 * self.chambers_explored as i32 + 20 * self.puzzles_solved as i32
            - 3 * self.traps_triggered as i32
    }
}
