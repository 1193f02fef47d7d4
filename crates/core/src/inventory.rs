//! Slot-bounded item storage carried by each player.

use serde::Serialize;

use crate::content::item_def;
use crate::types::{InventoryError, Item, ItemKind, KeyId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub key: Option<KeyId>,
    pub count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    NewSlot,
    Stacked { count: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
    max_slots: usize,
}

impl Inventory {
    pub fn new(max_slots: usize) -> Self {
        Self { stacks: Vec::with_capacity(max_slots), max_slots }
    }

    /// Stackable kinds merge into their existing slot even when every slot is taken.
    pub fn add(&mut self, item: Item) -> Result<AddOutcome, InventoryError> {
        if item_def(item.kind).stackable
            && let Some(stack) = self.stacks.iter_mut().find(|stack| stack.kind == item.kind)
        {
            stack.count += 1;
            return Ok(AddOutcome::Stacked { count: stack.count });
        }
        if self.stacks.len() >= self.max_slots {
            return Err(InventoryError::Full);
        }
        self.stacks.push(ItemStack { kind: item.kind, key: item.key, count: 1 });
        Ok(AddOutcome::NewSlot)
    }

    /// Takes one unit of `kind`, dropping the slot when it empties.
    pub fn remove(&mut self, kind: ItemKind) -> bool {
        let Some(index) = self.stacks.iter().position(|stack| stack.kind == kind) else {
            return false;
        };
        self.take_from(index);
        true
    }

    pub fn remove_key(&mut self, key: KeyId) -> bool {
        let Some(index) = self.stacks.iter().position(|stack| stack.key == Some(key)) else {
            return false;
        };
        self.take_from(index);
        true
    }

    fn take_from(&mut self, index: usize) {
        self.stacks[index].count -= 1;
        if self.stacks[index].count == 0 {
            self.stacks.remove(index);
        }
    }

    pub fn has(&self, kind: ItemKind) -> bool {
        self.stacks.iter().any(|stack| stack.kind == kind)
    }

    pub fn has_key(&self, key: KeyId) -> bool {
        self.stacks.iter().any(|stack| stack.key == Some(key))
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.stacks.iter().filter(|stack| stack.kind == kind).map(|stack| stack.count).sum()
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn trap_damage_reduction_percent(&self) -> u32 {
        self.stacks
            .iter()
            .filter_map(|stack| item_def(stack.kind).trap_damage_reduction_percent)
            .max()
            .unwrap_or(0)
    }
}
