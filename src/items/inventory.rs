use super::types::Item;
use crate::core::constants::INVENTORY_CAPACITY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Inventory is full")]
    Full,

    #[error("Not enough {id}: need {required}, have {available}")]
    Insufficient {
        id: String,
        required: u32,
        available: u32,
    },
}

/// Bounded bag of item stacks. Stackable items merge by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub capacity: usize,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Total units of `id` across all stacks.
    pub fn count(&self, id: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.id == id)
            .map(|item| item.stack_size)
            .sum()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Adds an item, topping up existing stacks first. On `Full` nothing changes.
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        if !item.is_stackable() {
            if self.is_full() {
                return Err(InventoryError::Full);
            }
            self.items.push(item);
            return Ok(());
        }

        let room_in_stacks: u32 = self
            .items
            .iter()
            .filter(|s| s.id == item.id)
            .map(|s| s.max_stack.saturating_sub(s.stack_size))
            .sum();
        let overflow = item.stack_size.saturating_sub(room_in_stacks);
        let new_stacks = overflow.div_ceil(item.max_stack.max(1)) as usize;
        if self.items.len() + new_stacks > self.capacity {
            return Err(InventoryError::Full);
        }

        let mut remaining = item.stack_size;
        for stack in self.items.iter_mut().filter(|s| s.id == item.id) {
            let room = stack.max_stack.saturating_sub(stack.stack_size);
            let moved = room.min(remaining);
            stack.stack_size += moved;
            remaining -= moved;
            if remaining == 0 {
                return Ok(());
            }
        }
        while remaining > 0 {
            let mut stack = item.clone();
            stack.stack_size = remaining.min(item.max_stack.max(1));
            remaining -= stack.stack_size;
            self.items.push(stack);
        }
        Ok(())
    }

    /// Removes `quantity` units of `id`. Nothing is removed unless all are present.
    pub fn remove(&mut self, id: &str, quantity: u32) -> Result<(), InventoryError> {
        let available = self.count(id);
        if available < quantity {
            return Err(InventoryError::Insufficient {
                id: id.to_string(),
                required: quantity,
                available,
            });
        }

        let mut remaining = quantity;
        for stack in self.items.iter_mut().rev().filter(|s| s.id == id) {
            let taken = stack.stack_size.min(remaining);
            stack.stack_size -= taken;
            remaining -= taken;
            if remaining == 0 {
                break;
            }
        }
        self.items.retain(|item| item.stack_size > 0);
        Ok(())
    }

    /// Takes a whole non-stackable item (or stack) out by id.
    pub fn take(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Replaces the item with the same id, e.g. after an upgrade.
    pub fn replace(&mut self, item: Item) -> bool {
        match self.items.iter_mut().find(|slot| slot.id == item.id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::{template, BEAR_GALL_ID};

    fn gall(count: u32) -> Item {
        let mut item = template(BEAR_GALL_ID).unwrap().instantiate(BEAR_GALL_ID.to_string());
        item.stack_size = count;
        item
    }

    fn sword(id: &str) -> Item {
        template("bamboo-blade").unwrap().instantiate(id.to_string())
    }

    #[test]
    fn test_stackables_merge() {
        let mut inv = Inventory::new(5);
        inv.add(gall(3)).unwrap();
        inv.add(gall(4)).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.count(BEAR_GALL_ID), 7);
    }

    #[test]
    fn test_stack_overflow_opens_new_stack() {
        let mut inv = Inventory::new(5);
        inv.add(gall(199)).unwrap();
        inv.add(gall(3)).unwrap();
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.count(BEAR_GALL_ID), 202);
        assert!(inv.items.iter().all(|s| s.stack_size <= s.max_stack));
    }

    #[test]
    fn test_full_inventory_rejects_without_change() {
        let mut inv = Inventory::new(1);
        inv.add(sword("a")).unwrap();
        assert_eq!(inv.add(sword("b")), Err(InventoryError::Full));
        assert_eq!(inv.add(gall(1)), Err(InventoryError::Full));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_remove_is_all_or_nothing() {
        let mut inv = Inventory::new(5);
        inv.add(gall(2)).unwrap();
        assert!(matches!(
            inv.remove(BEAR_GALL_ID, 3),
            Err(InventoryError::Insufficient { available: 2, .. })
        ));
        assert_eq!(inv.count(BEAR_GALL_ID), 2);
        inv.remove(BEAR_GALL_ID, 2).unwrap();
        assert!(inv.is_empty());
    }

    #[test]
    fn test_take_and_replace() {
        let mut inv = Inventory::new(5);
        inv.add(sword("a")).unwrap();
        let mut item = inv.get("a").unwrap().clone();
        item.display_name = "Bamboo Blade+1".to_string();
        assert!(inv.replace(item));
        assert_eq!(inv.take("a").unwrap().plus_level(), 1);
        assert!(inv.take("a").is_none());
    }
}
