//! Player inventory implementation.

use tankworks_registry::ItemStack;

use super::Container;

/// The number of main inventory slots.
pub const INVENTORY_SIZE: usize = 36;

/// The player's inventory.
#[derive(Debug)]
pub struct PlayerInventory {
    items: [ItemStack; INVENTORY_SIZE],
    /// Tracks whether the inventory has been modified.
    times_changed: u32,
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerInventory {
    /// Creates a new empty player inventory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: [ItemStack::empty(); INVENTORY_SIZE],
            times_changed: 0,
        }
    }

    /// Returns the number of times the inventory has been modified.
    #[must_use]
    pub const fn times_changed(&self) -> u32 {
        self.times_changed
    }

    /// Tries to add an item to the inventory, merging into matching stacks
    /// first and then using empty slots.
    ///
    /// Returns `true` only if the entire stack was placed; whatever could
    /// not be placed remains in `stack`.
    pub fn add(&mut self, stack: &mut ItemStack) -> bool {
        if stack.is_empty() {
            return true;
        }

        // Merge into existing stacks of the same item.
        for slot in 0..self.items.len() {
            if stack.is_empty() {
                break;
            }
            let slot_item = self.items[slot];
            if slot_item.is_empty() || !slot_item.is_same_item(*stack) {
                continue;
            }
            let space = self.max_stack_size_for(slot_item) - slot_item.count();
            if space > 0 {
                let moved = space.min(stack.count());
                self.items[slot].grow(moved);
                stack.shrink(moved);
                self.set_changed();
            }
        }

        // Then fill empty slots.
        for slot in 0..self.items.len() {
            if stack.is_empty() {
                break;
            }
            if self.items[slot].is_empty() {
                self.items[slot] = stack.copy_and_clear();
                self.set_changed();
            }
        }

        stack.is_empty()
    }
}

impl Container for PlayerInventory {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn get_item(&self, slot: usize) -> &ItemStack {
        &self.items[slot]
    }

    fn get_item_mut(&mut self, slot: usize) -> &mut ItemStack {
        &mut self.items[slot]
    }

    fn set_item(&mut self, slot: usize, item: ItemStack) {
        self.items[slot] = item;
        self.set_changed();
    }

    fn set_changed(&mut self) {
        self.times_changed += 1;
    }
}

#[cfg(test)]
mod tests {
    use tankworks_registry::item::vanilla::{BUCKET, WATER_BUCKET};

    use super::*;

    #[test]
    fn test_add_merges_then_uses_empty_slots() {
        let mut inventory = PlayerInventory::new();
        inventory.set_item(3, ItemStack::new(BUCKET, 15));

        let mut incoming = ItemStack::new(BUCKET, 3);
        assert!(inventory.add(&mut incoming));
        assert!(incoming.is_empty());

        // Buckets stack to 16: one merged into slot 3, two into slot 0.
        assert_eq!(inventory.get_item(3).count(), 16);
        assert_eq!(*inventory.get_item(0), ItemStack::new(BUCKET, 2));
    }

    #[test]
    fn test_add_reports_failure_when_full() {
        let mut inventory = PlayerInventory::new();
        for slot in 0..INVENTORY_SIZE {
            inventory.set_item(slot, ItemStack::new(WATER_BUCKET, 1));
        }

        let mut incoming = ItemStack::new(WATER_BUCKET, 1);
        assert!(!inventory.add(&mut incoming));
        assert_eq!(incoming.count(), 1);
    }

    #[test]
    fn test_remove_item_decrements() {
        let mut inventory = PlayerInventory::new();
        inventory.set_item(0, ItemStack::new(WATER_BUCKET, 1));

        let removed = inventory.remove_item(0, 1);
        assert_eq!(removed, ItemStack::new(WATER_BUCKET, 1));
        assert!(inventory.get_item(0).is_empty());
    }
}
