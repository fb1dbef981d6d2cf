//! Container trait for item storage.

use tankworks_registry::ItemStack;

/// A trait for objects that can store items in slots.
pub trait Container: Send + Sync {
    /// Returns the number of slots in this container.
    fn size(&self) -> usize;

    /// Returns true if all slots are empty.
    fn is_empty(&self) -> bool {
        for i in 0..self.size() {
            if !self.get_item(i).is_empty() {
                return false;
            }
        }
        true
    }

    /// Gets the item in the given slot.
    fn get_item(&self, slot: usize) -> &ItemStack;

    /// Gets a mutable reference to the item in the given slot.
    fn get_item_mut(&mut self, slot: usize) -> &mut ItemStack;

    /// Removes up to `count` items from the given slot and returns them.
    fn remove_item(&mut self, slot: usize, count: i32) -> ItemStack {
        let item = self.get_item_mut(slot);
        if item.is_empty() || count <= 0 {
            return ItemStack::empty();
        }
        let result = item.split(count);
        if !result.is_empty() {
            self.set_changed();
        }
        result
    }

    /// Sets the item in the given slot.
    fn set_item(&mut self, slot: usize, item: ItemStack);

    /// Returns the maximum stack size this container allows.
    fn max_stack_size(&self) -> i32 {
        64
    }

    /// Returns the maximum stack size for a specific item in this container.
    fn max_stack_size_for(&self, item: ItemStack) -> i32 {
        self.max_stack_size().min(item.max_stack_size())
    }

    /// Called when the container contents change.
    fn set_changed(&mut self);
}
