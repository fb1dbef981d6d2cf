//! A stack of items occupying one inventory slot.

use crate::REGISTRY;
use crate::item::ItemId;

/// A stack of items: an item plus a count.
///
/// A stack with the empty item or a non-positive count is "empty" and
/// behaves like an unoccupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStack {
    item: ItemId,
    count: i32,
}

impl ItemStack {
    /// Creates a stack of the given item and count.
    #[must_use]
    pub const fn new(item: ItemId, count: i32) -> Self {
        Self { item, count }
    }

    /// Creates an empty stack.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item: ItemId::EMPTY,
            count: 0,
        }
    }

    /// Returns true if this stack is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.item.is_empty() || self.count <= 0
    }

    /// Returns the item held by this stack.
    #[must_use]
    pub const fn item(self) -> ItemId {
        self.item
    }

    /// Returns the number of items in this stack.
    #[must_use]
    pub const fn count(self) -> i32 {
        self.count
    }

    /// Sets the number of items in this stack.
    pub const fn set_count(&mut self, count: i32) {
        self.count = count;
    }

    /// Increases the count by the given amount.
    pub const fn grow(&mut self, amount: i32) {
        self.count += amount;
    }

    /// Decreases the count by the given amount, clearing the stack at zero.
    pub fn shrink(&mut self, amount: i32) {
        self.count -= amount;
        if self.count <= 0 {
            *self = Self::empty();
        }
    }

    /// Splits off up to `count` items into a new stack.
    #[must_use]
    pub fn split(&mut self, count: i32) -> Self {
        let taken = count.min(self.count);
        if taken <= 0 {
            return Self::empty();
        }
        let result = Self::new(self.item, taken);
        self.shrink(taken);
        result
    }

    /// Returns the stack contents and leaves this slot empty.
    #[must_use]
    pub const fn copy_and_clear(&mut self) -> Self {
        let result = *self;
        *self = Self::empty();
        result
    }

    /// Returns true if both stacks hold the same item.
    #[must_use]
    pub fn is_same_item(self, other: Self) -> bool {
        self.item == other.item
    }

    /// Returns the largest count one slot may hold of this stack's item.
    #[must_use]
    pub fn max_stack_size(self) -> i32 {
        REGISTRY
            .items
            .get(self.item)
            .map_or(1, |entry| entry.max_stack_size)
    }
}
