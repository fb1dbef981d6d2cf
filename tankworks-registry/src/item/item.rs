use tankworks_utils::Identifier;

/// Item ID - raw registry ID.
///
/// ID 0 is reserved for the empty item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u16);

impl ItemId {
    /// The empty item (ID: 0).
    pub const EMPTY: ItemId = ItemId(0);

    /// Returns true if this is the empty item.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A registered item.
pub struct ItemEntry {
    /// Raw registry ID.
    pub id: ItemId,
    /// Namespaced name.
    pub key: Identifier,
    /// How many of this item fit in one slot.
    pub max_stack_size: i32,
}
