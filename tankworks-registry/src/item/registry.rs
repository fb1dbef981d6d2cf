use rustc_hash::FxHashMap;
use tankworks_utils::Identifier;

use super::{ItemEntry, ItemId};
use crate::RegistryExt;

/// Registry of all known items.
pub struct ItemRegistry {
    by_id: FxHashMap<ItemId, ItemEntry>,
    by_key: FxHashMap<Identifier, ItemId>,
    allows_registering: bool,
}

impl ItemRegistry {
    /// Creates an empty, unfrozen registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_id: FxHashMap::default(),
            by_key: FxHashMap::default(),
            allows_registering: true,
        }
    }

    /// Registers an item.
    ///
    /// # Panics
    /// Panics if the registry has been frozen.
    pub fn register(&mut self, entry: ItemEntry) {
        assert!(
            self.allows_registering,
            "Cannot register item after registry is frozen"
        );
        self.by_key.insert(entry.key.clone(), entry.id);
        self.by_id.insert(entry.id, entry);
    }

    /// Looks up an item by raw ID.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&ItemEntry> {
        self.by_id.get(&id)
    }

    /// Looks up an item ID by its namespaced name.
    #[must_use]
    pub fn by_key(&self, key: &Identifier) -> Option<ItemId> {
        self.by_key.get(key).copied()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for ItemRegistry {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}
