use rustc_hash::FxHashMap;
use tankworks_utils::Identifier;

use super::{FluidEntry, FluidId};
use crate::RegistryExt;

/// Registry of all known fluids.
pub struct FluidRegistry {
    by_id: FxHashMap<FluidId, FluidEntry>,
    by_key: FxHashMap<Identifier, FluidId>,
    allows_registering: bool,
}

impl FluidRegistry {
    /// Creates an empty, unfrozen registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_id: FxHashMap::default(),
            by_key: FxHashMap::default(),
            allows_registering: true,
        }
    }

    /// Registers a fluid.
    ///
    /// # Panics
    /// Panics if the registry has been frozen.
    pub fn register(&mut self, entry: FluidEntry) {
        assert!(
            self.allows_registering,
            "Cannot register fluid after registry is frozen"
        );
        self.by_key.insert(entry.key.clone(), entry.id);
        self.by_id.insert(entry.id, entry);
    }

    /// Looks up a fluid by raw ID.
    #[must_use]
    pub fn get(&self, id: FluidId) -> Option<&FluidEntry> {
        self.by_id.get(&id)
    }

    /// Looks up a fluid ID by its namespaced name.
    #[must_use]
    pub fn by_key(&self, key: &Identifier) -> Option<FluidId> {
        self.by_key.get(key).copied()
    }
}

impl Default for FluidRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for FluidRegistry {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}
