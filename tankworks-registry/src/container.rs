//! Classification and conversion of fluid container items.
//!
//! Maps an empty container item plus a fluid payload to its filled
//! counterpart, and back. Bucket exchange in the machine layer is written
//! entirely against these lookups.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::RegistryExt;
use crate::fluid::FluidId;
use crate::fluid_stack::FluidStack;
use crate::item::ItemId;
use crate::item_stack::ItemStack;

/// One filled-container mapping: `empty` + `payload` = `filled`.
pub struct ContainerEntry {
    /// The fluid (type and exact amount) the filled item represents.
    pub payload: FluidStack,
    /// The filled container item.
    pub filled: ItemId,
    /// The empty container item, or `None` for containers consumed on use.
    pub empty: Option<ItemId>,
}

/// Registry of filled/empty fluid container item pairs.
pub struct FluidContainerRegistry {
    entries: Vec<ContainerEntry>,
    by_filled: FxHashMap<ItemId, usize>,
    by_empty_and_fluid: FxHashMap<(ItemId, FluidId), usize>,
    empty_items: FxHashSet<ItemId>,
    allows_registering: bool,
}

impl FluidContainerRegistry {
    /// Creates an empty, unfrozen registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_filled: FxHashMap::default(),
            by_empty_and_fluid: FxHashMap::default(),
            empty_items: FxHashSet::default(),
            allows_registering: true,
        }
    }

    /// Registers a container mapping.
    ///
    /// # Panics
    /// Panics if the registry has been frozen.
    pub fn register(&mut self, entry: ContainerEntry) {
        assert!(
            self.allows_registering,
            "Cannot register container after registry is frozen"
        );

        let index = self.entries.len();
        self.by_filled.insert(entry.filled, index);
        if let Some(empty) = entry.empty {
            self.by_empty_and_fluid
                .insert((empty, entry.payload.fluid), index);
            self.empty_items.insert(empty);
        }
        self.entries.push(entry);
    }

    /// Returns true if the stack is a container holding fluid.
    #[must_use]
    pub fn is_filled_container(&self, stack: ItemStack) -> bool {
        !stack.is_empty() && self.by_filled.contains_key(&stack.item())
    }

    /// Returns true if the stack is a fillable empty container.
    #[must_use]
    pub fn is_empty_container(&self, stack: ItemStack) -> bool {
        !stack.is_empty() && self.empty_items.contains(&stack.item())
    }

    /// Returns the fluid a filled container item holds.
    #[must_use]
    pub fn fluid_for_filled_item(&self, stack: ItemStack) -> Option<FluidStack> {
        if stack.is_empty() {
            return None;
        }
        let index = *self.by_filled.get(&stack.item())?;
        Some(self.entries[index].payload)
    }

    /// Fills an empty container from the given fluid.
    ///
    /// Returns the filled item (count 1) if a mapping exists for this
    /// container/fluid pair and the fluid covers the container's full
    /// payload; partial container fills do not exist.
    #[must_use]
    pub fn fill_container(&self, fluid: FluidStack, empty: ItemStack) -> Option<ItemStack> {
        if fluid.is_empty() || empty.is_empty() {
            return None;
        }
        let index = *self.by_empty_and_fluid.get(&(empty.item(), fluid.fluid))?;
        let entry = &self.entries[index];

        if fluid.amount < entry.payload.amount {
            return None;
        }

        Some(ItemStack::new(entry.filled, 1))
    }

    /// Returns the fluid amount a filled container item represents.
    ///
    /// Zero if the item is not a known filled container for this fluid.
    #[must_use]
    pub fn container_capacity(&self, fluid: FluidStack, filled: ItemStack) -> i32 {
        let Some(&index) = self.by_filled.get(&filled.item()) else {
            return 0;
        };
        let entry = &self.entries[index];

        if entry.payload.fluid == fluid.fluid {
            entry.payload.amount
        } else {
            0
        }
    }

    /// Returns the residual item left after draining a filled container.
    ///
    /// `None` for containers consumed on use.
    #[must_use]
    pub fn empty_container_for(&self, filled: ItemStack) -> Option<ItemStack> {
        let index = *self.by_filled.get(&filled.item())?;
        let empty = self.entries[index].empty?;
        Some(ItemStack::new(empty, 1))
    }
}

impl Default for FluidContainerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for FluidContainerRegistry {
    fn freeze(&mut self) {
        self.allows_registering = false;
    }
}

/// Vanilla container mappings.
pub mod vanilla {
    use super::{ContainerEntry, FluidContainerRegistry};
    use crate::fluid::vanilla as fluids;
    use crate::fluid_stack::FluidStack;
    use crate::item::vanilla as items;

    /// Fluid held by one bucket or cell, in millibuckets.
    pub const BUCKET_VOLUME: i32 = 1000;

    /// Registers the vanilla container mappings.
    pub fn register_all(registry: &mut FluidContainerRegistry) {
        registry.register(ContainerEntry {
            payload: FluidStack::new(fluids::WATER, BUCKET_VOLUME),
            filled: items::WATER_BUCKET,
            empty: Some(items::BUCKET),
        });
        registry.register(ContainerEntry {
            payload: FluidStack::new(fluids::LAVA, BUCKET_VOLUME),
            filled: items::LAVA_BUCKET,
            empty: Some(items::BUCKET),
        });
        registry.register(ContainerEntry {
            payload: FluidStack::new(fluids::STEAM, BUCKET_VOLUME),
            filled: items::STEAM_CELL,
            empty: Some(items::PRESSURE_CELL),
        });
    }
}
