//! Identity and lookup tables for fluids, items and fluid container items.

use std::sync::LazyLock;

pub mod container;
pub mod fluid;
pub mod fluid_stack;
pub mod item;
pub mod item_stack;

pub use fluid_stack::FluidStack;
pub use item_stack::ItemStack;

use container::FluidContainerRegistry;
use fluid::FluidRegistry;
use item::ItemRegistry;

/// The global registry, bootstrapped with the vanilla entries and frozen.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::bootstrap);

/// Common behavior for registries that freeze after bootstrap.
pub trait RegistryExt {
    /// Disallows further registration.
    fn freeze(&mut self);
}

/// All registries bundled together.
pub struct Registry {
    /// Fluid definitions.
    pub fluids: FluidRegistry,
    /// Item definitions.
    pub items: ItemRegistry,
    /// Filled/empty fluid container item mappings.
    pub fluid_containers: FluidContainerRegistry,
}

impl Registry {
    fn bootstrap() -> Self {
        let mut fluids = FluidRegistry::new();
        fluid::vanilla::register_all(&mut fluids);
        fluids.freeze();

        let mut items = ItemRegistry::new();
        item::vanilla::register_all(&mut items);
        items.freeze();

        let mut fluid_containers = FluidContainerRegistry::new();
        container::vanilla::register_all(&mut fluid_containers);
        fluid_containers.freeze();

        Self {
            fluids,
            items,
            fluid_containers,
        }
    }
}
