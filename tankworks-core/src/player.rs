//! The acting agent for container exchange.

use tankworks_registry::ItemStack;
use tankworks_utils::BlockPos;

use crate::inventory::PlayerInventory;
use crate::world::World;

/// A player interacting with a machine.
#[derive(Debug)]
pub struct Player {
    inventory: PlayerInventory,
    pos: BlockPos,
    infinite_materials: bool,
}

impl Player {
    /// Creates a player at the given position.
    #[must_use]
    pub fn new(pos: BlockPos) -> Self {
        Self {
            inventory: PlayerInventory::new(),
            pos,
            infinite_materials: false,
        }
    }

    /// Creates a privileged player whose container items are never consumed.
    #[must_use]
    pub fn with_infinite_materials(pos: BlockPos) -> Self {
        Self {
            inventory: PlayerInventory::new(),
            pos,
            infinite_materials: true,
        }
    }

    /// The player's position, used as the drop location for overflow items.
    #[must_use]
    pub const fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Whether this player's source/destination items are left untouched.
    #[must_use]
    pub const fn has_infinite_materials(&self) -> bool {
        self.infinite_materials
    }

    /// The player's inventory.
    #[must_use]
    pub const fn inventory(&self) -> &PlayerInventory {
        &self.inventory
    }

    /// Mutable access to the player's inventory.
    pub const fn inventory_mut(&mut self) -> &mut PlayerInventory {
        &mut self.inventory
    }

    /// Credits an item to the inventory, dropping it into the world at the
    /// player's position if no slot can take it.
    pub fn add_or_drop(&mut self, item: ItemStack, world: &World) {
        let mut remaining = item;
        if !self.inventory.add(&mut remaining) {
            world.drop_item(self.pos, remaining);
        }
    }
}
