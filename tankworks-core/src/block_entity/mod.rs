//! Block entities: stateful devices occupying a grid cell.

use std::any::Any;

use simdnbt::borrow::NbtCompound as NbtCompoundView;
use simdnbt::owned::NbtCompound;
use tankworks_utils::BlockPos;

use crate::fluid_handler::FluidHandler;
use crate::inventory::Container;
use crate::world::World;

pub mod entities;

/// A stateful device occupying one grid cell.
///
/// Capabilities (fluid handling, item slots, machine-ness) are exposed
/// through the accessor methods rather than downcasts, so callers depend
/// only on what a neighbor can do.
pub trait BlockEntity: Send + Sync {
    /// Upcast for host-side downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for host-side downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The position this entity occupies.
    fn pos(&self) -> BlockPos;

    /// Writes this entity's state into the given compound.
    fn save_additional(&self, nbt: &mut NbtCompound);

    /// Restores this entity's state from a compound written by
    /// [`Self::save_additional`].
    fn load_additional(&mut self, nbt: &NbtCompoundView<'_, '_>);

    /// Whether [`Self::tick`] should be invoked every world tick.
    fn is_ticking(&self) -> bool {
        false
    }

    /// Runs one simulation tick.
    fn tick(&mut self, _world: &World) {}

    /// Classification tag consulted by machine-only ejection.
    fn is_machine(&self) -> bool {
        false
    }

    /// The fluid handling capability, if this entity has one.
    fn as_fluid_handler(&self) -> Option<&dyn FluidHandler> {
        None
    }

    /// Mutable fluid handling capability, if this entity has one.
    fn as_fluid_handler_mut(&mut self) -> Option<&mut dyn FluidHandler> {
        None
    }

    /// The item slot capability, if this entity has one.
    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    /// Mutable item slot capability, if this entity has one.
    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        None
    }
}
