//! The ordered set of tanks owned by one machine.

use tankworks_registry::FluidStack;
use tankworks_registry::fluid::FluidId;

use super::FluidTank;
use crate::fluid_handler::TankInfo;

/// An ordered, index-addressable set of tanks.
///
/// Indices are dense and stable for the machine's lifetime; they are the
/// persisted key. Fill and drain requests scan in index order and act on
/// the first tank that yields a non-zero result, never splitting one
/// request across tanks, even when a later tank could take the remainder.
///
/// Any committed mutation through the bank raises the changed flag, which
/// the owning machine consumes as its "force a sync" signal.
#[derive(Debug, Default)]
pub struct TankBank {
    tanks: Vec<FluidTank>,
    changed: bool,
}

impl TankBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tanks: Vec::new(),
            changed: false,
        }
    }

    /// Appends a tank, returning its index.
    pub fn add_tank(&mut self, tank: FluidTank) -> usize {
        self.tanks.push(tank);
        self.tanks.len() - 1
    }

    /// The number of tanks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    /// Returns true if the bank holds no tanks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    /// Bounds-checked tank accessor; an absent index is a normal outcome.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FluidTank> {
        self.tanks.get(index)
    }

    /// Mutable bounds-checked tank accessor.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut FluidTank> {
        self.tanks.get_mut(index)
    }

    /// Iterates the tanks in index order.
    pub fn iter(&self) -> impl Iterator<Item = &FluidTank> {
        self.tanks.iter()
    }

    /// Fills into the first tank that accepts any non-zero amount.
    pub fn fill(&mut self, resource: FluidStack, commit: bool) -> i32 {
        for tank in &mut self.tanks {
            let filled = tank.fill_mapped(resource, commit);
            if filled > 0 {
                if commit {
                    self.changed = true;
                }
                return filled;
            }
        }
        0
    }

    /// Drains from the first tank that yields a non-zero amount.
    pub fn drain(&mut self, max_drain: i32, commit: bool) -> Option<FluidStack> {
        for tank in &mut self.tanks {
            if let Some(removed) = tank.drain_mapped(max_drain, commit)
                && removed.amount > 0
            {
                if commit {
                    self.changed = true;
                }
                return Some(removed);
            }
        }
        None
    }

    /// Drains a specific fluid from the first tank that yields it.
    pub fn drain_stack(&mut self, resource: FluidStack, commit: bool) -> Option<FluidStack> {
        for tank in &mut self.tanks {
            if let Some(removed) = tank.drain_stack_mapped(resource, commit)
                && removed.amount > 0
            {
                if commit {
                    self.changed = true;
                }
                return Some(removed);
            }
        }
        None
    }

    /// Returns true if any tank's accept map admits the fluid.
    #[must_use]
    pub fn can_fill(&self, fluid: FluidId) -> bool {
        self.tanks.iter().any(|tank| tank.can_accept(fluid))
    }

    /// Returns true if any tank's eject map admits the fluid.
    #[must_use]
    pub fn can_drain(&self, fluid: FluidId) -> bool {
        self.tanks.iter().any(|tank| tank.can_eject(fluid))
    }

    /// Snapshots of all tanks, in index order.
    #[must_use]
    pub fn infos(&self) -> Vec<TankInfo> {
        self.tanks.iter().map(FluidTank::info).collect()
    }

    /// Raises the changed flag; used when a tank is mutated through
    /// [`Self::get_mut`] rather than a bank scan.
    pub fn set_changed(&mut self) {
        self.changed = true;
    }

    /// Returns whether a committed mutation happened since the last clear.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Clears the changed flag.
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }
}
