//! Fluid handling capability exposed by devices.

use tankworks_registry::FluidStack;
use tankworks_registry::fluid::FluidId;
use tankworks_utils::Direction;

/// Read-only snapshot of one tank, for gauges and sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankInfo {
    /// The tank's capacity.
    pub capacity: i32,
    /// What the tank currently holds, if anything.
    pub contents: Option<FluidStack>,
}

/// A trait for devices that can receive and yield fluid through their sides.
///
/// Every operation takes the side the request arrives from. Simulated calls
/// (`commit == false`) report what would happen without mutating anything.
pub trait FluidHandler: Send + Sync {
    /// Fills fluid into the device.
    ///
    /// Returns the amount actually (or, simulated, would-be) accepted.
    fn fill(&mut self, from: Direction, resource: FluidStack, commit: bool) -> i32;

    /// Drains up to `max_drain` of whatever fluid the device yields first.
    fn drain(&mut self, from: Direction, max_drain: i32, commit: bool) -> Option<FluidStack>;

    /// Drains a specific fluid type and amount.
    fn drain_stack(&mut self, from: Direction, resource: FluidStack, commit: bool)
    -> Option<FluidStack>;

    /// Returns true if any tank could ever admit the given fluid from this side.
    fn can_fill(&self, from: Direction, fluid: FluidId) -> bool;

    /// Returns true if any tank could ever yield the given fluid to this side.
    fn can_drain(&self, from: Direction, fluid: FluidId) -> bool;

    /// Snapshots of all tanks, in index order.
    fn tank_info(&self, from: Direction) -> Vec<TankInfo>;
}
