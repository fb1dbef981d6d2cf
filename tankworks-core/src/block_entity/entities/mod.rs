//! Concrete block entity implementations.

pub mod tank_machine;

pub use tank_machine::TankMachineBlockEntity;
