//! Fluid identity and registry.

pub mod fluid;
pub mod registry;
pub mod vanilla;

pub use fluid::*;
pub use registry::*;
