//! Vanilla fluid definitions.

use tankworks_utils::Identifier;

use super::{FluidEntry, FluidId, FluidRegistry};

/// Water (ID: 1).
pub const WATER: FluidId = FluidId(1);
/// Lava (ID: 2).
pub const LAVA: FluidId = FluidId(2);
/// Steam (ID: 3).
pub const STEAM: FluidId = FluidId(3);

/// Registers the vanilla fluids.
pub fn register_all(registry: &mut FluidRegistry) {
    registry.register(FluidEntry {
        id: WATER,
        key: Identifier::default_namespace("water"),
    });
    registry.register(FluidEntry {
        id: LAVA,
        key: Identifier::default_namespace("lava"),
    });
    registry.register(FluidEntry {
        id: STEAM,
        key: Identifier::default_namespace("steam"),
    });
}
