//! Vanilla item definitions.

use tankworks_utils::Identifier;

use super::{ItemEntry, ItemId, ItemRegistry};

/// Empty bucket (ID: 1).
pub const BUCKET: ItemId = ItemId(1);
/// Bucket of water (ID: 2).
pub const WATER_BUCKET: ItemId = ItemId(2);
/// Bucket of lava (ID: 3).
pub const LAVA_BUCKET: ItemId = ItemId(3);
/// Empty pressure cell (ID: 4).
pub const PRESSURE_CELL: ItemId = ItemId(4);
/// Pressure cell charged with steam (ID: 5).
pub const STEAM_CELL: ItemId = ItemId(5);

/// Registers the vanilla items.
pub fn register_all(registry: &mut ItemRegistry) {
    let entries = [
        (BUCKET, "bucket", 16),
        (WATER_BUCKET, "water_bucket", 1),
        (LAVA_BUCKET, "lava_bucket", 1),
        (PRESSURE_CELL, "pressure_cell", 16),
        (STEAM_CELL, "steam_cell", 1),
    ];

    for (id, path, max_stack_size) in entries {
        registry.register(ItemEntry {
            id,
            key: Identifier::default_namespace(path),
            max_stack_size,
        });
    }
}
