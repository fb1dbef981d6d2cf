//! A minimal world: the block entity map and the item drop sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tankworks_registry::ItemStack;
use tankworks_utils::BlockPos;

use crate::block_entity::BlockEntity;

/// Holds the block entities and whatever items overflowed onto the ground.
///
/// All engine operations run synchronously on the owner's tick or in direct
/// response to a player action; the locks here exist for shared ownership
/// with the host, not for concurrent mutation.
#[derive(Default)]
pub struct World {
    block_entities: Mutex<FxHashMap<BlockPos, Arc<Mutex<dyn BlockEntity>>>>,
    dropped_items: Mutex<Vec<(BlockPos, ItemStack)>>,
    game_time: AtomicI64,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current game time, in ticks.
    #[must_use]
    pub fn game_time(&self) -> i64 {
        self.game_time.load(Ordering::Relaxed)
    }

    /// Places a block entity, replacing whatever occupied the position.
    pub fn set_block_entity(&self, pos: BlockPos, block_entity: Arc<Mutex<dyn BlockEntity>>) {
        self.block_entities.lock().insert(pos, block_entity);
    }

    /// Removes and returns the block entity at the given position.
    pub fn remove_block_entity(&self, pos: &BlockPos) -> Option<Arc<Mutex<dyn BlockEntity>>> {
        self.block_entities.lock().remove(pos)
    }

    /// Looks up the block entity at the given position.
    #[must_use]
    pub fn get_block_entity(&self, pos: &BlockPos) -> Option<Arc<Mutex<dyn BlockEntity>>> {
        self.block_entities.lock().get(pos).cloned()
    }

    /// Drops an item into the world at the given position.
    pub fn drop_item(&self, pos: BlockPos, item: ItemStack) {
        if item.is_empty() {
            return;
        }
        log::debug!("dropping {item:?} at {pos}");
        self.dropped_items.lock().push((pos, item));
    }

    /// Removes and returns everything dropped so far.
    #[must_use]
    pub fn take_dropped_items(&self) -> Vec<(BlockPos, ItemStack)> {
        std::mem::take(&mut self.dropped_items.lock())
    }

    /// Advances game time and ticks every ticking block entity.
    pub fn tick_all(&self) {
        self.game_time.fetch_add(1, Ordering::Relaxed);

        // Snapshot the entities first so a tick can look up its neighbors
        // without holding the map lock.
        let entities: Vec<Arc<Mutex<dyn BlockEntity>>> =
            self.block_entities.lock().values().cloned().collect();

        for entity in entities {
            let mut guard = entity.lock();
            if guard.is_ticking() {
                guard.tick(self);
            }
        }
    }
}
