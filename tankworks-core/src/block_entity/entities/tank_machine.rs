//! Tank machine block entity implementation.

use std::any::Any;

use simdnbt::borrow::NbtCompound as NbtCompoundView;
use simdnbt::owned::{NbtCompound, NbtList};
use tankworks_registry::fluid::FluidId;
use tankworks_registry::{FluidStack, ItemStack, REGISTRY};
use tankworks_utils::{BlockPos, Direction};

use crate::block_entity::BlockEntity;
use crate::config::{LayoutError, MachineLayout};
use crate::eject_mode::EjectMode;
use crate::fluid_handler::{FluidHandler, TankInfo};
use crate::inventory::Container;
use crate::player::Player;
use crate::tank::{FluidTank, TankBank};
use crate::world::World;

/// A machine owning an ordered set of fluid tanks.
///
/// Exchanges fluid with container items in a player's inventory, with its
/// own item slots, and with neighboring devices through directional
/// auto-ejection gated by [`EjectMode`].
pub struct TankMachineBlockEntity {
    pos: BlockPos,
    tanks: TankBank,
    items: Vec<ItemStack>,
    eject_mode: EjectMode,
    /// Per-attempt drain cap for auto-ejection; 0 means whole-tank.
    eject_per_tick: i32,
    changed: bool,
    sync_pending: bool,
}

impl TankMachineBlockEntity {
    /// Creates a machine with no tanks or item slots.
    #[must_use]
    pub fn new(pos: BlockPos) -> Self {
        Self {
            pos,
            tanks: TankBank::new(),
            items: Vec::new(),
            eject_mode: EjectMode::Machine,
            eject_per_tick: 0,
            changed: false,
            sync_pending: false,
        }
    }

    /// Creates a machine from a validated layout.
    pub fn from_layout(pos: BlockPos, layout: &MachineLayout) -> Result<Self, LayoutError> {
        let mut machine = Self::new(pos);
        for tank in layout.build_tanks()? {
            machine.add_tank(tank);
        }
        for _ in 0..layout.slots {
            machine.add_slot();
        }
        machine.eject_per_tick = layout.eject_per_tick;
        Ok(machine)
    }

    /// Adds a tank, returning its index.
    ///
    /// Indices are append-only and stable; they are the persisted key.
    pub fn add_tank(&mut self, tank: FluidTank) -> usize {
        self.tanks.add_tank(tank)
    }

    /// Adds an item slot, returning its index.
    pub fn add_slot(&mut self) -> usize {
        self.items.push(ItemStack::empty());
        self.items.len() - 1
    }

    /// The machine's tanks.
    #[must_use]
    pub const fn tanks(&self) -> &TankBank {
        &self.tanks
    }

    /// The current ejection mode.
    #[must_use]
    pub const fn eject_mode(&self) -> EjectMode {
        self.eject_mode
    }

    /// Advances the ejection mode; triggered by an explicit user action.
    pub fn cycle_eject_mode(&mut self) {
        self.eject_mode = self.eject_mode.cycle();
        log::debug!(
            "machine at {} eject mode now {}",
            self.pos,
            self.eject_mode.display_name()
        );
        self.mark_changed();
    }

    /// Whether a committed mutation is waiting to be synced to watchers.
    #[must_use]
    pub const fn needs_sync(&self) -> bool {
        self.sync_pending
    }

    /// Acknowledges a pending sync.
    pub const fn clear_sync(&mut self) {
        self.sync_pending = false;
    }

    /// Whether this entity needs saving.
    #[must_use]
    pub const fn has_changed(&self) -> bool {
        self.changed
    }

    fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Flags that watchers must be resynchronized.
    fn force_sync(&mut self) {
        self.sync_pending = true;
        self.mark_changed();
    }

    /// Translates the bank's changed flag into a sync request.
    fn sync_if_changed(&mut self) {
        if self.tanks.has_changed() {
            self.tanks.clear_changed();
            self.force_sync();
        }
    }

    /// Exchanges fluid between the container item in the player's `slot`
    /// and this machine's tanks.
    ///
    /// Returns false if the slot holds nothing recognizable or no tank
    /// participates.
    pub fn bucket(&mut self, player: &mut Player, slot: usize, world: &World) -> bool {
        if slot >= player.inventory().size() {
            return false;
        }
        let container = *player.inventory().get_item(slot);
        if container.is_empty() {
            return false;
        }

        if REGISTRY.fluid_containers.is_filled_container(container) {
            self.fill_from_container(player, slot, world)
        } else if REGISTRY.fluid_containers.is_empty_container(container) {
            self.empty_into_container(player, slot, world)
        } else {
            false
        }
    }

    /// Drains a filled container item into the tanks.
    fn fill_from_container(&mut self, player: &mut Player, slot: usize, world: &World) -> bool {
        let container = *player.inventory().get_item(slot);
        let Some(payload) = REGISTRY.fluid_containers.fluid_for_filled_item(container) else {
            return false;
        };

        // All-or-nothing: the item represents exactly its payload, so a
        // partial acceptance would strand the remainder.
        if self.tanks.fill(payload, false) != payload.amount {
            return false;
        }
        self.tanks.fill(payload, true);
        self.sync_if_changed();

        if player.has_infinite_materials() {
            return true;
        }

        let residual = REGISTRY.fluid_containers.empty_container_for(container);
        player.inventory_mut().remove_item(slot, 1);
        if let Some(residual) = residual {
            player.add_or_drop(residual, world);
        }
        player.inventory_mut().set_changed();
        true
    }

    /// Fills an empty container item from the first tank that can cover it.
    fn empty_into_container(&mut self, player: &mut Player, slot: usize, world: &World) -> bool {
        let empty_stack = *player.inventory().get_item(slot);

        for index in 0..self.tanks.len() {
            let Some(tank) = self.tanks.get(index) else {
                continue;
            };
            let Some(contents) = tank.contents() else {
                continue;
            };
            let Some(filled) = REGISTRY.fluid_containers.fill_container(contents, empty_stack)
            else {
                continue;
            };
            let capacity = REGISTRY.fluid_containers.container_capacity(contents, filled);
            if !tank.can_drain_mapped(capacity) {
                continue;
            }

            let Some(tank) = self.tanks.get_mut(index) else {
                continue;
            };
            let _ = tank.drain_mapped(capacity, true);
            self.tanks.set_changed();
            self.sync_if_changed();

            if player.has_infinite_materials() {
                return true;
            }

            player.inventory_mut().remove_item(slot, 1);
            player.add_or_drop(filled, world);
            player.inventory_mut().set_changed();
            return true;
        }
        false
    }

    /// Offers fluid from one tank to the neighbor on the given side.
    ///
    /// Two-phase: a simulated mapped drain establishes the offer, the
    /// neighbor's committed fill reports what it took, and exactly that
    /// amount is then drained for real, so no fluid is created or lost
    /// even when the neighbor accepts less than offered.
    ///
    /// Returns true iff the eligibility gate passed and an offer existed,
    /// independent of how much the neighbor accepted.
    pub fn eject_fluid(
        &mut self,
        side: Direction,
        tank_index: usize,
        max_drain: i32,
        world: &World,
    ) -> bool {
        if self.eject_mode == EjectMode::Off {
            return false;
        }
        let Some(tank) = self.tanks.get(tank_index) else {
            return false;
        };
        if tank.contents().is_none() {
            return false;
        }

        let neighbor_pos = side.relative(self.pos);
        let Some(neighbor) = world.get_block_entity(&neighbor_pos) else {
            return false;
        };
        let mut neighbor = neighbor.lock();

        if self.eject_mode != EjectMode::All && !neighbor.is_machine() {
            return false;
        }
        let Some(handler) = neighbor.as_fluid_handler_mut() else {
            return false;
        };

        let Some(tank) = self.tanks.get_mut(tank_index) else {
            return false;
        };
        let Some(offer) = tank.drain_mapped(max_drain, false) else {
            return false;
        };

        let accepted = handler.fill(side.opposite(), offer, true);
        if accepted > 0 {
            let _ = tank.drain(accepted, true);
            self.tanks.set_changed();
        }
        self.sync_if_changed();
        true
    }

    /// Attempts [`Self::eject_fluid`] on every side for one tank.
    pub fn eject_all_sides(&mut self, tank_index: usize, world: &World) -> bool {
        let Some(tank) = self.tanks.get(tank_index) else {
            return false;
        };
        let max_drain = if self.eject_per_tick > 0 {
            self.eject_per_tick
        } else {
            tank.capacity()
        };

        let mut acted = false;
        for side in Direction::ALL {
            acted |= self.eject_fluid(side, tank_index, max_drain, world);
        }
        acted
    }

    /// Attempts ejection for every tank on every side.
    pub fn eject_all(&mut self, world: &World) -> bool {
        let mut acted = false;
        for index in 0..self.tanks.len() {
            acted |= self.eject_all_sides(index, world);
        }
        acted
    }

    /// Drains the filled container in `full_slot` into a tank, crediting
    /// the residual empty container to `empty_slot`.
    ///
    /// All-or-nothing on both the fluid and the residual item.
    pub fn fill_tank_from_slot(
        &mut self,
        full_slot: usize,
        empty_slot: usize,
        tank_index: usize,
    ) -> bool {
        let Some(&full_stack) = self.items.get(full_slot) else {
            return false;
        };
        if full_stack.is_empty() || empty_slot >= self.items.len() {
            return false;
        }
        let Some(contents) = REGISTRY.fluid_containers.fluid_for_filled_item(full_stack) else {
            return false;
        };
        let residual = REGISTRY.fluid_containers.empty_container_for(full_stack);

        {
            let Some(tank) = self.tanks.get_mut(tank_index) else {
                return false;
            };
            if !tank.can_fill_all(contents) {
                return false;
            }
        }
        if let Some(residual) = residual
            && !Self::can_add_stack(&self.items, empty_slot, residual)
        {
            return false;
        }

        let Some(tank) = self.tanks.get_mut(tank_index) else {
            return false;
        };
        let _ = tank.fill_mapped(contents, true);
        self.tanks.set_changed();

        if let Some(residual) = residual {
            Self::add_stack(&mut self.items, empty_slot, residual);
        }
        self.items[full_slot].shrink(1);
        self.mark_changed();
        self.sync_if_changed();
        true
    }

    /// Fills the empty container in `empty_slot` from a tank, crediting
    /// the filled item to `full_slot`.
    pub fn empty_tank_into_slot(
        &mut self,
        empty_slot: usize,
        full_slot: usize,
        tank_index: usize,
    ) -> bool {
        let Some(&empty_stack) = self.items.get(empty_slot) else {
            return false;
        };
        if empty_stack.is_empty() || full_slot >= self.items.len() {
            return false;
        }
        let Some(tank) = self.tanks.get(tank_index) else {
            return false;
        };
        let Some(contents) = tank.contents() else {
            return false;
        };
        let Some(filled) = REGISTRY.fluid_containers.fill_container(contents, empty_stack) else {
            return false;
        };
        let capacity = REGISTRY.fluid_containers.container_capacity(contents, filled);

        if !tank.can_drain_mapped(capacity) || !Self::can_add_stack(&self.items, full_slot, filled)
        {
            return false;
        }

        Self::add_stack(&mut self.items, full_slot, filled);
        let Some(tank) = self.tanks.get_mut(tank_index) else {
            return false;
        };
        let _ = tank.drain_mapped(capacity, true);
        self.tanks.set_changed();
        self.items[empty_slot].shrink(1);
        self.mark_changed();
        self.sync_if_changed();
        true
    }

    fn can_add_stack(items: &[ItemStack], slot: usize, stack: ItemStack) -> bool {
        match items.get(slot) {
            None => false,
            Some(existing) if existing.is_empty() => true,
            Some(existing) => {
                existing.is_same_item(stack)
                    && existing.count() + stack.count() <= existing.max_stack_size()
            }
        }
    }

    fn add_stack(items: &mut [ItemStack], slot: usize, stack: ItemStack) {
        let existing = &mut items[slot];
        if existing.is_empty() {
            *existing = stack;
        } else {
            existing.grow(stack.count());
        }
    }
}

impl FluidHandler for TankMachineBlockEntity {
    fn fill(&mut self, _from: Direction, resource: FluidStack, commit: bool) -> i32 {
        let filled = self.tanks.fill(resource, commit);
        self.sync_if_changed();
        filled
    }

    fn drain(&mut self, _from: Direction, max_drain: i32, commit: bool) -> Option<FluidStack> {
        let removed = self.tanks.drain(max_drain, commit);
        self.sync_if_changed();
        removed
    }

    fn drain_stack(
        &mut self,
        _from: Direction,
        resource: FluidStack,
        commit: bool,
    ) -> Option<FluidStack> {
        let removed = self.tanks.drain_stack(resource, commit);
        self.sync_if_changed();
        removed
    }

    fn can_fill(&self, _from: Direction, fluid: FluidId) -> bool {
        self.tanks.can_fill(fluid)
    }

    fn can_drain(&self, _from: Direction, fluid: FluidId) -> bool {
        self.tanks.can_drain(fluid)
    }

    fn tank_info(&self, _from: Direction) -> Vec<TankInfo> {
        self.tanks.infos()
    }
}

impl BlockEntity for TankMachineBlockEntity {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn pos(&self) -> BlockPos {
        self.pos
    }

    fn save_additional(&self, nbt: &mut NbtCompound) {
        let mut tank_list: Vec<NbtCompound> = Vec::new();
        for (index, tank) in self.tanks.iter().enumerate() {
            let mut tag = NbtCompound::new();
            tag.insert("tank", index as i8);
            tank.save(&mut tag);
            tank_list.push(tag);
        }
        nbt.insert("Tanks", NbtList::Compound(tank_list));

        nbt.insert("EjectMode", self.eject_mode.ordinal());
    }

    fn load_additional(&mut self, nbt: &NbtCompoundView<'_, '_>) {
        if let Some(tank_list) = nbt.list("Tanks")
            && let Some(compounds) = tank_list.compounds()
        {
            for compound in compounds {
                // Records for indices this machine doesn't have are skipped.
                if let Some(index) = compound.byte("tank") {
                    let index = index as usize;
                    if let Some(tank) = self.tanks.get_mut(index) {
                        tank.load(&compound);
                    }
                }
            }
        }

        self.eject_mode = EjectMode::from_ordinal(nbt.int("EjectMode").unwrap_or(1));
    }

    fn is_ticking(&self) -> bool {
        true
    }

    fn tick(&mut self, world: &World) {
        if self.eject_mode != EjectMode::Off {
            self.eject_all(world);
        }
    }

    fn is_machine(&self) -> bool {
        true
    }

    fn as_fluid_handler(&self) -> Option<&dyn FluidHandler> {
        Some(self)
    }

    fn as_fluid_handler_mut(&mut self) -> Option<&mut dyn FluidHandler> {
        Some(self)
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }
}

impl Container for TankMachineBlockEntity {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn get_item(&self, slot: usize) -> &ItemStack {
        &self.items[slot]
    }

    fn get_item_mut(&mut self, slot: usize) -> &mut ItemStack {
        &mut self.items[slot]
    }

    fn set_item(&mut self, slot: usize, item: ItemStack) {
        self.items[slot] = item;
        self.mark_changed();
    }

    fn set_changed(&mut self) {
        self.mark_changed();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tankworks_registry::fluid::vanilla::{LAVA, WATER};
    use tankworks_registry::item::vanilla::{BUCKET, LAVA_BUCKET, WATER_BUCKET};

    use super::*;
    use crate::persist::{load_block_entity, save_block_entity};

    /// A non-machine fluid handler, standing in for a pipe or passive tank.
    struct PipeBlockEntity {
        pos: BlockPos,
        tank: FluidTank,
    }

    impl PipeBlockEntity {
        fn new(pos: BlockPos, capacity: i32) -> Self {
            Self {
                pos,
                tank: FluidTank::new(capacity),
            }
        }
    }

    impl BlockEntity for PipeBlockEntity {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn pos(&self) -> BlockPos {
            self.pos
        }

        fn save_additional(&self, _nbt: &mut NbtCompound) {}

        fn load_additional(&mut self, _nbt: &NbtCompoundView<'_, '_>) {}

        fn as_fluid_handler(&self) -> Option<&dyn FluidHandler> {
            Some(self)
        }

        fn as_fluid_handler_mut(&mut self) -> Option<&mut dyn FluidHandler> {
            Some(self)
        }
    }

    impl FluidHandler for PipeBlockEntity {
        fn fill(&mut self, _from: Direction, resource: FluidStack, commit: bool) -> i32 {
            self.tank.fill_mapped(resource, commit)
        }

        fn drain(&mut self, _from: Direction, max_drain: i32, commit: bool) -> Option<FluidStack> {
            self.tank.drain_mapped(max_drain, commit)
        }

        fn drain_stack(
            &mut self,
            _from: Direction,
            resource: FluidStack,
            commit: bool,
        ) -> Option<FluidStack> {
            self.tank.drain_stack_mapped(resource, commit)
        }

        fn can_fill(&self, _from: Direction, fluid: FluidId) -> bool {
            self.tank.can_accept(fluid)
        }

        fn can_drain(&self, _from: Direction, fluid: FluidId) -> bool {
            self.tank.can_eject(fluid)
        }

        fn tank_info(&self, _from: Direction) -> Vec<TankInfo> {
            vec![self.tank.info()]
        }
    }

    const ORIGIN: BlockPos = BlockPos::new(0, 64, 0);

    fn set_mode(machine: &mut TankMachineBlockEntity, mode: EjectMode) {
        while machine.eject_mode() != mode {
            machine.cycle_eject_mode();
        }
    }

    fn two_tank_machine() -> TankMachineBlockEntity {
        let mut machine = TankMachineBlockEntity::new(ORIGIN);
        machine.add_tank(FluidTank::new(1000));
        machine.add_tank(FluidTank::new(1000));
        machine
    }

    fn tank_amount(machine: &TankMachineBlockEntity, index: usize) -> i32 {
        machine.tanks().get(index).map_or(0, FluidTank::amount)
    }

    #[test]
    fn test_bucket_fill_consumes_container() {
        let world = World::new();
        let mut machine = two_tank_machine();
        let mut player = Player::new(ORIGIN);
        player.inventory_mut().set_item(0, ItemStack::new(WATER_BUCKET, 1));

        assert!(machine.bucket(&mut player, 0, &world));
        assert_eq!(
            machine.tanks().get(0).and_then(FluidTank::contents),
            Some(FluidStack::new(WATER, 1000))
        );
        assert_eq!(*player.inventory().get_item(0), ItemStack::new(BUCKET, 1));
        assert!(machine.needs_sync());
        assert!(world.take_dropped_items().is_empty());
    }

    #[test]
    fn test_bucket_fill_is_all_or_nothing_never_split() {
        let world = World::new();
        let mut machine = two_tank_machine();
        // Tank 0 has 400 of space left; tank 1 is empty. The bucket's
        // payload would be offered to tank 0 only, so it must be refused
        // outright rather than split.
        machine.tanks.fill(FluidStack::new(WATER, 600), true);
        machine.tanks.clear_changed();

        let mut player = Player::new(ORIGIN);
        player.inventory_mut().set_item(0, ItemStack::new(WATER_BUCKET, 1));

        assert!(!machine.bucket(&mut player, 0, &world));
        assert_eq!(tank_amount(&machine, 0), 600);
        assert_eq!(tank_amount(&machine, 1), 0);
        assert_eq!(
            *player.inventory().get_item(0),
            ItemStack::new(WATER_BUCKET, 1)
        );
        assert!(!machine.needs_sync());
    }

    #[test]
    fn test_bucket_fill_privileged_keeps_item() {
        let world = World::new();
        let mut machine = two_tank_machine();
        let mut player = Player::with_infinite_materials(ORIGIN);
        player.inventory_mut().set_item(0, ItemStack::new(LAVA_BUCKET, 1));

        assert!(machine.bucket(&mut player, 0, &world));
        assert_eq!(
            machine.tanks().get(0).and_then(FluidTank::contents),
            Some(FluidStack::new(LAVA, 1000))
        );
        assert_eq!(
            *player.inventory().get_item(0),
            ItemStack::new(LAVA_BUCKET, 1)
        );
    }

    #[test]
    fn test_bucket_empty_fills_container_from_first_tank() {
        let world = World::new();
        let mut machine = TankMachineBlockEntity::new(ORIGIN);
        machine.add_tank(FluidTank::new(2000));
        machine.tanks.fill(FluidStack::new(WATER, 1500), true);
        machine.tanks.clear_changed();

        let mut player = Player::new(ORIGIN);
        player.inventory_mut().set_item(0, ItemStack::new(BUCKET, 1));

        assert!(machine.bucket(&mut player, 0, &world));
        assert_eq!(tank_amount(&machine, 0), 500);
        assert_eq!(
            *player.inventory().get_item(0),
            ItemStack::new(WATER_BUCKET, 1)
        );
        assert!(machine.needs_sync());
    }

    #[test]
    fn test_bucket_empty_requires_full_container_payload() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 400), true);

        let mut player = Player::new(ORIGIN);
        player.inventory_mut().set_item(0, ItemStack::new(BUCKET, 1));

        assert!(!machine.bucket(&mut player, 0, &world));
        assert_eq!(tank_amount(&machine, 0), 400);
        assert_eq!(*player.inventory().get_item(0), ItemStack::new(BUCKET, 1));
    }

    #[test]
    fn test_bucket_empty_drops_result_when_inventory_full() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 1000), true);

        let player_pos = BlockPos::new(7, 70, -3);
        let mut player = Player::new(player_pos);
        player.inventory_mut().set_item(0, ItemStack::new(BUCKET, 16));
        for slot in 1..player.inventory().size() {
            player
                .inventory_mut()
                .set_item(slot, ItemStack::new(LAVA_BUCKET, 1));
        }

        assert!(machine.bucket(&mut player, 0, &world));
        assert_eq!(tank_amount(&machine, 0), 0);
        assert_eq!(*player.inventory().get_item(0), ItemStack::new(BUCKET, 15));
        assert_eq!(
            world.take_dropped_items(),
            vec![(player_pos, ItemStack::new(WATER_BUCKET, 1))]
        );
    }

    #[test]
    fn test_bucket_rejects_unusable_slots() {
        let world = World::new();
        let mut machine = two_tank_machine();
        let mut player = Player::new(ORIGIN);

        // Empty slot, and a slot index past the inventory.
        assert!(!machine.bucket(&mut player, 0, &world));
        assert!(!machine.bucket(&mut player, 9999, &world));
    }

    #[test]
    fn test_eject_conserves_on_partial_acceptance() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 1000), true);
        machine.tanks.clear_changed();
        set_mode(&mut machine, EjectMode::All);

        let pipe_pos = Direction::East.relative(ORIGIN);
        world.set_block_entity(
            pipe_pos,
            Arc::new(Mutex::new(PipeBlockEntity::new(pipe_pos, 300))),
        );

        assert!(machine.eject_fluid(Direction::East, 0, 1000, &world));
        assert_eq!(tank_amount(&machine, 0), 700);
        assert!(machine.needs_sync());

        let pipe = world.get_block_entity(&pipe_pos).expect("pipe");
        let guard = pipe.lock();
        let infos = guard.as_fluid_handler().expect("handler").tank_info(Direction::West);
        assert_eq!(infos[0].contents, Some(FluidStack::new(WATER, 300)));
    }

    #[test]
    fn test_eject_reports_acted_when_neighbor_accepts_nothing() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 1000), true);
        machine.tanks.clear_changed();
        set_mode(&mut machine, EjectMode::All);

        let pipe_pos = Direction::Up.relative(ORIGIN);
        let mut pipe = PipeBlockEntity::new(pipe_pos, 300);
        pipe.tank.fill(FluidStack::new(WATER, 300), true);
        world.set_block_entity(pipe_pos, Arc::new(Mutex::new(pipe)));

        // The eligibility gate passed and an offer existed, so this is an
        // "eject attempt occurred" even though nothing moved.
        assert!(machine.eject_fluid(Direction::Up, 0, 1000, &world));
        assert_eq!(tank_amount(&machine, 0), 1000);
        assert!(!machine.needs_sync());
    }

    #[test]
    fn test_eject_machine_only_skips_non_machine() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 1000), true);
        assert_eq!(machine.eject_mode(), EjectMode::Machine);

        let pipe_pos = Direction::North.relative(ORIGIN);
        world.set_block_entity(
            pipe_pos,
            Arc::new(Mutex::new(PipeBlockEntity::new(pipe_pos, 1000))),
        );

        // A non-machine neighbor fails the gate before anything is offered.
        assert!(!machine.eject_fluid(Direction::North, 0, 1000, &world));
        assert_eq!(tank_amount(&machine, 0), 1000);

        // The same neighbor is eligible once the mode allows everyone.
        set_mode(&mut machine, EjectMode::All);
        assert!(machine.eject_fluid(Direction::North, 0, 1000, &world));
        assert_eq!(tank_amount(&machine, 0), 0);
    }

    #[test]
    fn test_eject_machine_only_reaches_machines() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 800), true);

        let other_pos = Direction::South.relative(ORIGIN);
        let mut other = TankMachineBlockEntity::new(other_pos);
        other.add_tank(FluidTank::new(500));
        world.set_block_entity(other_pos, Arc::new(Mutex::new(other)));

        assert!(machine.eject_fluid(Direction::South, 0, 800, &world));
        assert_eq!(tank_amount(&machine, 0), 300);

        let other = world.get_block_entity(&other_pos).expect("machine");
        let guard = other.lock();
        let other = guard
            .as_any()
            .downcast_ref::<TankMachineBlockEntity>()
            .expect("tank machine");
        assert_eq!(tank_amount(other, 0), 500);
    }

    #[test]
    fn test_eject_off_does_nothing() {
        let world = World::new();
        let mut machine = two_tank_machine();
        machine.tanks.fill(FluidStack::new(WATER, 1000), true);
        set_mode(&mut machine, EjectMode::Off);

        let other_pos = Direction::West.relative(ORIGIN);
        let mut other = TankMachineBlockEntity::new(other_pos);
        other.add_tank(FluidTank::new(1000));
        world.set_block_entity(other_pos, Arc::new(Mutex::new(other)));

        assert!(!machine.eject_fluid(Direction::West, 0, 1000, &world));
        assert!(!machine.eject_all(&world));
        assert_eq!(tank_amount(&machine, 0), 1000);
    }

    #[test]
    fn test_eject_needs_fluid_and_a_neighbor() {
        let world = World::new();
        let mut machine = two_tank_machine();
        set_mode(&mut machine, EjectMode::All);

        // Empty tank.
        assert!(!machine.eject_fluid(Direction::Up, 0, 1000, &world));
        // Out-of-range tank index.
        machine.tanks.fill(FluidStack::new(WATER, 100), true);
        assert!(!machine.eject_fluid(Direction::Up, 99, 1000, &world));
        // No neighbor on that side.
        assert!(!machine.eject_fluid(Direction::Up, 0, 1000, &world));

        // A removed neighbor no longer counts.
        let pipe_pos = Direction::Up.relative(ORIGIN);
        world.set_block_entity(
            pipe_pos,
            Arc::new(Mutex::new(PipeBlockEntity::new(pipe_pos, 1000))),
        );
        let _ = world.remove_block_entity(&pipe_pos);
        assert!(!machine.eject_fluid(Direction::Up, 0, 1000, &world));
    }

    #[test]
    fn test_tick_ejects_into_neighbor_machine() {
        let world = World::new();

        let mut source = TankMachineBlockEntity::new(ORIGIN);
        source.add_tank(FluidTank::new(1000));
        source.tanks.fill(FluidStack::new(WATER, 400), true);
        source.tanks.clear_changed();
        world.set_block_entity(ORIGIN, Arc::new(Mutex::new(source)));

        let sink_pos = Direction::Up.relative(ORIGIN);
        let mut sink = TankMachineBlockEntity::new(sink_pos);
        // The sink never ejects back, so the transfer settles.
        sink.add_tank(FluidTank::new(1000).eject_only([]));
        world.set_block_entity(sink_pos, Arc::new(Mutex::new(sink)));

        world.tick_all();
        assert_eq!(world.game_time(), 1);

        let source = world.get_block_entity(&ORIGIN).expect("source");
        let guard = source.lock();
        let source = guard
            .as_any()
            .downcast_ref::<TankMachineBlockEntity>()
            .expect("tank machine");
        assert_eq!(tank_amount(source, 0), 0);
        drop(guard);

        let sink = world.get_block_entity(&sink_pos).expect("sink");
        let guard = sink.lock();
        let sink = guard
            .as_any()
            .downcast_ref::<TankMachineBlockEntity>()
            .expect("tank machine");
        assert_eq!(
            sink.tanks().get(0).and_then(FluidTank::contents),
            Some(FluidStack::new(WATER, 400))
        );
    }

    #[test]
    fn test_fluid_handler_surface() {
        let mut machine = two_tank_machine();
        machine.add_tank(FluidTank::new(500).accept_only([LAVA]));

        assert!(FluidHandler::can_fill(&machine, Direction::Up, LAVA));
        assert!(FluidHandler::can_drain(&machine, Direction::Up, WATER));

        let filled = FluidHandler::fill(&mut machine, Direction::Up, FluidStack::new(WATER, 250), true);
        assert_eq!(filled, 250);
        assert!(machine.needs_sync());
        machine.clear_sync();

        let removed =
            FluidHandler::drain_stack(&mut machine, Direction::Up, FluidStack::new(WATER, 100), true);
        assert_eq!(removed, Some(FluidStack::new(WATER, 100)));
        let removed = FluidHandler::drain(&mut machine, Direction::Up, 1000, true);
        assert_eq!(removed, Some(FluidStack::new(WATER, 150)));
        assert!(machine.needs_sync());

        let infos = FluidHandler::tank_info(&machine, Direction::Up);
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[2].capacity, 500);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let mut machine = TankMachineBlockEntity::new(ORIGIN);
        machine.add_tank(FluidTank::new(1000));
        machine.add_tank(FluidTank::new(1000));
        machine.add_tank(FluidTank::new(2000));
        machine.tanks.fill(FluidStack::new(WATER, 400), true);
        machine
            .tanks
            .get_mut(2)
            .expect("tank 2")
            .fill(FluidStack::new(LAVA, 123), true);
        set_mode(&mut machine, EjectMode::All);

        let bytes = save_block_entity(&machine);

        let mut restored = TankMachineBlockEntity::new(ORIGIN);
        restored.add_tank(FluidTank::new(1000));
        restored.add_tank(FluidTank::new(1000));
        restored.add_tank(FluidTank::new(2000));
        load_block_entity(&mut restored, &bytes).expect("valid bytes");

        assert_eq!(restored.tanks().infos(), machine.tanks().infos());
        assert_eq!(restored.eject_mode(), EjectMode::All);
    }

    #[test]
    fn test_persistence_roundtrip_with_zero_tanks() {
        let machine = TankMachineBlockEntity::new(ORIGIN);
        let bytes = save_block_entity(&machine);

        let mut restored = TankMachineBlockEntity::new(ORIGIN);
        load_block_entity(&mut restored, &bytes).expect("valid bytes");
        assert!(restored.tanks().is_empty());
        assert_eq!(restored.eject_mode(), EjectMode::Machine);
    }

    #[test]
    fn test_load_skips_unknown_tank_indices() {
        let mut machine = two_tank_machine();
        machine
            .tanks
            .get_mut(1)
            .expect("tank 1")
            .fill(FluidStack::new(LAVA, 600), true);
        let bytes = save_block_entity(&machine);

        // The restored machine only has tank 0; the record for index 1 is
        // silently ignored.
        let mut restored = TankMachineBlockEntity::new(ORIGIN);
        restored.add_tank(FluidTank::new(1000));
        load_block_entity(&mut restored, &bytes).expect("valid bytes");

        assert_eq!(restored.tanks().len(), 1);
        assert_eq!(restored.tanks().get(0).and_then(FluidTank::contents), None);
    }

    #[test]
    fn test_load_rejects_garbage_bytes() {
        let mut machine = two_tank_machine();
        assert!(load_block_entity(&mut machine, &[0xff, 0x00, 0x13]).is_err());
    }

    #[test]
    fn test_slot_transfers_roundtrip() {
        let mut machine = TankMachineBlockEntity::new(ORIGIN);
        machine.add_tank(FluidTank::new(2000));
        machine.add_slot();
        machine.add_slot();
        machine.set_item(0, ItemStack::new(WATER_BUCKET, 1));

        assert!(machine.fill_tank_from_slot(0, 1, 0));
        assert_eq!(tank_amount(&machine, 0), 1000);
        assert!(machine.get_item(0).is_empty());
        assert_eq!(*machine.get_item(1), ItemStack::new(BUCKET, 1));

        // Source slot is empty now.
        assert!(!machine.fill_tank_from_slot(0, 1, 0));

        assert!(machine.empty_tank_into_slot(1, 0, 0));
        assert_eq!(tank_amount(&machine, 0), 0);
        assert_eq!(*machine.get_item(0), ItemStack::new(WATER_BUCKET, 1));
        assert!(machine.get_item(1).is_empty());
    }

    #[test]
    fn test_fill_tank_from_slot_is_all_or_nothing() {
        let mut machine = TankMachineBlockEntity::new(ORIGIN);
        machine.add_tank(FluidTank::new(2000));
        machine.add_slot();
        machine.add_slot();
        machine.tanks.fill(FluidStack::new(WATER, 1500), true);
        machine.set_item(0, ItemStack::new(WATER_BUCKET, 1));

        // Only 500 of space left; the bucket's 1000 doesn't fit.
        assert!(!machine.fill_tank_from_slot(0, 1, 0));
        assert_eq!(tank_amount(&machine, 0), 1500);
        assert_eq!(*machine.get_item(0), ItemStack::new(WATER_BUCKET, 1));

        // Bad indices are normal, silent outcomes.
        assert!(!machine.fill_tank_from_slot(0, 99, 0));
        assert!(!machine.fill_tank_from_slot(0, 1, 99));
        assert!(!machine.empty_tank_into_slot(99, 0, 0));
    }

    #[test]
    fn test_machine_from_layout() {
        let layout = MachineLayout::from_json5(
            r#"{ tanks: [{ capacity: 4000, accepts: ["tankworks:water"] }], slots: 2 }"#,
        )
        .expect("valid layout");
        let machine = TankMachineBlockEntity::from_layout(ORIGIN, &layout).expect("buildable");

        assert_eq!(machine.tanks().len(), 1);
        assert_eq!(machine.size(), 2);
        assert!(machine.tanks().can_fill(WATER));
        assert!(!machine.tanks().can_fill(LAVA));
    }

    #[test]
    fn test_eject_cap_from_layout() {
        let world = World::new();
        let layout =
            MachineLayout::from_json5(r#"{ tanks: [{ capacity: 4000 }], eject_per_tick: 250 }"#)
                .expect("valid layout");
        let mut machine = TankMachineBlockEntity::from_layout(ORIGIN, &layout).expect("buildable");
        machine.tanks.fill(FluidStack::new(WATER, 4000), true);
        machine.tanks.clear_changed();

        let sink_pos = Direction::Down.relative(ORIGIN);
        let mut sink = TankMachineBlockEntity::new(sink_pos);
        sink.add_tank(FluidTank::new(4000));
        world.set_block_entity(sink_pos, Arc::new(Mutex::new(sink)));

        // One eligible side, one attempt, capped at 250 per attempt.
        assert!(machine.eject_all_sides(0, &world));
        assert_eq!(tank_amount(&machine, 0), 3750);
    }

    #[test]
    fn test_cycle_eject_mode_marks_changed() {
        let mut machine = two_tank_machine();
        assert!(!machine.has_changed());
        machine.cycle_eject_mode();
        assert_eq!(machine.eject_mode(), EjectMode::All);
        assert!(machine.has_changed());
        assert_eq!(machine.eject_mode().display_name(), "All");
    }
}
