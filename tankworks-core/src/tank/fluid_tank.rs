//! A single capacity-bounded fluid reservoir.

use rustc_hash::FxHashSet;
use simdnbt::borrow::NbtCompound as NbtCompoundView;
use simdnbt::owned::NbtCompound;
use tankworks_registry::FluidStack;
use tankworks_registry::fluid::FluidId;

use crate::fluid_handler::TankInfo;

/// A fluid reservoir with optional admission filters.
///
/// The accept and eject maps are independent allow-lists consulted by the
/// `*_mapped` operations; an unset map admits everything. A tank that
/// accepts a fluid but never ejects it (or vice versa) forms a one-way
/// reservoir.
///
/// Invariants: the held amount stays within `0..=capacity`, and `contents`
/// is `None` exactly when the amount is 0.
#[derive(Debug, Clone)]
pub struct FluidTank {
    capacity: i32,
    contents: Option<FluidStack>,
    accept_map: Option<FxHashSet<FluidId>>,
    eject_map: Option<FxHashSet<FluidId>>,
}

impl FluidTank {
    /// Creates an empty, unfiltered tank.
    ///
    /// # Panics
    /// Panics if `capacity` is not positive.
    #[must_use]
    pub fn new(capacity: i32) -> Self {
        assert!(capacity > 0, "tank capacity must be positive");
        Self {
            capacity,
            contents: None,
            accept_map: None,
            eject_map: None,
        }
    }

    /// Restricts which fluids may be filled into this tank.
    #[must_use]
    pub fn accept_only(mut self, fluids: impl IntoIterator<Item = FluidId>) -> Self {
        self.accept_map = Some(fluids.into_iter().collect());
        self
    }

    /// Restricts which fluids may be drained out of this tank.
    #[must_use]
    pub fn eject_only(mut self, fluids: impl IntoIterator<Item = FluidId>) -> Self {
        self.eject_map = Some(fluids.into_iter().collect());
        self
    }

    /// The tank's capacity.
    #[must_use]
    pub const fn capacity(&self) -> i32 {
        self.capacity
    }

    /// What the tank currently holds.
    #[must_use]
    pub const fn contents(&self) -> Option<FluidStack> {
        self.contents
    }

    /// The held amount; 0 for an empty tank.
    #[must_use]
    pub fn amount(&self) -> i32 {
        self.contents.map_or(0, |held| held.amount)
    }

    /// Returns true if the accept map admits the given fluid.
    ///
    /// Pure filter predicate; fullness is not consulted.
    #[must_use]
    pub fn can_accept(&self, fluid: FluidId) -> bool {
        self.accept_map
            .as_ref()
            .is_none_or(|map| map.contains(&fluid))
    }

    /// Returns true if the eject map admits the given fluid.
    ///
    /// Pure filter predicate; fullness is not consulted.
    #[must_use]
    pub fn can_eject(&self, fluid: FluidId) -> bool {
        self.eject_map
            .as_ref()
            .is_none_or(|map| map.contains(&fluid))
    }

    /// Fills fluid into the tank, ignoring the accept map.
    ///
    /// Accepts `min(resource.amount, free space)`, or 0 if a different
    /// fluid is already resident or the request is empty. Mutates only
    /// when `commit` is set.
    pub fn fill(&mut self, resource: FluidStack, commit: bool) -> i32 {
        if resource.is_empty() {
            return 0;
        }
        if let Some(held) = self.contents
            && held.fluid != resource.fluid
        {
            return 0;
        }

        let accepted = resource.amount.min(self.capacity - self.amount());
        if accepted <= 0 {
            return 0;
        }

        if commit {
            let amount = self.amount() + accepted;
            self.contents = Some(FluidStack::new(resource.fluid, amount));
        }
        accepted
    }

    /// Fills fluid into the tank, honoring the accept map.
    pub fn fill_mapped(&mut self, resource: FluidStack, commit: bool) -> i32 {
        if !self.can_accept(resource.fluid) {
            return 0;
        }
        self.fill(resource, commit)
    }

    /// Returns true if a mapped fill would accept the entire resource.
    ///
    /// The all-or-nothing predicate used by container exchange.
    #[must_use]
    pub fn can_fill_all(&mut self, resource: FluidStack) -> bool {
        !resource.is_empty() && self.fill_mapped(resource, false) == resource.amount
    }

    /// Drains up to `max_drain`, ignoring the eject map.
    ///
    /// Removes `min(max_drain, held amount)`; the tank's contents clear
    /// when the amount reaches 0. Mutates only when `commit` is set.
    pub fn drain(&mut self, max_drain: i32, commit: bool) -> Option<FluidStack> {
        let held = self.contents?;
        if max_drain <= 0 {
            return None;
        }

        let removed = max_drain.min(held.amount);
        if commit {
            self.contents = if removed == held.amount {
                None
            } else {
                Some(held.with_amount(held.amount - removed))
            };
        }
        Some(held.with_amount(removed))
    }

    /// Drains up to `max_drain`, honoring the eject map.
    pub fn drain_mapped(&mut self, max_drain: i32, commit: bool) -> Option<FluidStack> {
        let held = self.contents?;
        if !self.can_eject(held.fluid) {
            return None;
        }
        self.drain(max_drain, commit)
    }

    /// Drains a specific fluid type, honoring the eject map.
    ///
    /// A request for a fluid other than the resident one is a no-op.
    pub fn drain_stack_mapped(&mut self, resource: FluidStack, commit: bool) -> Option<FluidStack> {
        let held = self.contents?;
        if resource.is_empty() || held.fluid != resource.fluid {
            return None;
        }
        self.drain_mapped(resource.amount, commit)
    }

    /// Returns true if a mapped drain could remove at least `amount`.
    #[must_use]
    pub fn can_drain_mapped(&self, amount: i32) -> bool {
        amount > 0
            && self
                .contents
                .is_some_and(|held| self.can_eject(held.fluid) && held.amount >= amount)
    }

    /// Read-only snapshot for gauges and sync.
    #[must_use]
    pub const fn info(&self) -> TankInfo {
        TankInfo {
            capacity: self.capacity,
            contents: self.contents,
        }
    }

    /// Writes the fluid fields into the given compound.
    pub fn save(&self, nbt: &mut NbtCompound) {
        if let Some(held) = self.contents {
            held.save_to(nbt);
        }
    }

    /// Restores the fluid state from a compound written by [`Self::save`].
    ///
    /// Records with no fluid fields or an unknown fluid clear the tank;
    /// amounts beyond the capacity are clamped back into it.
    pub fn load(&mut self, nbt: &NbtCompoundView<'_, '_>) {
        self.contents = FluidStack::from_compound(nbt)
            .map(|held| held.with_amount(held.amount.min(self.capacity)));
    }
}
