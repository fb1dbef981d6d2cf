//! An amount of a fluid, and its NBT codec.

use simdnbt::borrow::NbtCompound as NbtCompoundView;
use simdnbt::owned::{NbtCompound, NbtTag};
use tankworks_utils::Identifier;

use crate::REGISTRY;
use crate::fluid::FluidId;

/// An amount of a specific fluid.
///
/// The unit is millibuckets; one bucket holds 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidStack {
    /// The fluid this stack holds.
    pub fluid: FluidId,
    /// The amount held, in millibuckets.
    pub amount: i32,
}

impl FluidStack {
    /// Creates a new stack.
    #[must_use]
    pub const fn new(fluid: FluidId, amount: i32) -> Self {
        Self { fluid, amount }
    }

    /// Returns true if this stack holds nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.fluid.is_empty() || self.amount <= 0
    }

    /// Returns a copy of this stack with a different amount.
    #[must_use]
    pub const fn with_amount(self, amount: i32) -> Self {
        Self {
            fluid: self.fluid,
            amount,
        }
    }

    /// Writes the fluid fields into the given compound.
    ///
    /// Unregistered fluids are skipped, leaving the compound without fluid
    /// fields; such a record reads back as `None`.
    pub fn save_to(self, nbt: &mut NbtCompound) {
        let Some(entry) = REGISTRY.fluids.get(self.fluid) else {
            log::debug!("skipping save of unregistered fluid {:?}", self.fluid);
            return;
        };

        nbt.insert("id", NbtTag::String(entry.key.to_string().into()));
        nbt.insert("amount", self.amount);
    }

    /// Reads a stack back from a compound written by [`Self::save_to`].
    ///
    /// Returns `None` for records with no fluid fields, an unknown fluid
    /// name, or a non-positive amount.
    #[must_use]
    pub fn from_compound(nbt: &NbtCompoundView<'_, '_>) -> Option<Self> {
        let key = nbt.string("id")?.to_str().parse::<Identifier>().ok()?;
        let fluid = REGISTRY.fluids.by_key(&key)?;
        let amount = nbt.int("amount").unwrap_or(0);

        if amount <= 0 {
            return None;
        }

        Some(Self { fluid, amount })
    }
}
