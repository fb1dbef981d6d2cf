use tankworks_utils::Identifier;

/// Fluid ID - raw registry ID.
///
/// ID 0 is reserved for the empty fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FluidId(pub u16);

impl FluidId {
    /// The empty fluid (ID: 0).
    pub const EMPTY: FluidId = FluidId(0);

    /// Returns true if this is the empty fluid.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A registered fluid.
pub struct FluidEntry {
    /// Raw registry ID.
    pub id: FluidId,
    /// Namespaced name, used as the persisted key.
    pub key: Identifier,
}
