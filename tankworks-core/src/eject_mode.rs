//! Auto-ejection mode state machine.

/// Whether, and to whom, a machine auto-ejects its tank contents.
///
/// The ordinal values (0-2) are stable; they are the persisted form.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EjectMode {
    /// No automatic ejection.
    Off = 0,
    /// Eject only into neighboring machines.
    #[default]
    Machine = 1,
    /// Eject into any neighboring fluid handler.
    All = 2,
}

impl EjectMode {
    /// Advances to the next mode: Off → Machine → All → Off.
    ///
    /// Only ever triggered by an explicit user action, never by the engine.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Off => Self::Machine,
            Self::Machine => Self::All,
            Self::All => Self::Off,
        }
    }

    /// Decodes a persisted ordinal.
    ///
    /// Lenient: 0 is Off, 2 is All, anything else is Machine, so corrupt or
    /// future ordinals degrade to the default rather than failing the load.
    #[must_use]
    pub const fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Off,
            2 => Self::All,
            _ => Self::Machine,
        }
    }

    /// The persisted form of this mode.
    #[must_use]
    pub const fn ordinal(self) -> i32 {
        self as i32
    }

    /// Display name for UI.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Machine => "Machine",
            Self::All => "All",
        }
    }
}
