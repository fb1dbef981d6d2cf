//! Machine layout configuration.

use serde::Deserialize;
use tankworks_registry::REGISTRY;
use tankworks_registry::fluid::FluidId;
use tankworks_utils::Identifier;
use thiserror::Error;

use crate::tank::FluidTank;

/// Error produced when parsing or validating a machine layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The source text was not valid JSON5 for a layout.
    #[error("malformed layout: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A tank was declared with a non-positive capacity.
    #[error("tank capacity must be positive, got {0}")]
    BadCapacity(i32),
    /// The per-tick ejection cap was negative.
    #[error("eject_per_tick must not be negative, got {0}")]
    BadEjectCap(i32),
    /// A filter named a fluid the registry doesn't know.
    #[error("unknown fluid: {0}")]
    UnknownFluid(String),
}

/// Declarative description of a machine's tanks and slots.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineLayout {
    /// The tanks, in index order.
    pub tanks: Vec<TankSpec>,
    /// Number of item slots.
    #[serde(default)]
    pub slots: usize,
    /// Per-attempt drain cap for auto-ejection; 0 means whole-tank.
    #[serde(default)]
    pub eject_per_tick: i32,
}

/// One tank declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct TankSpec {
    /// Tank capacity in millibuckets.
    pub capacity: i32,
    /// Allow-list of fluid names this tank may be filled with.
    #[serde(default)]
    pub accepts: Option<Vec<String>>,
    /// Allow-list of fluid names this tank may be drained of.
    #[serde(default)]
    pub ejects: Option<Vec<String>>,
}

impl MachineLayout {
    /// Parses and validates a layout from JSON5 text.
    pub fn from_json5(source: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json5::from_str(source)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Checks capacities, caps, and that every named fluid resolves.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.eject_per_tick < 0 {
            return Err(LayoutError::BadEjectCap(self.eject_per_tick));
        }
        for spec in &self.tanks {
            if spec.capacity <= 0 {
                return Err(LayoutError::BadCapacity(spec.capacity));
            }
            for name in spec.accepts.iter().flatten().chain(spec.ejects.iter().flatten()) {
                resolve_fluid(name)?;
            }
        }
        Ok(())
    }

    /// Builds the declared tanks, in index order.
    pub fn build_tanks(&self) -> Result<Vec<FluidTank>, LayoutError> {
        self.tanks.iter().map(TankSpec::build).collect()
    }
}

impl TankSpec {
    fn build(&self) -> Result<FluidTank, LayoutError> {
        if self.capacity <= 0 {
            return Err(LayoutError::BadCapacity(self.capacity));
        }
        let mut tank = FluidTank::new(self.capacity);
        if let Some(accepts) = &self.accepts {
            tank = tank.accept_only(resolve_fluids(accepts)?);
        }
        if let Some(ejects) = &self.ejects {
            tank = tank.eject_only(resolve_fluids(ejects)?);
        }
        Ok(tank)
    }
}

fn resolve_fluids(names: &[String]) -> Result<Vec<FluidId>, LayoutError> {
    names.iter().map(|name| resolve_fluid(name)).collect()
}

fn resolve_fluid(name: &str) -> Result<FluidId, LayoutError> {
    let Ok(key) = name.parse::<Identifier>() else {
        return Err(LayoutError::UnknownFluid(name.to_string()));
    };
    REGISTRY
        .fluids
        .by_key(&key)
        .ok_or_else(|| LayoutError::UnknownFluid(name.to_string()))
}
