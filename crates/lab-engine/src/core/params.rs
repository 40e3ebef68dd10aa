//! Per-simulation parameter storage with range validation.
//!
//! The host page writes through [`ParameterStore::set`]; the engine only
//! reads. Rejected writes leave the store untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::api::types::SimulationKind;

/// A tunable physical parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Param {
    Gravity,
    InitialHeight,
    Mass,
    PendulumLength,
    InitialAngle,
    LaunchVelocity,
    LaunchAngle,
    DropRate,
    Voltage,
    Resistance,
}

/// Default value and accepted input range of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl ParamSpec {
    const fn new(default: f64, min: f64, max: f64) -> Self {
        Self { default, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Param {
    /// Name used by the host page's inputs.
    pub fn name(self) -> &'static str {
        match self {
            Param::Gravity => "gravity",
            Param::InitialHeight => "initialHeight",
            Param::Mass => "mass",
            Param::PendulumLength => "pendulumLength",
            Param::InitialAngle => "initialAngle",
            Param::LaunchVelocity => "launchVelocity",
            Param::LaunchAngle => "launchAngle",
            Param::DropRate => "dropRate",
            Param::Voltage => "voltage",
            Param::Resistance => "resistance",
        }
    }

    /// Resolve a host-page name. Accepts the short slider names too.
    pub fn from_name(name: &str) -> Option<Param> {
        let param = match name {
            "gravity" => Param::Gravity,
            "initialHeight" | "height" => Param::InitialHeight,
            "mass" => Param::Mass,
            "pendulumLength" | "length" => Param::PendulumLength,
            "initialAngle" => Param::InitialAngle,
            "launchVelocity" | "velocity" => Param::LaunchVelocity,
            "launchAngle" | "angle" => Param::LaunchAngle,
            "dropRate" => Param::DropRate,
            "voltage" => Param::Voltage,
            "resistance" => Param::Resistance,
            _ => return None,
        };
        Some(param)
    }

    pub fn spec(self) -> ParamSpec {
        match self {
            Param::Gravity => ParamSpec::new(9.8, 0.1, 30.0),
            Param::InitialHeight => ParamSpec::new(100.0, 1.0, 1000.0),
            Param::Mass => ParamSpec::new(1.0, 0.1, 100.0),
            // Zero length is accepted and clamped by the pendulum model.
            Param::PendulumLength => ParamSpec::new(1.0, 0.0, 10.0),
            // Degrees.
            Param::InitialAngle => ParamSpec::new(15.0, 0.0, 90.0),
            Param::LaunchVelocity => ParamSpec::new(20.0, 0.0, 100.0),
            Param::LaunchAngle => ParamSpec::new(45.0, 0.0, 90.0),
            Param::DropRate => ParamSpec::new(1.0, 1.0, 10.0),
            Param::Voltage => ParamSpec::new(12.0, 0.0, 24.0),
            // Zero resistance is accepted and clamped by the circuit model.
            Param::Resistance => ParamSpec::new(10.0, 0.0, 1000.0),
        }
    }

    /// Parameters a simulation kind exposes.
    pub fn for_kind(kind: SimulationKind) -> &'static [Param] {
        match kind {
            SimulationKind::FreeFall => &[Param::Gravity, Param::InitialHeight, Param::Mass],
            SimulationKind::Pendulum => &[
                Param::Gravity,
                Param::PendulumLength,
                Param::InitialAngle,
                Param::Mass,
            ],
            SimulationKind::Projectile => {
                &[Param::Gravity, Param::LaunchVelocity, Param::LaunchAngle]
            }
            SimulationKind::Titration => &[Param::DropRate],
            SimulationKind::Circuit => &[Param::Voltage, Param::Resistance],
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-page name of the speed multiplier.
pub const SIMULATION_SPEED: &str = "simulationSpeed";
/// Accepted range of the speed multiplier.
pub const SPEED_SPEC: ParamSpec = ParamSpec::new(1.0, 0.5, 3.0);

/// Why a parameter write was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown parameter `{name}` for {kind}")]
    Unknown { name: String, kind: SimulationKind },

    #[error("cannot set `{name}`: no simulation selected")]
    NoSimulation { name: String },

    #[error("`{name}` is not a number: {raw:?}")]
    NotANumber { name: String, raw: String },

    #[error("`{name}` must be finite")]
    NonFinite { name: String },

    #[error("`{name}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Current configuration of the active simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterStore {
    kind: SimulationKind,
    values: BTreeMap<Param, f64>,
    simulation_speed: f64,
}

impl ParameterStore {
    /// Fresh store holding the defaults for `kind`.
    pub fn defaults(kind: SimulationKind) -> Self {
        let values = Param::for_kind(kind)
            .iter()
            .map(|&p| (p, p.spec().default))
            .collect();
        Self {
            kind,
            values,
            simulation_speed: SPEED_SPEC.default,
        }
    }

    pub fn kind(&self) -> SimulationKind {
        self.kind
    }

    /// Current value of `param`. Parameters the kind does not expose read as
    /// their default.
    pub fn value(&self, param: Param) -> f64 {
        self.values
            .get(&param)
            .copied()
            .unwrap_or_else(|| param.spec().default)
    }

    pub fn simulation_speed(&self) -> f64 {
        self.simulation_speed
    }

    /// Iterate over the exposed parameters in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Param, f64)> + '_ {
        self.values.iter().map(|(&p, &v)| (p, v))
    }

    /// Validate and write a value. `name` may be any exposed parameter or
    /// `simulationSpeed`.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NonFinite { name: name.to_string() });
        }

        if name == SIMULATION_SPEED {
            check_range(name, value, SPEED_SPEC)?;
            self.simulation_speed = value;
            return Ok(());
        }

        let param = Param::from_name(name)
            .filter(|p| self.values.contains_key(p))
            .ok_or_else(|| ParamError::Unknown {
                name: name.to_string(),
                kind: self.kind,
            })?;
        check_range(name, value, param.spec())?;
        self.values.insert(param, value);
        Ok(())
    }

    /// Parse raw input text (e.g. a slider's value attribute) and write it.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<(), ParamError> {
        let value: f64 = raw.trim().parse().map_err(|_| ParamError::NotANumber {
            name: name.to_string(),
            raw: raw.to_string(),
        })?;
        self.set(name, value)
    }

    /// Restore the kind's defaults, including the speed multiplier.
    pub fn reset(&mut self) {
        *self = Self::defaults(self.kind);
    }
}

fn check_range(name: &str, value: f64, spec: ParamSpec) -> Result<(), ParamError> {
    if spec.contains(value) {
        Ok(())
    } else {
        Err(ParamError::OutOfRange {
            name: name.to_string(),
            value,
            min: spec.min,
            max: spec.max,
        })
    }
}
