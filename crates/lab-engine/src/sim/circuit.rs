//! Steady-state resistive circuit (Ohm's law).

use std::f64::consts::TAU;

use crate::api::types::SimulationKind;
use crate::core::params::{Param, ParameterStore};
use crate::sim::model::{SimulationModel, SimulationState};

/// Resistances below this are evaluated as this.
pub const MIN_RESISTANCE: f64 = 1e-3;
/// Radians of flow-animation phase per second per ampere.
pub const FLOW_RATE: f64 = 2.0;
/// Flow animation never spins faster than this many radians per second.
pub const MAX_FLOW_SPEED: f64 = 40.0;

/// `I = V / R`.
pub fn current(voltage: f64, resistance: f64) -> f64 {
    voltage / resistance.max(MIN_RESISTANCE)
}

/// Current is a pure function of the parameters. Simulated time only drives
/// the looping electron-flow animation, whose phase advances incrementally so
/// a voltage change never makes it jump.
#[derive(Debug, Clone, Default)]
pub struct ResistiveCircuit {
    last_elapsed: f64,
    phase: f64,
}

impl ResistiveCircuit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimulationModel for ResistiveCircuit {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Circuit
    }

    fn evaluate(&mut self, elapsed: f64, params: &ParameterStore) -> SimulationState {
        let voltage = params.value(Param::Voltage);
        let amps = current(voltage, params.value(Param::Resistance));

        if elapsed < self.last_elapsed {
            self.reset();
        }
        let dt = elapsed - self.last_elapsed;
        self.last_elapsed = elapsed;
        let speed = (amps * FLOW_RATE).min(MAX_FLOW_SPEED);
        self.phase = (self.phase + dt * speed).rem_euclid(TAU);

        SimulationState::Circuit {
            current: amps,
            flow_phase_angle: self.phase,
            power: voltage * amps,
        }
    }

    fn reset(&mut self) {
        self.last_elapsed = 0.0;
        self.phase = 0.0;
    }
}
