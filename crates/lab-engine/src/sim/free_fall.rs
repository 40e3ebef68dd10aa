//! Drop from rest: `d = ½·g·t²`, `v = g·t`.

use crate::api::types::SimulationKind;
use crate::core::params::{Param, ParameterStore};
use crate::sim::model::{SimulationModel, SimulationState};

/// Closed-form free fall from `initialHeight`. Completes on impact.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeFall;

impl FreeFall {
    pub fn distance(gravity: f64, t: f64) -> f64 {
        0.5 * gravity * t * t
    }

    /// Time needed to fall `height` metres.
    pub fn impact_time(gravity: f64, height: f64) -> f64 {
        (2.0 * height / gravity).sqrt()
    }
}

impl SimulationModel for FreeFall {
    fn kind(&self) -> SimulationKind {
        SimulationKind::FreeFall
    }

    fn evaluate(&mut self, elapsed: f64, params: &ParameterStore) -> SimulationState {
        let g = params.value(Param::Gravity);
        let height = params.value(Param::InitialHeight);
        let t = elapsed.max(0.0);

        let distance = Self::distance(g, t);
        let normalized_position = (distance / height).min(1.0);

        SimulationState::FreeFall {
            position: distance.min(height),
            normalized_position,
            velocity: g * t,
            elapsed_time: t,
        }
    }

    fn is_complete(&self, state: &SimulationState) -> bool {
        matches!(state, SimulationState::FreeFall { normalized_position, .. } if *normalized_position >= 1.0)
    }
}
