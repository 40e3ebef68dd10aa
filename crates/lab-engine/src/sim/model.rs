use serde::Serialize;

use crate::api::types::SimulationKind;
use crate::core::params::ParameterStore;
use crate::sim::{
    circuit::ResistiveCircuit, free_fall::FreeFall, pendulum::Pendulum,
    projectile::ProjectileMotion, titration::Titration,
};

/// Snapshot produced by a model for one instant of simulated time.
/// Replaced wholesale every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SimulationState {
    #[serde(rename_all = "camelCase")]
    FreeFall {
        /// Distance fallen in metres, clamped to the drop height.
        position: f64,
        /// `position / initial_height`, in [0, 1].
        normalized_position: f64,
        velocity: f64,
        elapsed_time: f64,
    },
    #[serde(rename_all = "camelCase")]
    Pendulum {
        /// Radians from vertical.
        angle: f64,
        period: f64,
        elapsed_time: f64,
        /// Bob position relative to the pivot, y pointing up.
        bob_x: f64,
        bob_y: f64,
    },
    #[serde(rename_all = "camelCase")]
    Projectile {
        trajectory_points: Vec<(f64, f64)>,
        current_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Titration {
        volume_added: f64,
        ph: f64,
        is_neutralized: bool,
    },
    #[serde(rename_all = "camelCase")]
    Circuit {
        current: f64,
        flow_phase_angle: f64,
        power: f64,
    },
}

impl SimulationState {
    pub fn kind(&self) -> SimulationKind {
        match self {
            SimulationState::FreeFall { .. } => SimulationKind::FreeFall,
            SimulationState::Pendulum { .. } => SimulationKind::Pendulum,
            SimulationState::Projectile { .. } => SimulationKind::Projectile,
            SimulationState::Titration { .. } => SimulationKind::Titration,
            SimulationState::Circuit { .. } => SimulationKind::Circuit,
        }
    }
}

/// Contract shared by every simulation.
///
/// `evaluate` takes the parameters explicitly on every call so edits made
/// mid-run are picked up on the next frame. Models may keep per-run memory
/// (the projectile's precomputed path, the titration latch); `reset` clears it.
pub trait SimulationModel {
    fn kind(&self) -> SimulationKind;

    /// Compute the state at `elapsed` seconds of simulated time.
    fn evaluate(&mut self, elapsed: f64, params: &ParameterStore) -> SimulationState;

    /// Whether the run has reached a natural end. Most models never do.
    fn is_complete(&self, _state: &SimulationState) -> bool {
        false
    }

    /// Forget everything remembered from the current run.
    fn reset(&mut self) {}
}

impl SimulationKind {
    /// Build a fresh model for this kind.
    pub fn model(self) -> Box<dyn SimulationModel> {
        match self {
            SimulationKind::FreeFall => Box::new(FreeFall),
            SimulationKind::Pendulum => Box::new(Pendulum),
            SimulationKind::Projectile => Box::new(ProjectileMotion::new()),
            SimulationKind::Titration => Box::new(Titration::new()),
            SimulationKind::Circuit => Box::new(ResistiveCircuit::new()),
        }
    }
}
