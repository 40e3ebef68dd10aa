//! Projectile launched from ground level.
//!
//! The path is sampled once per launch and replayed by index, so the arc
//! drawn never depends on frame timing.

use crate::api::types::SimulationKind;
use crate::core::params::{Param, ParameterStore};
use crate::sim::model::{SimulationModel, SimulationState};

/// Sampling interval of the precomputed path, in seconds.
pub const SAMPLE_DT: f64 = 0.1;
/// Hard cap on samples so a degenerate launch still yields a finite path.
pub const MAX_SAMPLES: usize = 10_000;

/// Launch conditions the cached path was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Launch {
    velocity: f64,
    angle_deg: f64,
    gravity: f64,
}

impl Launch {
    fn from_params(params: &ParameterStore) -> Self {
        Self {
            velocity: params.value(Param::LaunchVelocity),
            angle_deg: params.value(Param::LaunchAngle),
            gravity: params.value(Param::Gravity),
        }
    }
}

/// Replays a trajectory precomputed at launch.
#[derive(Debug, Clone, Default)]
pub struct ProjectileMotion {
    launch: Option<Launch>,
    trajectory: Vec<(f64, f64)>,
}

impl ProjectileMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample `x = v·cosθ·t`, `y = v·sinθ·t − ½·g·t²` every [`SAMPLE_DT`]
    /// seconds. The last sample is the first one below ground.
    pub fn trajectory(velocity: f64, angle_deg: f64, gravity: f64) -> Vec<(f64, f64)> {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let mut points = Vec::new();
        for step in 0..MAX_SAMPLES {
            let t = step as f64 * SAMPLE_DT;
            let x = velocity * cos * t;
            let y = velocity * sin * t - 0.5 * gravity * t * t;
            points.push((x, y));
            if y < 0.0 {
                break;
            }
        }
        points
    }

    /// Index of the sample shown at `elapsed` simulated seconds.
    pub fn index_at(&self, elapsed: f64) -> usize {
        let last = self.trajectory.len().saturating_sub(1);
        let idx = (elapsed.max(0.0) / SAMPLE_DT + 1e-9).floor();
        (idx as usize).min(last)
    }

    fn ensure_launched(&mut self, elapsed: f64, params: &ParameterStore) {
        let launch = Launch::from_params(params);
        // Relaunch at t=0 or if nothing has been launched yet. Edits made in
        // flight take effect on the next launch.
        let stale = self.launch != Some(launch) && elapsed <= 0.0;
        if self.launch.is_none() || stale {
            self.trajectory = Self::trajectory(launch.velocity, launch.angle_deg, launch.gravity);
            self.launch = Some(launch);
            log::debug!("projectile: precomputed {} samples", self.trajectory.len());
        }
    }
}

impl SimulationModel for ProjectileMotion {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Projectile
    }

    fn evaluate(&mut self, elapsed: f64, params: &ParameterStore) -> SimulationState {
        self.ensure_launched(elapsed, params);
        SimulationState::Projectile {
            trajectory_points: self.trajectory.clone(),
            current_index: self.index_at(elapsed),
        }
    }

    fn reset(&mut self) {
        self.launch = None;
        self.trajectory.clear();
    }
}
