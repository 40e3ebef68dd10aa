//! Small-angle simple pendulum.

use std::f64::consts::TAU;

use crate::api::types::SimulationKind;
use crate::core::params::{Param, ParameterStore};
use crate::sim::model::{SimulationModel, SimulationState};

/// Shortest length the model evaluates with; shorter strings are clamped.
pub const MIN_LENGTH: f64 = 0.01;

/// `θ(t) = θ₀·cos(ω·t)` with `ω = √(g/L)`. Runs until paused.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pendulum;

impl Pendulum {
    pub fn angular_frequency(gravity: f64, length: f64) -> f64 {
        (gravity / length.max(MIN_LENGTH)).sqrt()
    }

    /// `T = 2π·√(L/g)`. Independent of amplitude and mass.
    pub fn period(gravity: f64, length: f64) -> f64 {
        TAU * (length.max(MIN_LENGTH) / gravity).sqrt()
    }
}

impl SimulationModel for Pendulum {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Pendulum
    }

    fn evaluate(&mut self, elapsed: f64, params: &ParameterStore) -> SimulationState {
        let g = params.value(Param::Gravity);
        let length = params.value(Param::PendulumLength).max(MIN_LENGTH);
        let theta0 = params.value(Param::InitialAngle).to_radians();

        let angle = theta0 * (Self::angular_frequency(g, length) * elapsed).cos();

        SimulationState::Pendulum {
            angle,
            period: Self::period(g, length),
            elapsed_time: elapsed,
            bob_x: length * angle.sin(),
            bob_y: -length * angle.cos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period_of(state: &SimulationState) -> f64 {
        match state {
            SimulationState::Pendulum { period, .. } => *period,
            _ => panic!("Expected Pendulum state"),
        }
    }

    fn angle_of(state: &SimulationState) -> f64 {
        match state {
            SimulationState::Pendulum { angle, .. } => *angle,
            _ => panic!("Expected Pendulum state"),
        }
    }

    #[test]
    fn period_matches_formula() {
        for &(l, g) in &[(1.0f64, 9.8f64), (0.25, 9.8), (2.5, 1.6), (10.0, 24.0)] {
            let expected = 2.0 * std::f64::consts::PI * (l / g).sqrt();
            assert!((Pendulum::period(g, l) - expected).abs() < 1e-12);
        }
        assert!((Pendulum::period(9.8, 1.0) - 2.007).abs() < 1e-3);
    }

    #[test]
    fn period_ignores_angle_and_mass() {
        let mut model = Pendulum;
        let mut a = ParameterStore::defaults(SimulationKind::Pendulum);
        let mut b = a.clone();
        a.set("initialAngle", 5.0).unwrap();
        a.set("mass", 0.5).unwrap();
        b.set("initialAngle", 40.0).unwrap();
        b.set("mass", 80.0).unwrap();
        assert_eq!(period_of(&model.evaluate(1.3, &a)), period_of(&model.evaluate(1.3, &b)));
    }

    #[test]
    fn starts_at_amplitude_and_returns_after_one_period() {
        let mut model = Pendulum;
        let p = ParameterStore::defaults(SimulationKind::Pendulum);
        let theta0 = 15f64.to_radians();

        assert!((angle_of(&model.evaluate(0.0, &p)) - theta0).abs() < 1e-12);
        let t = Pendulum::period(9.8, 1.0);
        assert!((angle_of(&model.evaluate(t, &p)) - theta0).abs() < 1e-9);
        assert!((angle_of(&model.evaluate(t / 2.0, &p)) + theta0).abs() < 1e-9);
        let later = model.evaluate(100.0, &p);
        assert!(!model.is_complete(&later));
    }

    #[test]
    fn zero_length_is_clamped() {
        let mut model = Pendulum;
        let mut p = ParameterStore::defaults(SimulationKind::Pendulum);
        p.set("pendulumLength", 0.0).unwrap();
        let state = model.evaluate(0.7, &p);
        assert!(period_of(&state).is_finite() && period_of(&state) > 0.0);
        assert!(angle_of(&state).is_finite());
    }
}
