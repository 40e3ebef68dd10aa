//! Acid–base titration with a linear pH response.

use crate::api::types::SimulationKind;
use crate::core::params::{Param, ParameterStore};
use crate::core::time::FixedTimestep;
use crate::sim::model::{SimulationModel, SimulationState};

/// Burette tick length in simulated seconds.
pub const TICK: f64 = 0.1;
/// Titrant volume (mL) at which the burette stops.
pub const MAX_VOLUME: f64 = 25.0;
/// Phenolphthalein colour change.
pub const NEUTRAL_PH: f64 = 8.2;

/// `pH = 1 + (volume / 25)·13`.
pub fn ph_for(volume: f64) -> f64 {
    1.0 + (volume / MAX_VOLUME) * 13.0
}

/// Adds `dropRate · 0.1` mL per tick. Once the indicator turns it stays turned.
#[derive(Debug, Clone)]
pub struct Titration {
    clock: FixedTimestep,
    last_elapsed: f64,
    volume_added: f64,
    neutralized: bool,
}

impl Titration {
    pub fn new() -> Self {
        Self {
            clock: FixedTimestep::new(TICK).with_max_steps(u32::MAX),
            last_elapsed: 0.0,
            volume_added: 0.0,
            neutralized: false,
        }
    }

    fn drip(&mut self, drop_rate: f64) {
        if self.volume_added < MAX_VOLUME {
            self.volume_added = (self.volume_added + drop_rate * TICK).min(MAX_VOLUME);
        }
        if !self.neutralized && ph_for(self.volume_added) >= NEUTRAL_PH {
            self.neutralized = true;
            log::info!("titration: neutralized at {:.2} mL", self.volume_added);
        }
    }
}

impl Default for Titration {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationModel for Titration {
    fn kind(&self) -> SimulationKind {
        SimulationKind::Titration
    }

    fn evaluate(&mut self, elapsed: f64, params: &ParameterStore) -> SimulationState {
        if elapsed < self.last_elapsed {
            self.reset();
        }
        let steps = self.clock.accumulate(elapsed - self.last_elapsed);
        self.last_elapsed = elapsed;

        let drop_rate = params.value(Param::DropRate);
        for _ in 0..steps {
            self.drip(drop_rate);
        }

        SimulationState::Titration {
            volume_added: self.volume_added,
            ph: ph_for(self.volume_added),
            is_neutralized: self.neutralized,
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack(state: &SimulationState) -> (f64, f64, bool) {
        match *state {
            SimulationState::Titration { volume_added, ph, is_neutralized } => {
                (volume_added, ph, is_neutralized)
            }
            _ => panic!("Expected Titration state"),
        }
    }

    #[test]
    fn ph_endpoints() {
        assert_eq!(ph_for(0.0), 1.0);
        assert_eq!(ph_for(25.0), 14.0);
    }

    #[test]
    fn volume_ramps_per_tick() {
        let mut model = Titration::new();
        let mut p = ParameterStore::defaults(SimulationKind::Titration);
        p.set("dropRate", 2.0).unwrap();

        let (v, ph, _) = unpack(&model.evaluate(0.0, &p));
        assert_eq!((v, ph), (0.0, 1.0));

        // 10 ticks of 0.2 mL
        let (v, _, _) = unpack(&model.evaluate(1.0, &p));
        assert!((v - 2.0).abs() < 1e-9, "volume was {v}");

        // Partial tick carries over
        let (v, _, _) = unpack(&model.evaluate(1.05, &p));
        assert!((v - 2.0).abs() < 1e-9);
        let (v, _, _) = unpack(&model.evaluate(1.1, &p));
        assert!((v - 2.2).abs() < 1e-9);
    }

    #[test]
    fn monotonic_and_capped() {
        let mut model = Titration::new();
        let mut p = ParameterStore::defaults(SimulationKind::Titration);
        p.set("dropRate", 10.0).unwrap();

        let mut last_ph = 0.0;
        for i in 0..400 {
            let (v, ph, _) = unpack(&model.evaluate(i as f64 * 0.05, &p));
            assert!(ph >= last_ph);
            assert!(v <= MAX_VOLUME);
            last_ph = ph;
        }
        assert_eq!(last_ph, 14.0);
    }

    #[test]
    fn neutralized_latches_once() {
        let mut model = Titration::new();
        let p = ParameterStore::defaults(SimulationKind::Titration);

        let mut flips = 0;
        let mut was = false;
        for i in 0..=300 {
            let (_, ph, neutral) = unpack(&model.evaluate(i as f64 * 0.1, &p));
            assert_eq!(neutral, ph >= NEUTRAL_PH || was);
            if neutral && !was {
                flips += 1;
            }
            was = neutral;
        }
        assert_eq!(flips, 1);
        assert!(was);
    }

    #[test]
    fn rewinding_time_restarts_run() {
        let mut model = Titration::new();
        let p = ParameterStore::defaults(SimulationKind::Titration);
        model.evaluate(30.0, &p);
        let (v, _, neutral) = unpack(&model.evaluate(0.0, &p));
        assert_eq!(v, 0.0);
        assert!(!neutral);
    }
}
