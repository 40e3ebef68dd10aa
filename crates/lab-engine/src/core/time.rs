/// Fixed-tick accumulator.
/// Turns variable simulated-time deltas into a whole number of fixed ticks,
/// carrying the remainder over to the next call.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed tick length in seconds.
    dt: f64,
    /// Accumulated time not yet consumed by a tick.
    accumulator: f64,
    /// Upper bound on ticks produced by a single `accumulate` call.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
        }
    }

    /// Raise or lower the per-call tick cap.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add elapsed time to the accumulator. Returns the number of fixed ticks to run.
    pub fn accumulate(&mut self, elapsed: f64) -> u32 {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed;
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f64);
        // Guard against 0.3 / 0.1 landing a hair under 3.0
        let steps = ((self.accumulator / self.dt) + 1e-9).floor() as u32;
        self.accumulator = (self.accumulator - steps as f64 * self.dt).max(0.0);
        steps
    }
}
