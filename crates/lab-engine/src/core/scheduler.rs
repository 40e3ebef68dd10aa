//! Cooperative frame loop.
//!
//! The host environment's animation-frame API is injected as a
//! [`FrameScheduler`]. The host calls [`AnimationScheduler::on_frame`] with the
//! handle it was given; handles that were canceled or superseded are ignored,
//! so a late callback from a stopped loop can never advance time.

use crate::api::types::FrameHandle;
use crate::core::params::ParameterStore;
use crate::sim::model::{SimulationModel, SimulationState};

/// Host capability for scheduling frame callbacks.
pub trait FrameScheduler {
    /// Ask for one callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Current timestamp in milliseconds, on the same clock frame callbacks use.
    fn now(&self) -> f64;
}

/// Deterministic scheduler driven by the caller.
/// Used by headless hosts and tests in place of real display frames.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    pending: Vec<FrameHandle>,
    now: f64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `ms` and hand out the oldest pending request.
    pub fn fire(&mut self, ms: f64) -> Option<(FrameHandle, f64)> {
        self.now += ms;
        if self.pending.is_empty() {
            return None;
        }
        Some((self.pending.remove(0), self.now))
    }

    /// Number of outstanding requests.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn now(&self) -> f64 {
        self.now
    }
}

/// Book-keeping for the live loop.
/// `frame_handle` is `Some` exactly while `running` is true.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationLoop {
    pub running: bool,
    pub frame_handle: Option<FrameHandle>,
    pub start_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub simulated_time: f64,
}

/// Result of a frame callback that was accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Wall-clock seconds since the previous frame.
    pub delta_seconds: f64,
    /// The model reported a natural end; the loop has stopped.
    pub completed: bool,
}

/// Owns the frame loop and the active model.
pub struct AnimationScheduler<F: FrameScheduler> {
    frames: F,
    anim: AnimationLoop,
    model: Option<Box<dyn SimulationModel>>,
    latest: Option<SimulationState>,
}

impl<F: FrameScheduler> AnimationScheduler<F> {
    pub fn new(frames: F) -> Self {
        Self {
            frames,
            anim: AnimationLoop::default(),
            model: None,
            latest: None,
        }
    }

    /// Dispose whatever is loaded, then take `model` for a fresh run at t=0.
    pub fn attach(&mut self, model: Box<dyn SimulationModel>) {
        self.dispose();
        log::info!("scheduler: attached {}", model.kind());
        self.model = Some(model);
    }

    /// Begin requesting frames. Idempotent while running. The clock is
    /// seeded with `now()`, so the first frame counts the time since start.
    pub fn start(&mut self) -> bool {
        if self.anim.running {
            log::debug!("scheduler: start ignored, already running");
            return false;
        }
        let now = self.frames.now();
        self.anim.start_timestamp = Some(now);
        self.anim.last_timestamp = Some(now);
        self.anim.frame_handle = Some(self.frames.request_frame());
        self.anim.running = true;
        true
    }

    /// Frame callback. Advances simulated time by the wall-clock delta scaled
    /// by the speed read from `params` on this tick, evaluates the model and
    /// keeps the snapshot. Returns `None` for stale handles.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        timestamp: f64,
        params: Option<&ParameterStore>,
    ) -> Option<Tick> {
        if !self.anim.running || self.anim.frame_handle != Some(handle) {
            log::debug!("scheduler: dropping stale frame {:?}", handle);
            return None;
        }
        self.anim.frame_handle = None;

        let last = self.anim.last_timestamp.unwrap_or(timestamp);
        let delta_seconds = ((timestamp - last) / 1000.0).max(0.0);
        self.anim.last_timestamp = Some(timestamp);

        let speed = params.map_or(1.0, ParameterStore::simulation_speed);
        self.anim.simulated_time += delta_seconds * speed;

        let mut completed = false;
        if let (Some(model), Some(params)) = (self.model.as_mut(), params) {
            let state = model.evaluate(self.anim.simulated_time, params);
            completed = model.is_complete(&state);
            self.latest = Some(state);
        }

        if completed {
            log::info!("scheduler: run complete at t={:.3}s", self.anim.simulated_time);
            self.anim.running = false;
        } else {
            self.anim.frame_handle = Some(self.frames.request_frame());
        }

        Some(Tick { delta_seconds, completed })
    }

    /// Cancel the pending frame and stop. Safe when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.anim.frame_handle.take() {
            self.frames.cancel_frame(handle);
        }
        self.anim.running = false;
        self.anim.last_timestamp = None;
    }

    /// Stop, rewind to t=0 and evaluate the initial state.
    pub fn reset(&mut self, params: Option<&ParameterStore>) -> Option<&SimulationState> {
        self.stop();
        self.anim.simulated_time = 0.0;
        self.anim.start_timestamp = None;
        self.latest = None;
        if let Some(model) = self.model.as_mut() {
            model.reset();
            if let Some(params) = params {
                self.latest = Some(model.evaluate(0.0, params));
            }
        }
        self.latest.as_ref()
    }

    /// Re-evaluate at the current simulated time without advancing it.
    /// Used after parameter edits so readouts follow while paused.
    pub fn refresh(&mut self, params: &ParameterStore) -> Option<&SimulationState> {
        let model = self.model.as_mut()?;
        self.latest = Some(model.evaluate(self.anim.simulated_time, params));
        self.latest.as_ref()
    }

    /// Stop and release the model. Must precede any start for a new model.
    pub fn dispose(&mut self) {
        self.stop();
        if let Some(model) = self.model.take() {
            log::info!("scheduler: disposed {}", model.kind());
        }
        self.latest = None;
        self.anim = AnimationLoop::default();
    }

    pub fn is_running(&self) -> bool {
        self.anim.running
    }

    pub fn simulated_time(&self) -> f64 {
        self.anim.simulated_time
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> Option<&SimulationState> {
        self.latest.as_ref()
    }

    pub fn animation_loop(&self) -> &AnimationLoop {
        &self.anim
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SimulationKind;

    fn pump(s: &mut AnimationScheduler<ManualFrames>, ms: f64, p: &ParameterStore) -> Option<Tick> {
        let (handle, ts) = s.frames_mut().fire(ms)?;
        s.on_frame(handle, ts, Some(p))
    }

    fn scheduler(kind: SimulationKind) -> (AnimationScheduler<ManualFrames>, ParameterStore) {
        let mut s = AnimationScheduler::new(ManualFrames::new());
        s.attach(kind.model());
        (s, ParameterStore::defaults(kind))
    }

    #[test]
    fn handle_present_iff_running() {
        let (mut s, p) = scheduler(SimulationKind::Pendulum);
        assert!(!s.is_running() && s.animation_loop().frame_handle.is_none());
        s.start();
        assert!(s.is_running() && s.animation_loop().frame_handle.is_some());
        pump(&mut s, 16.0, &p).unwrap();
        assert!(s.is_running() && s.animation_loop().frame_handle.is_some());
        s.stop();
        assert!(!s.is_running() && s.animation_loop().frame_handle.is_none());
        assert_eq!(s.frames().pending(), 0);
    }

    #[test]
    fn double_start_keeps_one_loop() {
        let (mut s, p) = scheduler(SimulationKind::Pendulum);
        assert!(s.start());
        assert!(!s.start());
        assert_eq!(s.frames().pending(), 1);

        for _ in 0..10 {
            pump(&mut s, 100.0, &p).unwrap();
            assert_eq!(s.frames().pending(), 1);
        }
        assert!((s.simulated_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn speed_scales_future_accumulation_only() {
        let (mut s, mut p) = scheduler(SimulationKind::Pendulum);
        s.start();
        pump(&mut s, 500.0, &p);
        p.set("simulationSpeed", 2.0).unwrap();
        pump(&mut s, 500.0, &p);
        assert!((s.simulated_time() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn first_frame_counts_time_since_start() {
        let (mut s, p) = scheduler(SimulationKind::Pendulum);
        s.frames_mut().fire(1_000.0);
        s.start();
        let tick = pump(&mut s, 250.0, &p).unwrap();
        assert!((tick.delta_seconds - 0.25).abs() < 1e-12);
        assert!((s.simulated_time() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn stale_frames_are_ignored() {
        let (mut s, p) = scheduler(SimulationKind::Circuit);
        s.start();
        let stale = s.animation_loop().frame_handle.unwrap();
        s.stop();
        assert!(s.on_frame(stale, 1000.0, Some(&p)).is_none());
        assert_eq!(s.simulated_time(), 0.0);
    }

    #[test]
    fn stop_is_safe_when_idle() {
        let (mut s, _) = scheduler(SimulationKind::Titration);
        s.stop();
        s.stop();
        assert!(!s.is_running());
    }

    #[test]
    fn resume_does_not_count_paused_time() {
        let (mut s, p) = scheduler(SimulationKind::Pendulum);
        s.start();
        pump(&mut s, 200.0, &p);
        s.stop();
        s.frames_mut().fire(5_000.0);
        s.start();
        pump(&mut s, 100.0, &p);
        assert!((s.simulated_time() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn free_fall_completion_stops_loop() {
        let (mut s, p) = scheduler(SimulationKind::FreeFall);
        s.start();
        let mut completed = false;
        for _ in 0..1000 {
            match pump(&mut s, 16.0, &p) {
                Some(tick) if tick.completed => {
                    completed = true;
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }
        assert!(completed);
        assert!(!s.is_running());
        assert_eq!(s.frames().pending(), 0);
    }

    #[test]
    fn reset_evaluates_initial_state() {
        let (mut s, p) = scheduler(SimulationKind::FreeFall);
        s.start();
        pump(&mut s, 1000.0, &p);
        let state = s.reset(Some(&p)).cloned().unwrap();
        assert!(!s.is_running());
        assert_eq!(s.simulated_time(), 0.0);
        match state {
            SimulationState::FreeFall { position, velocity, .. } => {
                assert_eq!(position, 0.0);
                assert_eq!(velocity, 0.0);
            }
            _ => panic!("Expected FreeFall state"),
        }
    }

    #[test]
    fn dispose_then_fresh_model_starts_at_zero() {
        let (mut s, p) = scheduler(SimulationKind::FreeFall);
        s.start();
        pump(&mut s, 1000.0, &p);

        s.dispose();
        assert!(!s.has_model() && s.latest().is_none());
        assert_eq!(s.frames().pending(), 0);

        let p = ParameterStore::defaults(SimulationKind::Pendulum);
        s.attach(SimulationKind::Pendulum.model());
        s.start();
        pump(&mut s, 0.0, &p).unwrap();
        assert_eq!(s.simulated_time(), 0.0);
        match s.latest() {
            Some(SimulationState::Pendulum { angle, .. }) => {
                assert!((angle - 15f64.to_radians()).abs() < 1e-12);
            }
            other => panic!("Expected Pendulum state, got {other:?}"),
        }
    }
}
