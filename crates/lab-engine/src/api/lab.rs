use serde::Deserialize;

use crate::api::types::{AssetTicket, FrameHandle, SimulationKind, SubscriptionId};
use crate::assets::texture::{AssetError, TextureInfo};
use crate::core::params::{ParamError, ParameterStore};
use crate::core::scheduler::{AnimationScheduler, FrameScheduler};
use crate::input::event::InputEvent;
use crate::input::orbit::OrbitCameraController;
use crate::renderer::camera::{CameraConfig, CameraState};
use crate::renderer::scene::SceneKind;
use crate::renderer::traits::Renderer;
use crate::renderer::viewport::{GlobeAssets, Viewport, ViewportPhase};
use crate::sim::model::SimulationState;

/// Engine configuration, provided by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub camera: CameraConfig,
    /// Globe texture requested on mount.
    pub globe_texture: String,
    pub star_count: usize,
    pub star_radius: f32,
    pub star_seed: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            globe_texture: "textures/earth.jpg".to_string(),
            star_count: 1000,
            star_radius: 300.0,
            star_seed: 42,
        }
    }
}

impl LabConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn globe_assets(&self) -> GlobeAssets {
        GlobeAssets {
            texture_path: self.globe_texture.clone(),
            star_count: self.star_count,
            star_radius: self.star_radius,
            star_seed: self.star_seed,
        }
    }
}

type StateCallback = Box<dyn FnMut(&SimulationState)>;

/// The engine as seen by the host page.
///
/// Owns the parameter store, the frame loop, the orbit camera and the
/// viewport. Everything runs on the caller's thread; the host forwards
/// frame callbacks to [`Lab::on_frame`] and texture results to
/// [`Lab::on_asset_loaded`].
pub struct Lab<F: FrameScheduler, R: Renderer> {
    config: LabConfig,
    scheduler: AnimationScheduler<F>,
    params: Option<ParameterStore>,
    camera: OrbitCameraController,
    viewport: Viewport<R>,
    subscribers: Vec<(SubscriptionId, StateCallback)>,
    next_subscription: u32,
}

impl<F: FrameScheduler, R: Renderer> Lab<F, R> {
    pub fn new(config: LabConfig, frames: F) -> Self {
        let camera = OrbitCameraController::new(config.camera.clone());
        Self {
            config,
            scheduler: AnimationScheduler::new(frames),
            params: None,
            camera,
            viewport: Viewport::new(),
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }

    // -- Simulation control --

    /// Dispose the running simulation, load defaults for `kind` and show
    /// its t=0 state.
    pub fn select_simulation(&mut self, kind: SimulationKind) {
        // attach() disposes the previous loop before anything new exists
        self.scheduler.attach(kind.model());
        self.params = Some(ParameterStore::defaults(kind));
        self.scheduler.reset(self.params.as_ref());
        log::info!("lab: selected {kind}");
        self.publish();
    }

    /// Validate and apply a parameter edit. Rejected edits change nothing.
    pub fn update_parameter(&mut self, name: &str, value: f64) -> Result<(), ParamError> {
        let params = self.params_mut(name)?;
        params.set(name, value).inspect_err(|err| log::warn!("lab: {err}"))?;
        self.after_parameter_edit();
        Ok(())
    }

    /// Like [`Lab::update_parameter`], taking the raw input text.
    pub fn update_parameter_str(&mut self, name: &str, raw: &str) -> Result<(), ParamError> {
        let params = self.params_mut(name)?;
        params.set_raw(name, raw).inspect_err(|err| log::warn!("lab: {err}"))?;
        self.after_parameter_edit();
        Ok(())
    }

    fn params_mut(&mut self, name: &str) -> Result<&mut ParameterStore, ParamError> {
        self.params.as_mut().ok_or_else(|| ParamError::NoSimulation {
            name: name.to_string(),
        })
    }

    fn after_parameter_edit(&mut self) {
        // A running loop picks the edit up on its next tick.
        if !self.scheduler.is_running() {
            if let Some(params) = self.params.as_ref() {
                self.scheduler.refresh(params);
                self.publish();
            }
        }
    }

    /// Start or resume. Without a simulation, runs the render-only loop
    /// that animates a mounted globe.
    pub fn play(&mut self) {
        if !self.scheduler.has_model() && self.viewport.renderer().is_none() {
            log::debug!("lab: play ignored, nothing to animate");
            return;
        }
        if self.scheduler.start() {
            log::info!("lab: playing");
        }
    }

    pub fn pause(&mut self) {
        if self.scheduler.is_running() {
            log::info!("lab: paused at t={:.3}s", self.scheduler.simulated_time());
        }
        self.scheduler.stop();
    }

    /// Stop, restore default parameters and show the t=0 state.
    pub fn reset(&mut self) {
        if let Some(params) = self.params.as_mut() {
            params.reset();
        }
        self.scheduler.reset(self.params.as_ref());
        self.publish();
    }

    /// Frame callback from the host. Stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) {
        let Some(tick) = self.scheduler.on_frame(handle, timestamp, self.params.as_ref()) else {
            return;
        };
        self.camera.tick();
        self.publish();
        if tick.completed {
            log::info!("lab: simulation complete");
        }
    }

    // -- State subscription --

    /// Register a read-only observer of state snapshots.
    pub fn on_state_change(
        &mut self,
        callback: impl FnMut(&SimulationState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Hand the latest snapshot to subscribers and draw, on the same tick.
    fn publish(&mut self) {
        let state = self.scheduler.latest();
        if let Some(state) = state {
            for (_, callback) in self.subscribers.iter_mut() {
                callback(state);
            }
        }
        self.viewport.draw(self.camera.camera(), self.camera.config(), state);
    }

    /// Draw now unless the running loop will on its next frame.
    fn redraw_if_idle(&mut self) {
        if !self.scheduler.is_running() {
            self.viewport.draw(self.camera.camera(), self.camera.config(), self.scheduler.latest());
        }
    }

    // -- Camera --

    pub fn on_pointer_down(&mut self, x: f32, y: f32, pointer_id: i32, is_primary: bool) {
        self.handle_input(InputEvent::PointerDown { x, y, pointer_id, is_primary });
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32, pointer_id: i32) {
        self.handle_input(InputEvent::PointerMove { x, y, pointer_id });
    }

    pub fn on_pointer_up(&mut self, pointer_id: i32) {
        self.handle_input(InputEvent::PointerUp { pointer_id });
    }

    pub fn on_pointer_cancel(&mut self, pointer_id: i32) {
        self.handle_input(InputEvent::PointerCancel { pointer_id });
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if self.camera.handle(event) {
            self.redraw_if_idle();
        }
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
        self.redraw_if_idle();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
        self.redraw_if_idle();
    }

    pub fn set_zoom(&mut self, level: f32) {
        self.camera.set_zoom(level);
        self.redraw_if_idle();
    }

    pub fn reset_view(&mut self) {
        self.camera.reset_view();
        self.redraw_if_idle();
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.camera.toggle_auto_rotate()
    }

    // -- Viewport --

    /// Take a drawing surface with a fresh camera. Remounting releases the
    /// previous surface.
    pub fn mount(&mut self, renderer: R, kind: SceneKind) {
        self.viewport.mount(renderer, kind, &self.config.globe_assets());
        // Each mount starts from the configured view.
        self.camera = OrbitCameraController::new(self.config.camera.clone());
        let (width, height) = self.viewport.size();
        self.camera.set_viewport(width, height);
        if kind == SceneKind::Globe && !self.scheduler.has_model() {
            // Render-only spin. A selected simulation waits for play().
            self.scheduler.start();
        }
        self.redraw_if_idle();
    }

    /// Deliver a texture load result. Returns false if it was discarded.
    pub fn on_asset_loaded(
        &mut self,
        ticket: AssetTicket,
        result: Result<TextureInfo, AssetError>,
    ) -> bool {
        let accepted = self.viewport.on_asset_loaded(ticket, result);
        if accepted {
            self.redraw_if_idle();
        }
        accepted
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
        self.camera.set_viewport(width, height);
        self.redraw_if_idle();
    }

    /// Tear everything down: loop, model, parameters, camera listeners and
    /// surface. Safe to call repeatedly and before loading finished.
    pub fn unmount(&mut self) {
        self.scheduler.dispose();
        self.params = None;
        self.camera.detach();
        self.viewport.dispose();
    }

    // -- Accessors --

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn kind(&self) -> Option<SimulationKind> {
        self.params.as_ref().map(ParameterStore::kind)
    }

    pub fn params(&self) -> Option<&ParameterStore> {
        self.params.as_ref()
    }

    pub fn state(&self) -> Option<&SimulationState> {
        self.scheduler.latest()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn simulated_time(&self) -> f64 {
        self.scheduler.simulated_time()
    }

    pub fn camera(&self) -> &CameraState {
        self.camera.camera()
    }

    pub fn is_dragging(&self) -> bool {
        self.camera.is_dragging()
    }

    pub fn viewport(&self) -> &Viewport<R> {
        &self.viewport
    }

    pub fn phase(&self) -> ViewportPhase {
        self.viewport.phase()
    }

    pub fn is_loaded(&self) -> bool {
        self.viewport.is_loaded()
    }

    pub fn frames(&self) -> &F {
        self.scheduler.frames()
    }

    pub fn frames_mut(&mut self) -> &mut F {
        self.scheduler.frames_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_config() {
        let json = r#"{
            "globe_texture": "img/earth-night.jpg",
            "camera": { "sensitivity": 0.01, "max_distance": 20.0 }
        }"#;
        let config = LabConfig::from_json(json).unwrap();
        assert_eq!(config.globe_texture, "img/earth-night.jpg");
        assert_eq!(config.camera.sensitivity, 0.01);
        assert_eq!(config.camera.max_distance, 20.0);
        assert_eq!(config.camera.min_distance, 1.5);
        assert_eq!(config.star_count, 1000);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(LabConfig::from_json("{}").unwrap(), LabConfig::default());
    }
}
