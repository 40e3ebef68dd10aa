//! `#[wasm_bindgen]` exports for the lab engine.
//!
//! A single `Lab` lives in thread-local storage. JS forwards slider edits,
//! buttons and pointer events; animation frames arrive through the
//! `requestAnimationFrame` closure owned by [`BrowserFrames`].

pub mod runner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use lab_engine::{
    AssetError, AssetTicket, Lab, LabConfig, SceneKind, SimulationKind, SubscriptionId,
    TextureInfo,
};

pub use runner::{BrowserFrames, JsSurface, CAMERA_FLOATS};

type WebLab = Lab<BrowserFrames, JsSurface>;

thread_local! {
    static LAB: RefCell<Option<WebLab>> = const { RefCell::new(None) };
}

/// Run `f` against the lab. Calls made before `lab_init` are logged and skipped.
fn with_lab<R: Default>(f: impl FnOnce(&mut WebLab) -> R) -> R {
    LAB.with(|cell| match cell.borrow_mut().as_mut() {
        Some(lab) => f(lab),
        None => {
            log::warn!("lab not initialized; call lab_init() first");
            R::default()
        }
    })
}

fn on_animation_frame(timestamp: f64) {
    with_lab(|lab| {
        if let Some(handle) = lab.frames_mut().take_pending() {
            lab.on_frame(handle, timestamp);
        }
    });
}

/// Create the lab. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn lab_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        LabConfig::default()
    } else {
        LabConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("invalid lab config, using defaults: {err}");
            LabConfig::default()
        })
    };

    let lab = Lab::new(config, BrowserFrames::new(on_animation_frame));
    LAB.with(|cell| {
        if let Some(mut old) = cell.borrow_mut().replace(lab) {
            old.unmount();
        }
    });
    log::info!("lab-web: initialized");
}

// ---- Simulation control ----

#[wasm_bindgen]
pub fn lab_select_simulation(kind: &str) -> bool {
    match kind.parse::<SimulationKind>() {
        Ok(kind) => with_lab(|lab| {
            lab.select_simulation(kind);
            true
        }),
        Err(err) => {
            log::warn!("{err}");
            false
        }
    }
}

#[wasm_bindgen]
pub fn lab_update_parameter(name: &str, value: f64) -> bool {
    with_lab(|lab| lab.update_parameter(name, value).is_ok())
}

#[wasm_bindgen]
pub fn lab_update_parameter_str(name: &str, raw: &str) -> bool {
    with_lab(|lab| lab.update_parameter_str(name, raw).is_ok())
}

#[wasm_bindgen]
pub fn lab_play() {
    with_lab(|lab| lab.play());
}

#[wasm_bindgen]
pub fn lab_pause() {
    with_lab(|lab| lab.pause());
}

#[wasm_bindgen]
pub fn lab_reset() {
    with_lab(|lab| lab.reset());
}

#[wasm_bindgen]
pub fn lab_is_running() -> bool {
    with_lab(|lab| lab.is_running())
}

// ---- State readouts ----

/// Call `callback(stateJson)` on every published snapshot. Returns an id for
/// `lab_unsubscribe`. The callback runs while the lab is borrowed and must
/// not call back into these exports.
#[wasm_bindgen]
pub fn lab_on_state_change(callback: js_sys::Function) -> u32 {
    with_lab(|lab| {
        let id = lab.on_state_change(move |state| match serde_json::to_string(state) {
            Ok(json) => {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::error!("state callback threw: {err:?}");
                }
            }
            Err(err) => log::error!("state serialization failed: {err}"),
        });
        id.0
    })
}

#[wasm_bindgen]
pub fn lab_unsubscribe(id: u32) -> bool {
    with_lab(|lab| lab.unsubscribe(SubscriptionId(id)))
}

#[wasm_bindgen]
pub fn lab_state_json() -> String {
    with_lab(|lab| to_json(&lab.state()))
}

#[wasm_bindgen]
pub fn lab_params_json() -> String {
    with_lab(|lab| to_json(&lab.params()))
}

#[wasm_bindgen]
pub fn lab_simulated_time() -> f64 {
    with_lab(|lab| lab.simulated_time())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("serialization failed: {err}");
        String::from("null")
    })
}

// ---- Camera ----

#[wasm_bindgen]
pub fn lab_pointer_down(x: f32, y: f32, pointer_id: i32, is_primary: bool) {
    with_lab(|lab| lab.on_pointer_down(x, y, pointer_id, is_primary));
}

#[wasm_bindgen]
pub fn lab_pointer_move(x: f32, y: f32, pointer_id: i32) {
    with_lab(|lab| lab.on_pointer_move(x, y, pointer_id));
}

#[wasm_bindgen]
pub fn lab_pointer_up(pointer_id: i32) {
    with_lab(|lab| lab.on_pointer_up(pointer_id));
}

#[wasm_bindgen]
pub fn lab_pointer_cancel(pointer_id: i32) {
    with_lab(|lab| lab.on_pointer_cancel(pointer_id));
}

#[wasm_bindgen]
pub fn lab_zoom_in() {
    with_lab(|lab| lab.zoom_in());
}

#[wasm_bindgen]
pub fn lab_zoom_out() {
    with_lab(|lab| lab.zoom_out());
}

#[wasm_bindgen]
pub fn lab_reset_view() {
    with_lab(|lab| lab.reset_view());
}

#[wasm_bindgen]
pub fn lab_toggle_auto_rotate() -> bool {
    with_lab(|lab| lab.toggle_auto_rotate())
}

// ---- Viewport ----

/// Mount the JS surface. `globe` selects the textured-globe scene.
#[wasm_bindgen]
pub fn lab_mount(globe: bool) {
    let kind = if globe { SceneKind::Globe } else { SceneKind::Simulation };
    with_lab(|lab| lab.mount(JsSurface::new(), kind));
}

#[wasm_bindgen]
pub fn lab_unmount() {
    with_lab(|lab| lab.unmount());
}

#[wasm_bindgen]
pub fn lab_resize(width: u32, height: u32) {
    with_lab(|lab| lab.resize(width, height));
}

#[wasm_bindgen]
pub fn lab_texture_loaded(ticket: u32, path: &str, width: u32, height: u32) -> bool {
    let texture = TextureInfo::new(path, width, height);
    with_lab(|lab| lab.on_asset_loaded(AssetTicket(ticket), Ok(texture)))
}

#[wasm_bindgen]
pub fn lab_texture_failed(ticket: u32, path: &str, reason: &str) -> bool {
    let err = AssetError::LoadFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    with_lab(|lab| lab.on_asset_loaded(AssetTicket(ticket), Err(err)))
}

#[wasm_bindgen]
pub fn lab_is_loaded() -> bool {
    with_lab(|lab| lab.is_loaded())
}

#[wasm_bindgen]
pub fn lab_phase() -> String {
    with_lab(|lab| to_json(&lab.phase()))
}

// ---- Frame buffers ----

#[wasm_bindgen]
pub fn get_camera_ptr() -> *const f32 {
    with_lab(|lab| lab.viewport().renderer().map(JsSurface::camera_ptr))
        .unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_camera_floats() -> u32 {
    CAMERA_FLOATS as u32
}

#[wasm_bindgen]
pub fn lab_frame_json() -> String {
    with_lab(|lab| {
        lab.viewport()
            .renderer()
            .map_or_else(|| String::from("null"), |s| s.frame_json().to_string())
    })
}
