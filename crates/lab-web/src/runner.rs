use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use lab_engine::{AssetTicket, FrameData, FrameHandle, FrameScheduler, Renderer};

#[wasm_bindgen]
extern "C" {
    /// Host hook: fetch an image, then call `lab_texture_loaded` or
    /// `lab_texture_failed` with the same ticket.
    #[wasm_bindgen(js_name = labLoadTexture)]
    fn lab_load_texture(ticket: u32, path: &str);

    /// Host hook: detach the canvas and drop its listeners.
    #[wasm_bindgen(js_name = labReleaseSurface)]
    fn lab_release_surface();
}

/// `requestAnimationFrame`-backed frame scheduler.
///
/// One closure is created up front and reused for every request. The browser
/// only passes the timestamp, so the handle of the request that fired is kept
/// here and taken by the callback.
pub struct BrowserFrames {
    callback: Closure<dyn FnMut(f64)>,
    pending: Option<FrameHandle>,
}

impl BrowserFrames {
    pub fn new(on_frame: fn(f64)) -> Self {
        let callback = Closure::wrap(Box::new(move |ts: f64| on_frame(ts)) as Box<dyn FnMut(f64)>);
        Self {
            callback,
            pending: None,
        }
    }

    /// Claim the request that just fired.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for BrowserFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let id = web_sys::window()
            .and_then(|w| {
                w.request_animation_frame(self.callback.as_ref().unchecked_ref())
                    .ok()
            })
            .unwrap_or_else(|| {
                log::error!("requestAnimationFrame unavailable; loop will stall");
                0
            });
        let handle = FrameHandle(id as u64);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0 as i32);
        }
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

/// Floats per camera record: 4x4 view-projection plus eye position.
pub const CAMERA_FLOATS: usize = 20;

/// Surface whose actual drawing happens in JS.
/// Each frame is flattened into buffers the host reads after the tick.
pub struct JsSurface {
    camera: Vec<f32>,
    frame_json: String,
    width: u32,
    height: u32,
}

impl JsSurface {
    pub fn new() -> Self {
        Self {
            camera: vec![0.0; CAMERA_FLOATS],
            frame_json: String::from("null"),
            width: 0,
            height: 0,
        }
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.camera.as_ptr()
    }

    pub fn frame_json(&self) -> &str {
        &self.frame_json
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for JsSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsSurface {
    fn backend(&self) -> &'static str {
        "webgl"
    }

    fn begin_texture_load(&mut self, ticket: AssetTicket, path: &str) {
        lab_load_texture(ticket.0, path);
    }

    fn draw(&mut self, frame: &FrameData) {
        self.camera.clear();
        self.camera.extend(frame.camera.view_proj.iter().flatten());
        self.camera.extend(frame.camera.eye);

        match serde_json::to_string(frame) {
            Ok(json) => self.frame_json = json,
            Err(err) => log::error!("frame serialization failed: {err}"),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn release(&mut self) {
        self.frame_json = String::from("null");
        lab_release_surface();
    }
}
