//! Renderer trait implemented by the host's drawing surface.
//!
//! The engine owns lifecycle and state; the surface only draws what it is
//! handed and performs asynchronous texture loads on request.

use serde::Serialize;

use super::camera::CameraUniform;
use super::scene::SceneContents;
use super::visual::LabVisual;
use crate::api::types::AssetTicket;
use crate::sim::model::SimulationState;

/// Drawing surface contract.
///
/// # Example Implementation
///
/// ```ignore
/// struct CanvasSurface { ctx: web_sys::CanvasRenderingContext2d }
///
/// impl Renderer for CanvasSurface {
///     fn backend(&self) -> &'static str { "canvas2d" }
///     fn begin_texture_load(&mut self, ticket: AssetTicket, path: &str) {
///         // Start an image fetch; report back through Lab::on_asset_loaded.
///     }
///     fn draw(&mut self, frame: &FrameData) { /* ... */ }
///     fn resize(&mut self, width: u32, height: u32) { /* ... */ }
///     fn release(&mut self) { /* detach the canvas */ }
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "webgl", "canvas2d", "headless").
    fn backend(&self) -> &'static str;

    /// Start loading a texture. The result comes back later through
    /// `Lab::on_asset_loaded` carrying the same ticket.
    fn begin_texture_load(&mut self, ticket: AssetTicket, path: &str);

    /// Draw a complete frame.
    fn draw(&mut self, frame: &FrameData);

    /// Surface size changed. Recreate size-dependent buffers.
    fn resize(&mut self, width: u32, height: u32);

    /// Detach the surface and drop GPU/DOM resources. Called once.
    fn release(&mut self);
}

/// Everything needed to draw one frame.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData<'a> {
    #[serde(skip)]
    pub camera: CameraUniform,
    pub scene: &'a SceneContents,
    /// Latest simulation snapshot, if a simulation is loaded.
    pub state: Option<&'a SimulationState>,
    /// 2D visual built from `state`.
    pub visual: Option<LabVisual>,
    pub width: u32,
    pub height: u32,
}
