//! Drawing-surface lifecycle.
//!
//! `Uninitialized → Loading → Ready → Disposed`. A simulation view has no
//! assets and goes straight to `Ready`. Teardown works from any phase and
//! can be repeated.

use serde::Serialize;

use super::camera::{CameraConfig, CameraState};
use super::scene::{SceneContents, SceneKind};
use super::traits::{FrameData, Renderer};
use super::visual::LabVisual;
use crate::api::types::AssetTicket;
use crate::assets::texture::{AssetError, TextureInfo};
use crate::sim::model::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewportPhase {
    Uninitialized,
    Loading,
    Ready,
    Disposed,
}

/// Where the globe texture and starfield come from.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeAssets {
    pub texture_path: String,
    pub star_count: usize,
    pub star_radius: f32,
    pub star_seed: u64,
}

pub struct Viewport<R: Renderer> {
    phase: ViewportPhase,
    renderer: Option<R>,
    scene: SceneContents,
    scene_kind: Option<SceneKind>,
    width: u32,
    height: u32,
    pending_texture: Option<(AssetTicket, String)>,
    next_ticket: u32,
    loaded: bool,
}

impl<R: Renderer> Viewport<R> {
    pub fn new() -> Self {
        Self {
            phase: ViewportPhase::Uninitialized,
            renderer: None,
            scene: SceneContents::default(),
            scene_kind: None,
            width: 0,
            height: 0,
            pending_texture: None,
            next_ticket: 1,
            loaded: false,
        }
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    /// The globe mesh is attached. Drives the host's loading indicator.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn scene(&self) -> &SceneContents {
        &self.scene
    }

    pub fn scene_kind(&self) -> Option<SceneKind> {
        self.scene_kind
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Take ownership of the surface and build the scene. Mounting over a
    /// live surface tears the old one down first.
    pub fn mount(&mut self, mut renderer: R, kind: SceneKind, assets: &GlobeAssets) {
        if self.renderer.is_some() {
            self.dispose();
        }
        self.loaded = false;
        self.scene_kind = Some(kind);

        match kind {
            SceneKind::Globe => {
                self.scene = SceneContents::globe_backdrop(
                    assets.star_count,
                    assets.star_radius,
                    assets.star_seed,
                );
                let ticket = AssetTicket(self.next_ticket);
                self.next_ticket += 1;
                renderer.begin_texture_load(ticket, &assets.texture_path);
                self.pending_texture = Some((ticket, assets.texture_path.clone()));
                self.phase = ViewportPhase::Loading;
            }
            SceneKind::Simulation => {
                self.scene = SceneContents::simulation();
                self.pending_texture = None;
                self.phase = ViewportPhase::Ready;
            }
        }
        log::info!("viewport: mounted {:?} on {}", kind, renderer.backend());
        self.renderer = Some(renderer);
    }

    /// Deliver a texture load result. Returns false when the result was
    /// discarded (viewport gone, or a ticket nobody waits on).
    pub fn on_asset_loaded(
        &mut self,
        ticket: AssetTicket,
        result: Result<TextureInfo, AssetError>,
    ) -> bool {
        let waiting = matches!(&self.pending_texture, Some((t, _)) if *t == ticket);
        if self.phase != ViewportPhase::Loading || !waiting {
            log::debug!("viewport: discarding late texture {:?}", ticket);
            return false;
        }
        self.pending_texture = None;

        match result.and_then(TextureInfo::validate) {
            Ok(texture) => {
                log::info!("viewport: globe texture {} ready", texture.path);
                self.scene.attach_globe(texture);
                self.loaded = true;
            }
            Err(err) => {
                log::error!("viewport: {err}; continuing without globe");
            }
        }
        self.phase = ViewportPhase::Ready;
        true
    }

    /// Record the new surface size and forward it. Camera and loop are untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    /// Draw if mounted. A scene still waiting on its texture draws without it.
    pub fn draw(
        &mut self,
        camera: &CameraState,
        camera_config: &CameraConfig,
        state: Option<&SimulationState>,
    ) -> bool {
        if !matches!(self.phase, ViewportPhase::Loading | ViewportPhase::Ready) {
            return false;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return false;
        };
        let frame = FrameData {
            camera: camera.uniform(camera_config),
            scene: &self.scene,
            state,
            visual: state.map(LabVisual::from_state),
            width: self.width,
            height: self.height,
        };
        renderer.draw(&frame);
        true
    }

    /// Release the surface. Safe from any phase, safe to repeat.
    pub fn dispose(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.release();
            log::info!("viewport: released {}", renderer.backend());
        }
        self.pending_texture = None;
        self.scene = SceneContents::default();
        self.loaded = false;
        if self.phase != ViewportPhase::Uninitialized {
            self.phase = ViewportPhase::Disposed;
        }
    }
}

impl<R: Renderer> Default for Viewport<R> {
    fn default() -> Self {
        Self::new()
    }
}
