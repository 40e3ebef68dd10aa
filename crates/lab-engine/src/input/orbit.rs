//! Drag-to-rotate camera control.
//!
//! Horizontal drag turns the globe. Vertical drag is read but does not
//! change pitch; the globe only spins around its axis.

use crate::input::event::InputEvent;
use crate::renderer::camera::{CameraConfig, CameraState};

/// A drag in progress. Lives between pointer-down and pointer-up/cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragGesture {
    pub active: bool,
    pub last_pointer_x: f32,
    pub last_pointer_y: f32,
    /// Contact that owns the drag.
    pub pointer_id: i32,
}

/// Turns pointer gestures and view commands into camera changes.
pub struct OrbitCameraController {
    config: CameraConfig,
    camera: CameraState,
    gesture: DragGesture,
    /// Cleared when the viewport is torn down; events are ignored afterwards.
    listening: bool,
}

impl OrbitCameraController {
    pub fn new(config: CameraConfig) -> Self {
        let camera = CameraState::new(&config);
        Self {
            config,
            camera,
            gesture: DragGesture::default(),
            listening: true,
        }
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.active
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Route a raw pointer event. Returns true if the camera changed.
    /// Only the primary contact starts a drag; other contacts are ignored.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        if !self.listening {
            return false;
        }
        match event {
            InputEvent::PointerDown { x, y, pointer_id, is_primary } => {
                if is_primary {
                    self.on_drag_start(x, y);
                    self.gesture.pointer_id = pointer_id;
                }
                false
            }
            InputEvent::PointerMove { x, y, pointer_id } => {
                if self.gesture.active && pointer_id == self.gesture.pointer_id {
                    self.on_drag_move(x, y)
                } else {
                    false
                }
            }
            InputEvent::PointerUp { pointer_id } | InputEvent::PointerCancel { pointer_id } => {
                if pointer_id == self.gesture.pointer_id {
                    self.on_drag_end();
                }
                false
            }
        }
    }

    /// Begin a drag. A gesture left over from a missed pointer-up is replaced.
    pub fn on_drag_start(&mut self, x: f32, y: f32) {
        self.gesture = DragGesture {
            active: true,
            last_pointer_x: x,
            last_pointer_y: y,
            pointer_id: 0,
        };
    }

    /// Apply horizontal movement to yaw. Returns true if the camera changed.
    pub fn on_drag_move(&mut self, x: f32, y: f32) -> bool {
        if !self.gesture.active {
            return false;
        }
        let dx = x - self.gesture.last_pointer_x;
        let _dy = y - self.gesture.last_pointer_y;
        self.camera.yaw += dx * self.config.sensitivity;
        self.gesture.last_pointer_x = x;
        self.gesture.last_pointer_y = y;
        dx != 0.0
    }

    pub fn on_drag_end(&mut self) {
        self.gesture = DragGesture::default();
    }

    /// Set the orbit distance, clamped to the configured range.
    pub fn set_zoom(&mut self, level: f32) {
        if level.is_finite() {
            self.camera.distance = level.clamp(self.config.min_distance, self.config.max_distance);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.camera.distance - self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.camera.distance + self.config.zoom_step);
    }

    /// Restore the default orientation and distance. Auto-rotate is left as is.
    pub fn reset_view(&mut self) {
        self.camera.yaw = self.config.default_yaw;
        self.camera.pitch = self.config.default_pitch;
        self.camera.distance = self.config.default_distance;
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.camera.auto_rotate_enabled = !self.camera.auto_rotate_enabled;
        self.camera.auto_rotate_enabled
    }

    /// Per-frame idle spin. Returns true if the camera changed.
    pub fn tick(&mut self) -> bool {
        if self.camera.auto_rotate_enabled && !self.gesture.active {
            self.camera.yaw += self.config.auto_rotate_speed;
            true
        } else {
            false
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Stop listening and drop any gesture in flight.
    pub fn detach(&mut self) {
        self.on_drag_end();
        self.listening = false;
    }

    /// Listen again, keeping the current camera.
    pub fn attach(&mut self) {
        self.listening = true;
    }
}
