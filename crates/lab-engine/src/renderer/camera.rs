use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::Deserialize;

/// Tuning for the orbit camera. Loaded as part of `LabConfig`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Radians of yaw per pixel of horizontal drag.
    pub sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per zoom-in / zoom-out command.
    pub zoom_step: f32,
    pub default_yaw: f32,
    pub default_pitch: f32,
    pub default_distance: f32,
    /// Radians of yaw added per frame while auto-rotating.
    pub auto_rotate_speed: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            min_distance: 1.5,
            max_distance: 10.0,
            zoom_step: 0.5,
            default_yaw: 0.0,
            default_pitch: 0.0,
            default_distance: 3.0,
            auto_rotate_speed: 0.002,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Orbit camera around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    /// Rotation around the Y axis (radians).
    pub yaw: f32,
    /// Elevation above the equator (radians).
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
    pub auto_rotate_enabled: bool,
    /// Viewport width / height.
    pub aspect: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            yaw: config.default_yaw,
            pitch: config.default_pitch,
            distance: config.default_distance,
            auto_rotate_enabled: true,
            aspect: 1.0,
        }
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Perspective projection, Z in [0, 1].
    pub fn projection_matrix(&self, config: &CameraConfig) -> Mat4 {
        Mat4::perspective_rh(
            config.fov_y_degrees.to_radians(),
            self.aspect,
            config.near,
            config.far,
        )
    }

    pub fn uniform(&self, config: &CameraConfig) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view_proj: (self.projection_matrix(config) * self.view_matrix()).to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }

    /// Track a new surface size. Degenerate sizes keep the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_on_positive_z() {
        let cam = CameraState::new(&CameraConfig::default());
        let eye = cam.eye();
        assert!(eye.x.abs() < 1e-6);
        assert!(eye.y.abs() < 1e-6);
        assert!((eye.z - 3.0).abs() < 1e-6);
    }

    #[test]
    fn yaw_swings_eye_around_y() {
        let mut cam = CameraState::new(&CameraConfig::default());
        cam.yaw = std::f32::consts::FRAC_PI_2;
        let eye = cam.eye();
        assert!((eye.x - 3.0).abs() < 1e-5);
        assert!(eye.z.abs() < 1e-5);
        assert!((eye.length() - cam.distance).abs() < 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let config = CameraConfig::default();
        let mut cam = CameraState::new(&config);
        cam.set_viewport(1280, 720);
        let m = Mat4::from_cols_array_2d(&cam.uniform(&config).view_proj);
        let clip = m * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }

    #[test]
    fn zero_sized_viewport_keeps_aspect() {
        let mut cam = CameraState::new(&CameraConfig::default());
        cam.set_viewport(800, 400);
        cam.set_viewport(0, 400);
        assert_eq!(cam.aspect, 2.0);
    }
}
