pub mod api;
pub mod core;
pub mod sim;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::lab::{Lab, LabConfig};
pub use api::types::{AssetTicket, FrameHandle, SimulationKind, SubscriptionId, UnknownKind};
pub use core::params::{Param, ParamError, ParamSpec, ParameterStore, SIMULATION_SPEED};
pub use core::scheduler::{AnimationLoop, AnimationScheduler, FrameScheduler, ManualFrames, Tick};
pub use core::time::FixedTimestep;
pub use sim::model::{SimulationModel, SimulationState};
pub use sim::free_fall::FreeFall;
pub use sim::pendulum::Pendulum;
pub use sim::projectile::ProjectileMotion;
pub use sim::titration::Titration;
pub use sim::circuit::ResistiveCircuit;
pub use input::event::InputEvent;
pub use input::orbit::{DragGesture, OrbitCameraController};
pub use renderer::camera::{CameraConfig, CameraState, CameraUniform};
pub use renderer::scene::{GlobeMesh, Light, SceneContents, SceneKind, Star};
pub use renderer::viewport::{Viewport, ViewportPhase};
pub use renderer::visual::LabVisual;
pub use renderer::{FrameData, Renderer};
pub use assets::texture::{AssetError, TextureInfo};
