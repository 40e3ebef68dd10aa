pub mod camera;
pub mod scene;
pub mod traits;
pub mod viewport;
pub mod visual;

// Re-export key types for convenient access
pub use traits::{FrameData, Renderer};
