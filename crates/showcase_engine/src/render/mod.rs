//! Rendering boundary
//!
//! The showcase never talks to a graphics API directly. This module holds
//! the pieces the core needs from a renderer:
//! - [`ResourceRegistry`]: CPU-side tracking of GPU allocations so scene
//!   teardown can release every geometry, material and texture it created
//! - [`Camera`] / [`OrbitControls`]: the long-lived view shared by all scenes
//! - [`Renderer`]: the per-frame draw call and resize hook

pub mod camera;
pub mod color;
pub mod renderer;
pub mod resources;

pub use camera::{Camera, OrbitControls};
pub use color::Color;
pub use renderer::{FrameRecorder, FrameStats, RenderError, Renderer};
pub use resources::{
    GeometryDesc, GeometryHandle, MaterialDesc, MaterialHandle, ResourceError, ResourceRegistry,
    ResourceStats, TextureDesc, TextureHandle,
};
