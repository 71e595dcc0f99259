//! # Showcase Configuration
//!
//! All tunables for the lifecycle manager, dispatcher, loader and viewport in
//! one serializable tree. Every section has defaults, so a config file only
//! needs the keys it wants to override:
//!
//! ```toml
//! [dispatcher]
//! max_frame_delta = 0.05
//!
//! [startup]
//! initial_scene = 3
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Root configuration for a showcase run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Animation dispatch settings
    pub dispatcher: DispatcherConfig,
    /// Output surface size
    pub viewport: ViewportConfig,
    /// Shared camera defaults
    pub camera: CameraConfig,
    /// Asset loader behaviour
    pub loader: LoaderConfig,
    /// What to do on start
    pub startup: StartupConfig,
}

impl Config for ShowcaseConfig {}

/// Per-frame dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Cap on elapsed seconds handed to animators in a single tick
    pub max_frame_delta: f32,
    /// Stop calling a scene's animator after it fails, until the next switch
    pub freeze_on_error: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.1,
            freeze_on_error: true,
        }
    }
}

/// Output surface size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ViewportConfig {
    /// Width over height, guarding against a zero height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Camera defaults applied once at startup
///
/// The camera is never recreated on a scene switch; scenes adjust it in
/// their `load` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Initial camera position
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 2000.0,
            position: [0.0, 0.0, 5.0],
        }
    }
}

/// Asset loader behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Number of loader pumps a request waits before resolving
    pub latency_frames: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { latency_frames: 1 }
    }
}

/// Startup behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Scene loaded when the showcase starts
    pub initial_scene: u32,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_scene: 1,
            log_filter: "info".to_string(),
        }
    }
}
