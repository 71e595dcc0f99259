//! Application configuration
//!
//! `showcase.toml` next to the binary, every key optional:
//!
//! ```toml
//! [engine.startup]
//! initial_scene = 4
//!
//! [demo]
//! frames_per_scene = 600
//! ```

use serde::{Deserialize, Serialize};
use showcase_engine::config::Config;
use showcase_engine::core::config::ShowcaseConfig;

/// Default config file name
pub const CONFIG_PATH: &str = "showcase.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: ShowcaseConfig,
    pub demo: DemoConfig,
}

impl Config for AppConfig {}

/// Where frame deltas come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    /// Every frame reports `frame_delta`
    #[default]
    Fixed,
    /// Sleep `frame_delta` between frames and report the measured wall-clock time
    WallClock,
}

/// Headless run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Frames rendered before moving to the next scene
    pub frames_per_scene: u32,
    /// Simulated display interval in seconds
    pub frame_delta: f32,
    /// Fixed or measured frame deltas
    pub pacing: Pacing,
    /// Seed for the taxi rank spawns
    pub taxi_seed: u64,
    /// Surface size applied halfway through the run, if any
    pub resize_to: Option<(u32, u32)>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames_per_scene: 240,
            frame_delta: 1.0 / 60.0,
            pacing: Pacing::Fixed,
            taxi_seed: 12,
            resize_to: Some((1920, 1080)),
        }
    }
}
