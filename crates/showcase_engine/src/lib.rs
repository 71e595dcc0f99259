//! # Showcase Engine
//!
//! Scene lifecycle and per-frame animation dispatch for a switchable 3D
//! scene showcase.
//!
//! ## Features
//!
//! - **Scene switching**: complete, ordered teardown of the previous scene
//!   before the next one loads, with the camera preserved
//! - **Frame dispatch**: clamped elapsed time, mixers, scene scripts and
//!   rendering in a fixed order; a failing script freezes its scene
//!   instead of stopping the loop
//! - **Stale load protection**: asset completions carry the generation
//!   they were requested under and are dropped once it has passed
//! - **Motion primitives**: patrol, timed cycle, orbit, path follow and
//!   color ramp building blocks for scene scripts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use showcase_engine::prelude::*;
//!
//! struct Lobby;
//!
//! impl SceneModule for Lobby {
//!     fn name(&self) -> &str {
//!         "lobby"
//!     }
//!
//!     fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
//!         ctx.container.add_light("ambient", Light::ambient(Color::WHITE, 1.0));
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     let catalog = SceneCatalog::builder().register(1, Lobby).build()?;
//!     let config = ShowcaseConfig::default();
//!     let mut showcase = Showcase::new(&config, catalog, Box::new(AssetLibrary::new()), FrameRecorder::new(1280, 720));
//!     showcase.start()?;
//!     showcase.frame(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod core;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod ui;

mod engine;

pub use engine::{EngineError, FrameReport, Showcase};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{
            AnimationClip, AnimationMixer, BoundPolicy, CameraSnapshot, CatmullRomCurve, ChannelRamp, LinearPatrol,
            LoopMode, OrbitPhase, OrbitRig, PathFollower, Rate, StateSnapshot, TimedCycle,
        },
        assets::{AssetError, AssetLibrary, AssetSource, MaterialTemplate, ModelTemplate, NodeTemplate},
        config::Config,
        core::config::ShowcaseConfig,
        foundation::math::{utils::deg_to_rad, Axis, Transform, Vec3},
        render::{
            Camera, Color, FrameRecorder, GeometryDesc, MaterialDesc, OrbitControls, Renderer, TextureDesc,
        },
        scene::{
            AnimateContext, Fog, HelperKind, Light, LoadContext, MaterialSlot, NodeKey, SceneCatalog, SceneContainer,
            SceneError, SceneModule, SceneNode, ShadowCamera, StageContext,
        },
        ui::DebugPanel,
        EngineError, FrameReport, Showcase,
    };
}
