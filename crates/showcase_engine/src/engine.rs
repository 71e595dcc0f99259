//! Showcase engine loop
//!
//! Ties the lifecycle manager, dispatcher, renderer and input shell
//! together. One [`Showcase::frame`] call is one display refresh: resolved
//! asset loads are delivered first, then the dispatcher ticks.

use crate::assets::{AssetError, AssetSource};
use crate::config::ConfigError;
use crate::core::config::ShowcaseConfig;
use crate::foundation::math::Vec3;
use crate::render::{Camera, Renderer};
use crate::scene::{
    AnimationDispatcher, DeliveryReport, SceneCatalog, SceneError, SceneLifecycleManager, SwitchReport, TickReport,
};
use crate::ui::{SceneSelector, Viewport};
use thiserror::Error;

/// Top-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene catalog or switch error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Asset manifest error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Asset completions handled before the tick
    pub delivery: DeliveryReport,
    /// The dispatcher tick
    pub tick: TickReport,
}

/// A running showcase
pub struct Showcase<R: Renderer> {
    scenes: SceneLifecycleManager,
    dispatcher: AnimationDispatcher,
    renderer: R,
    selector: SceneSelector,
    viewport: Viewport,
    initial_scene: u32,
}

impl<R: Renderer> Showcase<R> {
    /// Build a showcase; no scene is loaded until [`start`](Self::start)
    pub fn new(config: &ShowcaseConfig, catalog: SceneCatalog, source: Box<dyn AssetSource>, mut renderer: R) -> Self {
        let camera = Camera::perspective(
            Vec3::from(config.camera.position),
            config.camera.fov_degrees,
            config.viewport.aspect(),
            config.camera.near,
            config.camera.far,
        );
        renderer.set_size(config.viewport.width, config.viewport.height);
        let selector = SceneSelector::new(catalog.len());
        log::info!(
            "Showcase initialised: {} scenes, {}x{} viewport",
            catalog.len(),
            config.viewport.width,
            config.viewport.height
        );
        Self {
            scenes: SceneLifecycleManager::new(catalog, source, camera, config.loader.latency_frames),
            dispatcher: AnimationDispatcher::new(&config.dispatcher),
            renderer,
            selector,
            viewport: Viewport::new(config.viewport.width, config.viewport.height),
            initial_scene: config.startup.initial_scene,
        }
    }

    /// Load the configured initial scene
    pub fn start(&mut self) -> Result<SwitchReport, EngineError> {
        Ok(self.scenes.switch_to(self.initial_scene)?)
    }

    /// Run one frame with the raw time since the previous one
    pub fn frame(&mut self, raw_elapsed: f32) -> FrameReport {
        let delivery = self.scenes.deliver_assets();
        let tick = self.dispatcher.tick(&mut self.scenes, &mut self.renderer, raw_elapsed);
        FrameReport { delivery, tick }
    }

    /// Type `text` into the selector and press the button
    ///
    /// Returns the switch report, or `None` when the input was rejected.
    pub fn request_scene(&mut self, text: &str) -> Option<SwitchReport> {
        self.selector.set_text(text);
        let id = self.selector.trigger(self.scenes.catalog())?;
        self.scenes.switch_to(id).ok()
    }

    /// Switch directly by id
    pub fn switch_to(&mut self, id: u32) -> Result<SwitchReport, SceneError> {
        self.scenes.switch_to(id)
    }

    /// Propagate a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport
            .resize(self.scenes.camera_mut(), &mut self.renderer, width, height);
    }

    /// Lifecycle manager
    pub fn scenes(&self) -> &SceneLifecycleManager {
        &self.scenes
    }

    /// Mutable lifecycle manager
    pub fn scenes_mut(&mut self) -> &mut SceneLifecycleManager {
        &mut self.scenes
    }

    /// Dispatcher
    pub fn dispatcher(&self) -> &AnimationDispatcher {
        &self.dispatcher
    }

    /// Renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Scene selector
    pub fn selector(&self) -> &SceneSelector {
        &self.selector
    }

    /// Viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
