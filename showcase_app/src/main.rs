//! City showcase
//!
//! Headless run of every showcase scene: loads the configuration, builds the
//! catalog, then drives the frame loop through each scene in turn the way
//! a visitor clicking through the scene selector would.

mod config;
mod scenes;

use config::{AppConfig, Pacing, CONFIG_PATH};
use showcase_engine::assets::AssetLibrary;
use showcase_engine::config::Config;
use showcase_engine::foundation::logging;
use showcase_engine::foundation::time::Timer;
use showcase_engine::render::FrameRecorder;
use showcase_engine::{EngineError, Showcase};
use std::time::Duration;

const MANIFEST: &str = include_str!("../assets/manifest.ron");

pub struct ShowcaseApp {
    showcase: Showcase<FrameRecorder>,
    config: AppConfig,
    timer: Timer,
}

impl ShowcaseApp {
    pub fn new(config: AppConfig) -> Result<Self, EngineError> {
        log::info!("Creating showcase application...");
        let library = AssetLibrary::from_ron_str(MANIFEST)?;
        let catalog = scenes::catalog(config.demo.taxi_seed)?;
        let renderer = FrameRecorder::new(config.engine.viewport.width, config.engine.viewport.height);
        let showcase = Showcase::new(&config.engine, catalog, Box::new(library), renderer);
        Ok(Self {
            showcase,
            config,
            timer: Timer::new(),
        })
    }

    pub fn run(&mut self) -> Result<(), EngineError> {
        let first = self.showcase.start()?;
        self.timer = Timer::new();
        log::info!("Started on scene {}", first.scene);

        let ids: Vec<u32> = self.showcase.scenes().catalog().ids().collect();
        let halfway = ids.len() / 2;
        for (visited, id) in ids.into_iter().enumerate() {
            if self.showcase.scenes().active() != Some(id) && self.showcase.request_scene(&id.to_string()).is_none() {
                log::warn!("Selector refused scene {}", id);
                continue;
            }
            if visited == halfway {
                if let Some((width, height)) = self.config.demo.resize_to {
                    self.showcase.resize(width, height);
                }
            }
            self.play_scene(id);
        }

        let stats = self.showcase.dispatcher().stats();
        let loader = self.showcase.scenes().loader().stats();
        log::info!(
            "Run complete: {} frames rendered, {} animate failures, {} render failures",
            self.showcase.renderer().frames_rendered(),
            stats.animate_failures,
            stats.render_failures
        );
        log::info!(
            "Assets: {} requested, {} resolved, {} failed, {} discarded",
            loader.requested,
            loader.resolved,
            loader.failed,
            loader.discarded
        );
        Ok(())
    }

    fn play_scene(&mut self, id: u32) {
        let name = self.showcase.scenes().catalog().name(id).unwrap_or("?").to_string();
        log::info!("Playing scene {} ({})", id, name);
        for _ in 0..self.config.demo.frames_per_scene {
            let raw = self.next_delta();
            self.showcase.frame(raw);
        }

        if let Some(frame) = self.showcase.renderer().last_frame() {
            log::info!(
                "Scene {} after {} frames: {} meshes, {} lights, fog {}, camera at ({:.1}, {:.1}, {:.1}) fov {:.1}",
                name,
                self.config.demo.frames_per_scene,
                frame.meshes,
                frame.lights,
                if frame.fog { "on" } else { "off" },
                frame.camera_position.x,
                frame.camera_position.y,
                frame.camera_position.z,
                frame.camera_fov
            );
        }
    }

    fn next_delta(&mut self) -> f32 {
        match self.config.demo.pacing {
            Pacing::Fixed => self.config.demo.frame_delta,
            Pacing::WallClock => {
                std::thread::sleep(Duration::from_secs_f32(self.config.demo.frame_delta.max(0.0)));
                self.timer.update()
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default(CONFIG_PATH)?;
    logging::init_with_filter(&config.engine.startup.log_filter);
    log::info!("Starting city showcase");

    let mut app = ShowcaseApp::new(config)?;
    match app.run() {
        Ok(()) => {
            log::info!("Showcase finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Showcase error: {}", e);
            Err(e.into())
        }
    }
}
