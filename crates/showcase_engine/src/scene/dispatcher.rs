//! Animation Dispatcher - the per-frame tick
//!
//! Each tick:
//! 1. clamp the raw frame delta
//! 2. advance every mixer
//! 3. run the active scene's animate step
//! 4. render the container from the camera
//!
//! A failing animate step is logged and, when `freeze_on_error` is set,
//! the scene is frozen: mixers and scripts stop, rendering continues, and
//! the next scene switch unfreezes. A panic inside animate is caught and
//! treated as a failure.

use super::catalog::{SceneError, SceneId};
use super::generation::Generation;
use super::manager::SceneLifecycleManager;
use crate::core::config::DispatcherConfig;
use crate::foundation::time::FrameClock;
use crate::render::Renderer;
use std::panic::{self, AssertUnwindSafe};

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No scene, or the scene has no animate step
    Idle,
    /// Animating a scene
    Active {
        /// Scene being animated
        scene: SceneId,
        /// Generation the scene was loaded under
        generation: Generation,
    },
    /// Animate failed; actors hold their last state until the next switch
    Frozen {
        /// Scene that failed
        scene: SceneId,
        /// Generation the scene was loaded under
        generation: Generation,
    },
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Clamped elapsed time handed to mixers and animate
    pub elapsed: f32,
    /// Whether the scene's animate step ran and succeeded
    pub animated: bool,
    /// Whether the frame was rendered
    pub rendered: bool,
    /// State after the tick
    pub state: DispatcherState,
}

/// Dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Ticks dispatched
    pub ticks: u64,
    /// Animate failures
    pub animate_failures: u64,
    /// Render failures
    pub render_failures: u64,
}

/// Drives mixers, scene scripts and rendering once per frame
#[derive(Debug, Clone)]
pub struct AnimationDispatcher {
    clock: FrameClock,
    freeze_on_error: bool,
    state: DispatcherState,
    stats: DispatchStats,
}

impl AnimationDispatcher {
    /// Create a dispatcher
    pub fn new(config: &DispatcherConfig) -> Self {
        Self {
            clock: FrameClock::new(config.max_frame_delta),
            freeze_on_error: config.freeze_on_error,
            state: DispatcherState::Idle,
            stats: DispatchStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// Counters
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// The clamping clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    fn sync(&mut self, manager: &SceneLifecycleManager) {
        let generation = manager.generation();
        let current = match self.state {
            DispatcherState::Active { generation, .. } | DispatcherState::Frozen { generation, .. } => {
                Some(generation)
            }
            DispatcherState::Idle => None,
        };
        if current == Some(generation) {
            return;
        }
        self.state = match manager.active() {
            Some(scene) if manager.active_is_animated() => DispatcherState::Active { scene, generation },
            _ => DispatcherState::Idle,
        };
    }

    /// Run one frame
    pub fn tick(
        &mut self,
        manager: &mut SceneLifecycleManager,
        renderer: &mut dyn Renderer,
        raw_elapsed: f32,
    ) -> TickReport {
        self.sync(manager);
        let elapsed = self.clock.advance(raw_elapsed);
        self.stats.ticks += 1;

        let mut animated = false;
        if !matches!(self.state, DispatcherState::Frozen { .. }) {
            manager.advance_mixers(elapsed);
        }
        if let DispatcherState::Active { scene, generation } = self.state {
            match animate_guarded(manager, elapsed) {
                Ok(()) => animated = true,
                Err(e) => {
                    self.stats.animate_failures += 1;
                    if self.freeze_on_error {
                        log::error!("Scene {} animation failed, freezing until next switch: {}", scene, e);
                        self.state = DispatcherState::Frozen { scene, generation };
                    } else {
                        log::error!("Scene {} animation failed: {}", scene, e);
                    }
                }
            }
        }

        let rendered = match renderer.render(manager.container(), manager.camera()) {
            Ok(()) => true,
            Err(e) => {
                self.stats.render_failures += 1;
                log::warn!("Render failed: {}", e);
                false
            }
        };

        TickReport {
            elapsed,
            animated,
            rendered,
            state: self.state,
        }
    }
}

fn animate_guarded(manager: &mut SceneLifecycleManager, elapsed: f32) -> Result<(), SceneError> {
    match panic::catch_unwind(AssertUnwindSafe(|| manager.animate_active(elapsed))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|text| (*text).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(SceneError::Animate(format!("panicked: {message}")))
        }
    }
}
