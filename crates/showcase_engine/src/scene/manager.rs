//! Scene Lifecycle Manager
//!
//! Owns the container, the actor and mixer lists, the shared camera and
//! controls, and the asset loader. [`SceneLifecycleManager::switch_to`] is
//! the only way scenes change.
//!
//! ## Teardown order
//! 1. Unbind every mixer from its target, clear the mixer list
//! 2. Detach and dispose every actor subtree, clear the actor list
//! 3. Dispose every light, direct or nested
//! 4. Dispose every remaining container child except the camera, and
//!    everything mounted under the camera
//! 5. Release auxiliary handles (debug helpers, background, fog)
//! 6. Destroy the debug panel
//!
//! followed by a sweep of nodes that were detached during the scene's life
//! but never disposed. Every step runs to completion; a node whose release
//! fails is logged and skipped.

use super::actors::{ActorList, MixerList};
use super::catalog::{AnimateContext, LoadContext, SceneCatalog, SceneError, SceneId, StageContext};
use super::container::{DisposeOutcome, SceneContainer};
use super::generation::Generation;
use crate::assets::{AssetLoader, AssetSource};
use crate::render::{Camera, OrbitControls};

/// What one teardown released
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Mixers unbound
    pub mixers: usize,
    /// Nodes disposed from actor subtrees
    pub actor_nodes: usize,
    /// Nodes disposed from light subtrees
    pub light_nodes: usize,
    /// Nodes disposed from remaining container children
    pub other_nodes: usize,
    /// Auxiliary helper nodes disposed
    pub helper_nodes: usize,
    /// Detached nodes swept
    pub orphan_nodes: usize,
    /// Whether a debug panel was present
    pub panel_destroyed: bool,
    /// Release failures logged and skipped
    pub failures: usize,
}

impl TeardownReport {
    /// Total nodes disposed
    pub fn nodes(&self) -> usize {
        self.actor_nodes + self.light_nodes + self.other_nodes + self.helper_nodes + self.orphan_nodes
    }
}

/// Result of a successful switch
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchReport {
    /// Scene now active
    pub scene: SceneId,
    /// Generation the scene runs under
    pub generation: Generation,
    /// What the previous scene left behind
    pub teardown: TeardownReport,
    /// In-flight asset requests of earlier scenes that were dropped
    pub dropped_requests: usize,
    /// Error returned by the scene's load, if any; the switch still completed
    pub load_error: Option<SceneError>,
}

/// Result of delivering asset completions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Completions handed to the active scene
    pub delivered: usize,
    /// Failed loads reported to the active scene
    pub failed: usize,
    /// Completions from an older generation, dropped
    pub discarded: usize,
}

/// Owns the active scene and switches between scenes
pub struct SceneLifecycleManager {
    catalog: SceneCatalog,
    container: SceneContainer,
    actors: ActorList,
    mixers: MixerList,
    camera: Camera,
    controls: OrbitControls,
    loader: AssetLoader,
    generation: Generation,
    active: Option<SceneId>,
}

impl SceneLifecycleManager {
    /// Create a manager with no active scene
    pub fn new(catalog: SceneCatalog, source: Box<dyn AssetSource>, camera: Camera, latency_frames: u32) -> Self {
        log::info!("Scene manager created with {} scenes", catalog.len());
        Self {
            catalog,
            container: SceneContainer::with_camera(),
            actors: ActorList::new(),
            mixers: MixerList::new(),
            camera,
            controls: OrbitControls::new(),
            loader: AssetLoader::new(source, latency_frames),
            generation: Generation::default(),
            active: None,
        }
    }

    /// Tear down the current scene and load `id`
    ///
    /// An id missing from the catalog is rejected before anything is torn
    /// down, leaving the current scene untouched.
    pub fn switch_to(&mut self, id: SceneId) -> Result<SwitchReport, SceneError> {
        if !self.catalog.contains(id) {
            log::warn!("Ignoring switch to unknown scene {}; keeping {:?}", id, self.active);
            return Err(SceneError::UnknownScene(id));
        }

        log::info!("Switching scene {:?} -> {}", self.active, id);
        self.active = None;
        let teardown = self.teardown();
        self.generation = self.generation.next();
        let dropped_requests = self.loader.drop_stale(self.generation);
        if dropped_requests > 0 {
            log::debug!("Dropped {} requests still pending from the previous scene", dropped_requests);
        }

        let Some(module) = self.catalog.get_mut(id) else {
            return Err(SceneError::UnknownScene(id));
        };
        let mut ctx = LoadContext {
            container: &mut self.container,
            actors: &mut self.actors,
            mixers: &mut self.mixers,
            camera: &mut self.camera,
            controls: &mut self.controls,
            loader: &mut self.loader,
            generation: self.generation,
        };
        let load_error = module.load(&mut ctx).err();
        if let Some(e) = &load_error {
            log::error!("Scene {} ('{}') load failed: {}", id, module.name(), e);
        }

        self.active = Some(id);
        log::info!(
            "Active scene: {} ('{}'), generation {}, {} nodes",
            id,
            module.name(),
            self.generation,
            self.container.node_count()
        );
        Ok(SwitchReport {
            scene: id,
            generation: self.generation,
            teardown,
            dropped_requests,
            load_error,
        })
    }

    /// Release everything the current scene owns, keeping the camera
    pub fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport {
            mixers: self.mixers.uncache_and_clear(),
            ..TeardownReport::default()
        };

        for key in self.actors.drain() {
            let outcome = self.container.dispose_subtree(key);
            report.actor_nodes += tally(outcome, &mut report.failures);
        }

        for key in self.container.lights() {
            let outcome = self.container.dispose_subtree(key);
            report.light_nodes += tally(outcome, &mut report.failures);
        }

        let camera = self.container.camera_node();
        let aux = self.container.aux();
        let helpers = [aux.light_helper, aux.shadow_helper];
        let remaining: Vec<_> = self
            .container
            .children()
            .iter()
            .copied()
            .filter(|&key| Some(key) != camera && !helpers.contains(&Some(key)))
            .collect();
        let mounted: Vec<_> = camera
            .and_then(|key| self.container.get(key))
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for key in remaining.into_iter().chain(mounted) {
            let outcome = self.container.dispose_subtree(key);
            report.other_nodes += tally(outcome, &mut report.failures);
        }

        let aux = self.container.aux_mut();
        let helpers = [aux.light_helper.take(), aux.shadow_helper.take()];
        let background = aux.background.take();
        aux.fog = None;
        aux.ambient_light = None;
        aux.sun = None;
        let panel = aux.debug_panel.take();
        for key in helpers.into_iter().flatten() {
            let outcome = self.container.dispose_subtree(key);
            report.helper_nodes += tally(outcome, &mut report.failures);
        }
        if let Some(texture) = background {
            if let Err(e) = self.container.resources_mut().release_texture(texture) {
                log::error!("Failed to release background texture: {}", e);
                report.failures += 1;
            }
        }

        if let Some(mut panel) = panel {
            report.panel_destroyed = true;
            if let Err(e) = panel.destroy() {
                log::warn!("Debug panel cleanup failed: {}", e);
            }
        }

        for key in self.container.detached_roots() {
            if Some(key) == camera {
                continue;
            }
            let outcome = self.container.dispose_subtree(key);
            report.orphan_nodes += tally(outcome, &mut report.failures);
        }

        log::debug!(
            "Teardown released {} nodes and {} mixers ({} failures), {} allocations still live",
            report.nodes(),
            report.mixers,
            report.failures,
            self.container.resources().live_count()
        );
        report
    }

    /// Hand resolved asset loads to the active scene
    ///
    /// Completions issued under an older generation are dropped before
    /// anything is allocated for them.
    pub fn deliver_assets(&mut self) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for completion in self.loader.pump() {
            if self.active.is_none() || completion.generation() != self.generation {
                log::debug!(
                    "Discarding stale load of '{}' (generation {}, current {})",
                    completion.path(),
                    completion.generation(),
                    self.generation
                );
                self.loader.record_discard();
                report.discarded += 1;
                continue;
            }

            let mut stage = StageContext {
                container: &mut self.container,
                actors: &mut self.actors,
                mixers: &mut self.mixers,
                camera: &mut self.camera,
                controls: &mut self.controls,
            };
            match completion.deliver(&mut stage) {
                Ok(()) => report.delivered += 1,
                Err(_) => report.failed += 1,
            }
        }
        report
    }

    /// Advance every mixer
    pub fn advance_mixers(&mut self, elapsed: f32) {
        self.mixers.update_all(elapsed, &mut self.container);
    }

    /// Run the active scene's animate step
    pub fn animate_active(&mut self, elapsed: f32) -> Result<(), SceneError> {
        let Some(id) = self.active else {
            return Ok(());
        };
        let Some(module) = self.catalog.get_mut(id) else {
            return Ok(());
        };
        let mut ctx = AnimateContext {
            actors: &self.actors,
            container: &mut self.container,
            camera: &mut self.camera,
            controls: &mut self.controls,
        };
        module.animate(&mut ctx, elapsed)
    }

    /// Whether the active scene has an animate step
    pub fn active_is_animated(&self) -> bool {
        self.active
            .and_then(|id| self.catalog.is_animated(id))
            .unwrap_or(false)
    }

    /// Active scene id
    pub fn active(&self) -> Option<SceneId> {
        self.active
    }

    /// Current generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The scene catalog
    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// The scene container
    pub fn container(&self) -> &SceneContainer {
        &self.container
    }

    /// Mutable scene container
    pub fn container_mut(&mut self) -> &mut SceneContainer {
        &mut self.container
    }

    /// Actor list
    pub fn actors(&self) -> &ActorList {
        &self.actors
    }

    /// Mixer list
    pub fn mixers(&self) -> &MixerList {
        &self.mixers
    }

    /// Shared camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable shared camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Shared view controls
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// Mutable shared view controls
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Mutable asset loader
    pub fn loader_mut(&mut self) -> &mut AssetLoader {
        &mut self.loader
    }
}

fn tally(outcome: DisposeOutcome, failures: &mut usize) -> usize {
    for e in &outcome.failures {
        log::error!("Disposal failed during teardown: {}", e);
    }
    *failures += outcome.failures.len();
    outcome.nodes
}
