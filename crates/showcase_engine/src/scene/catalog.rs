//! Scene modules and the catalog that maps ids to them
//!
//! A scene is a [`SceneModule`]: `load` populates the container and the
//! actor/mixer lists, `animate` scripts the motion every tick. Scenes own
//! their animation state (timers, progress counters) as fields, so two
//! scenes can never share a timer. `load` must reinitialise that state,
//! since a scene may be entered many times.

use super::actors::{ActorList, MixerList};
use super::container::SceneContainer;
use super::generation::Generation;
use super::node::NodeKey;
use crate::assets::{AssetError, AssetLoader, ModelTemplate, OnError};
use crate::render::{Camera, OrbitControls, ResourceError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Integer scene identifier
pub type SceneId = u32;

/// Scene errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// Id not present in the catalog
    #[error("Unknown scene id {0}")]
    UnknownScene(SceneId),

    /// Id registered twice while building the catalog
    #[error("Scene id {0} registered more than once")]
    DuplicateScene(SceneId),

    /// A scene's load step failed
    #[error("Scene load failed: {0}")]
    Load(String),

    /// A scene's animate step failed
    #[error("Scene animation failed: {0}")]
    Animate(String),

    /// Asset error surfaced by a scene
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Resource error surfaced by a scene
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Everything a scene may touch while loading
pub struct LoadContext<'a> {
    /// Scene container, empty apart from the camera
    pub container: &'a mut SceneContainer,
    /// Actor list, empty
    pub actors: &'a mut ActorList,
    /// Mixer list, empty
    pub mixers: &'a mut MixerList,
    /// Shared camera
    pub camera: &'a mut Camera,
    /// Shared view controls
    pub controls: &'a mut OrbitControls,
    pub(crate) loader: &'a mut AssetLoader,
    pub(crate) generation: Generation,
}

impl LoadContext<'_> {
    /// Generation this load belongs to
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Request a model; `on_load` runs on a later frame if this scene is still active
    ///
    /// Failures are logged.
    pub fn load_model(
        &mut self,
        path: &str,
        on_load: impl FnOnce(&mut StageContext<'_>, ModelTemplate) + 'static,
    ) {
        self.loader
            .request(path, self.generation, Box::new(on_load), AssetLoader::log_error(path));
    }

    /// Request a model with a custom error handler
    pub fn load_model_with(
        &mut self,
        path: &str,
        on_load: impl FnOnce(&mut StageContext<'_>, ModelTemplate) + 'static,
        on_error: OnError,
    ) {
        self.loader.request(path, self.generation, Box::new(on_load), on_error);
    }
}

/// What an asset completion may touch
///
/// Only ever built for the generation that issued the request.
pub struct StageContext<'a> {
    /// Scene container
    pub container: &'a mut SceneContainer,
    /// Actor list
    pub actors: &'a mut ActorList,
    /// Mixer list
    pub mixers: &'a mut MixerList,
    /// Shared camera
    pub camera: &'a mut Camera,
    /// Shared view controls
    pub controls: &'a mut OrbitControls,
}

impl StageContext<'_> {
    /// Instantiate a template and attach it to the container root
    pub fn spawn(&mut self, template: &ModelTemplate) -> NodeKey {
        let root = template.instantiate(self.container);
        self.container.attach(root);
        root
    }
}

/// Everything a scene may touch while animating
pub struct AnimateContext<'a> {
    /// Actor list
    pub actors: &'a ActorList,
    /// Scene container
    pub container: &'a mut SceneContainer,
    /// Shared camera
    pub camera: &'a mut Camera,
    /// Shared view controls
    pub controls: &'a mut OrbitControls,
}

/// One selectable scene
pub trait SceneModule {
    /// Display name
    fn name(&self) -> &str;

    /// Populate the scene
    fn load(&mut self, ctx: &mut LoadContext<'_>) -> Result<(), SceneError>;

    /// Advance scripted motion by `elapsed` seconds
    fn animate(&mut self, _ctx: &mut AnimateContext<'_>, _elapsed: f32) -> Result<(), SceneError> {
        Ok(())
    }

    /// Whether [`animate`](Self::animate) does anything
    fn is_animated(&self) -> bool {
        true
    }
}

/// Builder for [`SceneCatalog`]
#[derive(Default)]
pub struct SceneCatalogBuilder {
    entries: Vec<(SceneId, Box<dyn SceneModule>)>,
}

impl SceneCatalogBuilder {
    /// Register a scene under `id`
    #[must_use]
    pub fn register(mut self, id: SceneId, module: impl SceneModule + 'static) -> Self {
        self.entries.push((id, Box::new(module)));
        self
    }

    /// Register an already boxed scene
    #[must_use]
    pub fn register_boxed(mut self, id: SceneId, module: Box<dyn SceneModule>) -> Self {
        self.entries.push((id, module));
        self
    }

    /// Freeze the mapping
    pub fn build(self) -> Result<SceneCatalog, SceneError> {
        let mut scenes = BTreeMap::new();
        for (id, module) in self.entries {
            if scenes.insert(id, module).is_some() {
                return Err(SceneError::DuplicateScene(id));
            }
        }
        Ok(SceneCatalog { scenes })
    }
}

/// Fixed mapping from scene id to scene module
///
/// Built once at startup; ids can neither be added nor removed afterwards.
pub struct SceneCatalog {
    scenes: BTreeMap<SceneId, Box<dyn SceneModule>>,
}

impl SceneCatalog {
    /// Start building a catalog
    pub fn builder() -> SceneCatalogBuilder {
        SceneCatalogBuilder::default()
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: SceneId) -> bool {
        self.scenes.contains_key(&id)
    }

    /// Number of scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Registered ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.keys().copied()
    }

    /// Display name of a scene
    pub fn name(&self, id: SceneId) -> Option<&str> {
        self.scenes.get(&id).map(|module| module.name())
    }

    /// Whether a scene has an animate step, `None` for unknown ids
    pub fn is_animated(&self, id: SceneId) -> Option<bool> {
        self.scenes.get(&id).map(|module| module.is_animated())
    }

    pub(crate) fn get_mut(&mut self, id: SceneId) -> Option<&mut (dyn SceneModule + 'static)> {
        self.scenes.get_mut(&id).map(|module| module.as_mut())
    }
}

impl std::fmt::Debug for SceneCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.scenes.iter().map(|(id, module)| (id, module.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty(&'static str);

    impl SceneModule for Empty {
        fn name(&self) -> &str {
            self.0
        }

        fn load(&mut self, _ctx: &mut LoadContext<'_>) -> Result<(), SceneError> {
            Ok(())
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = SceneCatalog::builder()
            .register(2, Empty("harbour"))
            .register(1, Empty("street"))
            .build()
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(1));
        assert!(!catalog.contains(3));
        assert_eq!(catalog.ids().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(catalog.name(2), Some("harbour"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = SceneCatalog::builder()
            .register(1, Empty("a"))
            .register(1, Empty("b"))
            .build();
        assert!(matches!(result, Err(SceneError::DuplicateScene(1))));
    }
}
