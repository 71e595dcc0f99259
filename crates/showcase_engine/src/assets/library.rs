//! In-memory asset source backed by a RON manifest

use super::template::{ModelTemplate, NodeTemplate, NodeTemplateKind};
use super::AssetError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Resolves asset paths to model templates
pub trait AssetSource {
    /// Resolve a path
    fn resolve(&self, path: &str) -> Result<ModelTemplate, AssetError>;
}

#[derive(Debug, Deserialize)]
struct Manifest {
    models: BTreeMap<String, ModelTemplate>,
}

/// Models keyed by path
#[derive(Debug, Clone, Default)]
pub struct AssetLibrary {
    models: BTreeMap<String, ModelTemplate>,
}

impl AssetLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest of the form `(models: { "path": (root: ..., clips: [...]) })`
    pub fn from_ron_str(source: &str) -> Result<Self, AssetError> {
        let manifest: Manifest = ron::from_str(source).map_err(|e| AssetError::Manifest(e.to_string()))?;
        log::info!("Asset manifest loaded with {} models", manifest.models.len());
        Ok(Self {
            models: manifest.models,
        })
    }

    /// Read and parse a manifest file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AssetError::Manifest(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&contents)
    }

    /// Register a model under `path`, replacing any previous one
    pub fn insert(&mut self, path: impl Into<String>, model: ModelTemplate) {
        self.models.insert(path.into(), model);
    }

    /// Builder form of [`insert`](Self::insert)
    #[must_use]
    pub fn with_model(mut self, path: impl Into<String>, model: ModelTemplate) -> Self {
        self.insert(path, model);
        self
    }

    /// Whether a path is registered
    pub fn contains(&self, path: &str) -> bool {
        self.models.contains_key(path)
    }

    /// Registered paths in order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn validate(path: &str, node: &NodeTemplate) -> Result<(), AssetError> {
    if let NodeTemplateKind::Mesh { materials, .. } = &node.kind {
        if materials.is_empty() {
            return Err(AssetError::Decode {
                path: path.to_string(),
                reason: format!("mesh '{}' has no materials", node.name),
            });
        }
    }
    node.children.iter().try_for_each(|child| validate(path, child))
}

impl AssetSource for AssetLibrary {
    fn resolve(&self, path: &str) -> Result<ModelTemplate, AssetError> {
        let model = self
            .models
            .get(path)
            .ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        validate(path, &model.root)?;
        Ok(model.clone())
    }
}
