//! Numeric scene selector

use crate::scene::{SceneCatalog, SceneId};

/// Number input bounded to `[1, catalog_size]` plus a trigger button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSelector {
    text: String,
    max: SceneId,
}

impl SceneSelector {
    /// Selector for a catalog of `catalog_size` scenes
    pub fn new(catalog_size: usize) -> Self {
        Self {
            text: String::new(),
            max: SceneId::try_from(catalog_size).unwrap_or(SceneId::MAX),
        }
    }

    /// Lower bound
    pub fn min(&self) -> SceneId {
        1
    }

    /// Upper bound
    pub fn max(&self) -> SceneId {
        self.max
    }

    /// Replace the input text
    pub fn set_text(&mut self, text: &str) {
        self.text = text.trim().to_string();
    }

    /// Raw input text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed value if it is a number within bounds
    pub fn value(&self) -> Option<SceneId> {
        self.text
            .parse::<SceneId>()
            .ok()
            .filter(|id| (self.min()..=self.max).contains(id))
    }

    /// Spinner up: next id, clamped to the upper bound
    pub fn step_up(&mut self) {
        let next = self.value().map_or(self.min(), |id| id.saturating_add(1));
        self.text = next.min(self.max).max(self.min()).to_string();
    }

    /// Spinner down: previous id, clamped to the lower bound
    pub fn step_down(&mut self) {
        let next = self.value().map_or(self.min(), |id| id.saturating_sub(1));
        self.text = next.max(self.min()).min(self.max.max(self.min())).to_string();
    }

    /// Button press: the id to switch to, if valid and registered
    pub fn trigger(&self, catalog: &SceneCatalog) -> Option<SceneId> {
        match self.value() {
            Some(id) if catalog.contains(id) => Some(id),
            _ => {
                log::debug!("Scene selector ignored input '{}'", self.text);
                None
            }
        }
    }
}
