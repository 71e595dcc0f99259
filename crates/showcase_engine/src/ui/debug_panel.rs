//! Debug control panel
//!
//! A scene may mount one panel of numeric sliders (light position, fog
//! distance) for tuning. The panel is owned by the scene container's
//! auxiliary state and destroyed on every scene switch.

use thiserror::Error;

/// Panel errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// The panel's host element is gone (already destroyed or removed externally)
    #[error("Debug panel '{0}' is not mounted")]
    NotMounted(String),
}

/// A single slider
#[derive(Debug, Clone, PartialEq)]
pub struct PanelControl {
    /// Slider label
    pub label: String,
    /// Current value
    pub value: f32,
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

/// Debug control panel
#[derive(Debug, Clone)]
pub struct DebugPanel {
    title: String,
    controls: Vec<PanelControl>,
    mounted: bool,
}

impl DebugPanel {
    /// Create and mount an empty panel
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            controls: Vec::new(),
            mounted: true,
        }
    }

    /// Builder: add a slider; the initial value is clamped into range
    #[must_use]
    pub fn with_control(mut self, label: impl Into<String>, value: f32, min: f32, max: f32) -> Self {
        self.controls.push(PanelControl {
            label: label.into(),
            value: value.clamp(min, max),
            min,
            max,
        });
        self
    }

    /// Panel title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current value of a slider
    pub fn value(&self, label: &str) -> Option<f32> {
        self.controls
            .iter()
            .find(|control| control.label == label)
            .map(|control| control.value)
    }

    /// Move a slider, clamped to its range. Returns false for unknown labels.
    pub fn set_value(&mut self, label: &str, value: f32) -> bool {
        match self.controls.iter_mut().find(|control| control.label == label) {
            Some(control) => {
                control.value = value.clamp(control.min, control.max);
                true
            }
            None => false,
        }
    }

    /// All sliders
    pub fn controls(&self) -> &[PanelControl] {
        &self.controls
    }

    /// Whether the panel is still mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Mark the host element as removed without going through [`destroy`](Self::destroy)
    pub fn detach_host(&mut self) {
        self.mounted = false;
    }

    /// Unmount the panel and release its controls
    pub fn destroy(&mut self) -> Result<(), PanelError> {
        if !self.mounted {
            return Err(PanelError::NotMounted(self.title.clone()));
        }
        self.mounted = false;
        self.controls.clear();
        Ok(())
    }
}
