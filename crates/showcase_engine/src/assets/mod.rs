//! Asset loading
//!
//! Models are described by [`ModelTemplate`]s (a node tree plus animation
//! clips) served by an [`AssetSource`]. The [`AssetLoader`] queues requests
//! and resolves them on a later pump, so scene code always sees loads
//! complete asynchronously, the way a network-backed loader behaves.
//! Nothing touches the GPU until a completion is accepted and the template
//! is instantiated into a container.

pub mod library;
pub mod loader;
pub mod template;

pub use library::{AssetLibrary, AssetSource};
pub use loader::{AssetLoader, Completion, Latency, LoaderStats, OnError, OnLoad};
pub use template::{MaterialTemplate, ModelTemplate, NodeTemplate, NodeTemplateKind, TextureTemplate};

use thiserror::Error;

/// Asset errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    /// No asset registered under the path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Manifest could not be parsed
    #[error("Malformed asset manifest: {0}")]
    Manifest(String),

    /// Asset data is present but unusable
    #[error("Failed to decode '{path}': {reason}")]
    Decode {
        /// Asset path
        path: String,
        /// What was wrong
        reason: String,
    },
}
