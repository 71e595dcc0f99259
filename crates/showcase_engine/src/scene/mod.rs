//! Scene lifecycle
//!
//! - [`SceneContainer`]: the scene graph arena and its auxiliary state
//! - [`SceneCatalog`] / [`SceneModule`]: the fixed set of selectable scenes
//! - [`SceneLifecycleManager`]: switching scenes with complete teardown
//! - [`AnimationDispatcher`]: the per-frame tick

pub mod actors;
pub mod catalog;
pub mod container;
pub mod dispatcher;
pub mod generation;
pub mod manager;
pub mod node;

pub use actors::{ActorList, ActorSlot, MixerList};
pub use catalog::{
    AnimateContext, LoadContext, SceneCatalog, SceneCatalogBuilder, SceneError, SceneId, SceneModule, StageContext,
};
pub use container::{DisposeOutcome, Fog, SceneAuxiliaryState, SceneContainer};
pub use dispatcher::{AnimationDispatcher, DispatchStats, DispatcherState, TickReport};
pub use generation::Generation;
pub use manager::{DeliveryReport, SceneLifecycleManager, SwitchReport, TeardownReport};
pub use node::{
    Disposable, HelperKind, Light, LightKind, MaterialSlot, NodeFlags, NodeKey, NodeKind, SceneNode, ShadowCamera,
};
