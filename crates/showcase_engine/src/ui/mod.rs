//! Viewport and input shell
//!
//! Thin models of the on-screen controls: the numeric scene selector with
//! its trigger button, the resize hook and the optional debug panel.

pub mod debug_panel;
pub mod scene_selector;
pub mod viewport;

pub use debug_panel::{DebugPanel, PanelControl, PanelError};
pub use scene_selector::SceneSelector;
pub use viewport::Viewport;
