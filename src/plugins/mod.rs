//! Plugin system for moa-search
//!
//! Plugins are classified by their declared kind:
//! - pre: dispatched in the same wave as the engines
//! - post: exposed for the caller to run over aggregated results

mod loader;
mod registry;
mod traits;

// Built-in plugins
pub mod hash_plugin;

pub use loader::{PluginLoader, PluginModule, PLUGIN_SUFFIX};
pub use registry::{PluginClassification, PluginRegistry};
pub use traits::*;
