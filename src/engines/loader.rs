//! Engine loader for building the registry from registered modules

use super::registry::EngineRegistry;
use super::traits::Engine;
use crate::config::Settings;
use crate::registry::{discover, AdapterModule};
use tracing::info;

/// A registration unit for engines
pub type EngineModule = AdapterModule<dyn Engine>;

/// Structural suffix stripped from engine type names
pub const ENGINE_SUFFIX: &str = "Engine";

/// Loader for initializing engines
pub struct EngineLoader;

impl EngineLoader {
    /// Load every module, recording the ones that fail
    pub fn load(settings: &Settings, modules: Vec<EngineModule>) -> EngineRegistry {
        let scanned = modules.len();
        let discovered = discover(modules, &settings.adapters, ENGINE_SUFFIX);
        let registry = EngineRegistry::from_discovered(discovered);

        info!(
            "Loaded {} of {} engine modules ({} failed)",
            registry.len(),
            scanned,
            registry.failed().len()
        );
        registry
    }
}
