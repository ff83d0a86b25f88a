//! Plugin loader for building the registry from registered modules

use super::hash_plugin::HashPlugin;
use super::registry::PluginRegistry;
use super::traits::Plugin;
use crate::config::Settings;
use crate::registry::{discover, AdapterModule};
use tracing::info;

/// A registration unit for plugins
pub type PluginModule = AdapterModule<dyn Plugin>;

/// Structural suffix stripped from plugin type names
pub const PLUGIN_SUFFIX: &str = "Plugin";

/// Loader for initializing plugins
pub struct PluginLoader;

impl PluginLoader {
    /// Load every module, recording the ones that fail
    pub fn load(settings: &Settings, modules: Vec<PluginModule>) -> PluginRegistry {
        let scanned = modules.len();
        let discovered = discover(modules, &settings.adapters, PLUGIN_SUFFIX);
        let registry = PluginRegistry::from_discovered(discovered);

        info!(
            "Loaded {} of {} plugin modules ({} failed)",
            registry.len(),
            scanned,
            registry.failed().len()
        );
        registry
    }

    /// Plugins shipped with the crate
    pub fn builtin_modules() -> Vec<PluginModule> {
        vec![PluginModule::single(
            "hash_plugin",
            HashPlugin::TYPE_NAME,
            |configs| Ok(Box::new(HashPlugin::new(configs)) as Box<dyn Plugin>),
        )]
    }

    /// Load the built-in plugins followed by `extra`
    pub fn load_with_builtins(settings: &Settings, extra: Vec<PluginModule>) -> PluginRegistry {
        let mut modules = Self::builtin_modules();
        modules.extend(extra);
        Self::load(settings, modules)
    }
}
