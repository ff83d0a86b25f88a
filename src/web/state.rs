//! Application state shared across handlers

use crate::config::Settings;
use crate::engines::EngineModule;
use crate::plugins::PluginModule;
use crate::search::Search;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Search executor
    pub search: Arc<Search>,
}

impl AppState {
    /// Wrap an already built executor
    pub fn new(search: Search) -> Self {
        Self {
            search: Arc::new(search),
        }
    }

    /// Discover adapters from `settings` and build the executor
    pub fn from_modules(
        settings: &Settings,
        engine_modules: Vec<EngineModule>,
        plugin_modules: Vec<PluginModule>,
    ) -> Self {
        Self::new(Search::from_modules(settings, engine_modules, plugin_modules))
    }
}
