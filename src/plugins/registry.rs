//! Plugin registry for managing plugins

use super::traits::{Plugin, PluginKind};
use crate::registry::Discovered;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Registry of loaded plugins, immutable once built
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
    active: Vec<String>,
    failed: Vec<String>,
    pre: Vec<String>,
    post: Vec<String>,
}

/// Snapshot of a plugin registry's classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginClassification {
    pub active: Vec<String>,
    pub failed: Vec<String>,
    pub pre: Vec<String>,
    pub post: Vec<String>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            active: Vec::new(),
            failed: Vec::new(),
            pre: Vec::new(),
            post: Vec::new(),
        }
    }

    /// Build a registry from a discovery pass
    pub fn from_discovered(discovered: Discovered<dyn Plugin>) -> Self {
        let mut registry = Self::new();
        for (id, plugin) in discovered.adapters {
            registry.insert(id, plugin);
        }
        registry.failed = discovered.failed;
        registry
    }

    fn insert(&mut self, id: String, plugin: Arc<dyn Plugin>) {
        match plugin.kind() {
            PluginKind::Pre => self.pre.push(id.clone()),
            PluginKind::Post => self.post.push(id.clone()),
            PluginKind::Unrecognized(kind) => {
                warn!("Unknown plugin type '{}' in {}", kind, id);
            }
        }
        self.active.push(id.clone());
        self.plugins.insert(id, plugin);
    }

    /// Get a plugin by id, case-insensitively
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(&id.to_lowercase())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// Ids run by default alongside the engines
    pub fn pre_pool(&self) -> &[String] {
        &self.pre
    }

    /// Ids for the caller's post-processing stage
    pub fn post_pool(&self) -> &[String] {
        &self.post
    }

    /// Snapshot of the classification
    pub fn list(&self) -> PluginClassification {
        PluginClassification {
            active: self.active.clone(),
            failed: self.failed.clone(),
            pre: self.pre.clone(),
            post: self.post.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
