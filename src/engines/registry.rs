//! Engine registry for managing available search engines

use super::category::Category;
use super::traits::Engine;
use crate::registry::Discovered;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

/// Registry of loaded search engines, immutable once built
pub struct EngineRegistry {
    /// Engines by id
    engines: HashMap<String, Arc<dyn Engine>>,
    /// Loaded ids in discovery order
    active: Vec<String>,
    /// Modules that failed to load
    failed: Vec<String>,
    /// Active ids by category
    categories: BTreeMap<Category, Vec<String>>,
}

/// Snapshot of an engine registry's classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineClassification {
    pub active: Vec<String>,
    pub failed: Vec<String>,
    #[serde(flatten)]
    pub categories: BTreeMap<Category, Vec<String>>,
}

impl EngineClassification {
    /// Ids in one category bucket
    pub fn bucket(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
    }
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
            active: Vec::new(),
            failed: Vec::new(),
            categories: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// Build a registry from a discovery pass
    pub fn from_discovered(discovered: Discovered<dyn Engine>) -> Self {
        let mut registry = Self::new();
        for (id, engine) in discovered.adapters {
            registry.insert(id, engine);
        }
        registry.failed = discovered.failed;
        registry
    }

    fn insert(&mut self, id: String, engine: Arc<dyn Engine>) {
        let category = engine.category();
        if category == Category::Other {
            warn!(
                "Engine {} declares an unrecognized category, filed under 'other'",
                id
            );
        }

        self.categories
            .entry(category)
            .or_default()
            .push(id.clone());
        self.active.push(id.clone());
        self.engines.insert(id, engine);
    }

    /// Get an engine by id, case-insensitively
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Engine>> {
        self.engines.get(&id.to_lowercase())
    }

    /// Check if an engine exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Category an engine was filed under
    pub fn category_of(&self, id: &str) -> Option<Category> {
        self.get(id).map(|engine| engine.category())
    }

    /// Ids in one category bucket
    pub fn by_category(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// Snapshot of the classification
    pub fn list(&self) -> EngineClassification {
        EngineClassification {
            active: self.active.clone(),
            failed: self.failed.clone(),
            categories: self.categories.clone(),
        }
    }

    /// Get number of loaded engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
