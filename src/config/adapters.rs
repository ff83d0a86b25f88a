//! Static per-adapter configuration
//!
//! Adapters read their parameters and declared type from a table keyed by
//! their type name (`BingEngine`, `HashPlugin`, ...). An adapter with no entry
//! gets the empty default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration block for one adapter type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Adapter-specific parameters
    pub params: serde_json::Map<String, serde_json::Value>,
    /// Declared type: an engine category or a plugin kind
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl AdapterConfig {
    /// Config with only a declared type
    pub fn typed(kind: impl Into<String>) -> Self {
        Self {
            params: serde_json::Map::new(),
            kind: Some(kind.into()),
        }
    }

    /// Add a parameter
    pub fn param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Table of adapter configurations keyed by adapter type name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterConfigs {
    entries: HashMap<String, AdapterConfig>,
}

impl AdapterConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON table shaped `{"TypeName": {"params": {...}, "type": "..."}}`.
    ///
    /// A missing file is not an error and yields an empty table.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("parsing adapter params {}", path.display()))
    }

    /// Config for an adapter type, or the empty default
    pub fn get(&self, type_name: &str) -> AdapterConfig {
        self.entries.get(type_name).cloned().unwrap_or_default()
    }

    /// Set the config for an adapter type
    pub fn insert(&mut self, type_name: impl Into<String>, config: AdapterConfig) {
        self.entries.insert(type_name.into(), config);
    }

    /// Builder-style insert
    pub fn with(mut self, type_name: impl Into<String>, config: AdapterConfig) -> Self {
        self.insert(type_name, config);
        self
    }

    /// Merge `other` in without overwriting existing entries
    pub fn merge_missing(&mut self, other: AdapterConfigs) {
        for (name, config) in other.entries {
            self.entries.entry(name).or_insert(config);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
