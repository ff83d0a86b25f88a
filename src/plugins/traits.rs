//! Plugin traits and types

use crate::config::AdapterConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// When a plugin runs relative to the engine wave
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluginKind {
    /// Runs alongside the engines
    Pre,
    /// Runs on aggregated results, driven by the caller
    Post,
    /// Declared kind not understood; loaded but never auto-selected
    Unrecognized(String),
}

impl PluginKind {
    /// Case-insensitive parse
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_lowercase().as_str() {
            "pre" => Self::Pre,
            "post" => Self::Post,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Kind a plugin declared in its config; undeclared is `Post`
    pub fn from_declared(declared: Option<&str>) -> Self {
        declared.map(Self::parse).unwrap_or(Self::Post)
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => f.write_str("pre"),
            Self::Post => f.write_str("post"),
            Self::Unrecognized(kind) => f.write_str(kind),
        }
    }
}

/// What one plugin produced: its own payload, or `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PluginOutcome {
    Output(serde_json::Value),
    Error { error: String },
}

impl PluginOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<anyhow::Result<serde_json::Value>> for PluginOutcome {
    fn from(result: anyhow::Result<serde_json::Value>) -> Self {
        match result {
            Ok(value) => Self::Output(value),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Main plugin trait
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Implementation type name, e.g. `HashPlugin`; also the key of its
    /// config entry
    fn type_name(&self) -> &str;

    /// Config entry the plugin was built with
    fn config(&self) -> &AdapterConfig;

    /// Declared kind
    fn kind(&self) -> PluginKind {
        PluginKind::from_declared(self.config().kind.as_deref())
    }

    /// Plugin-specific parameters
    fn params(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.config().params
    }

    /// Process a query
    async fn run(&self, query: &str) -> anyhow::Result<serde_json::Value>;
}
