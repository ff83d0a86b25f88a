//! Configuration module for moa-search
//!
//! Handles loading settings from YAML files and environment variables, and
//! the static per-adapter configuration table adapters read at construction.

mod adapters;
mod settings;

pub use adapters::{AdapterConfig, AdapterConfigs};
pub use settings::*;
