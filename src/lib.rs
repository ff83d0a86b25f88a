//! moa-search: a metasearch orchestrator
//!
//! Discovers engine and plugin adapters, validates search requests, fans
//! them out concurrently and collects every adapter's outcome, failures
//! included, into a single response envelope.

pub mod config;
pub mod engines;
pub mod error;
pub mod network;
pub mod plugins;
pub mod proxy;
pub mod registry;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engines::{Engine, EngineRegistry, ResultItem, SearchOutcome, SearchRequest};
pub use error::{DiscoveryError, SearchError};
pub use plugins::{Plugin, PluginRegistry};
pub use search::{ResponseEnvelope, Search, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for engine requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
