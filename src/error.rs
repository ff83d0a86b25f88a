//! Error types for moa-search
//!
//! `SearchError` covers everything that rejects a request before dispatch.
//! `DiscoveryError` covers a single adapter module failing to load; those are
//! logged and recorded in the registry's `failed` list, never returned.

use thiserror::Error;

/// Errors that reject a search request before any adapter is invoked
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Safe search level outside 0..=2
    #[error("Invalid safesearch level {0}. Choose from 0 (off), 1 (moderate), 2 (strict).")]
    InvalidSafesearch(u8),

    /// Unrecognized time range
    #[error("Invalid time_range '{0}'. Choose from [day, week, month, year]")]
    InvalidTimeRange(String),

    /// Page numbers are 1-indexed
    #[error("Invalid page {0}. Pages start at 1")]
    InvalidPage(u32),

    /// Requested engines exist but belong to another category
    #[error("Engines not in category '{category}': {}", .engines.join(", "))]
    EnginesOutsideCategory {
        category: String,
        engines: Vec<String>,
    },

    /// Requested plugins are not loaded
    #[error("Unknown plugins: {}", .0.join(", "))]
    UnknownPlugins(Vec<String>),

    /// Post-processing plugins cannot run in the dispatch wave
    #[error("Post plugins cannot be selected for a search: {}", .0.join(", "))]
    PostPluginSelected(Vec<String>),

    /// Malformed proxy specification
    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),
}

/// Why a single adapter module failed discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no valid adapter type found")]
    NoCapability,

    #[error("expected exactly one adapter type, found {0}")]
    MultipleCapabilities(usize),

    #[error("type name '{0}' yields an empty adapter id")]
    EmptyId(String),

    #[error("adapter id '{0}' is already registered")]
    DuplicateId(String),

    #[error("instantiation failed: {0}")]
    Instantiation(String),

    #[error("panicked during instantiation: {0}")]
    Panicked(String),
}

/// Convenience alias for request-level results
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_category_lists_engines() {
        let err = SearchError::EnginesOutsideCategory {
            category: "images".to_string(),
            engines: vec!["bing".to_string(), "brave".to_string()],
        };
        assert_eq!(err.to_string(), "Engines not in category 'images': bing, brave");
    }

    #[test]
    fn test_discovery_error_display() {
        let err = DiscoveryError::MultipleCapabilities(2);
        assert_eq!(
            err.to_string(),
            "expected exactly one adapter type, found 2"
        );
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
        assert_send_sync::<DiscoveryError>();
    }
}
