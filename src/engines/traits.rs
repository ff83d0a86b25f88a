//! Engine traits and types

use super::category::Category;
use crate::proxy::ProxySpec;
use crate::search::TimeRange;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl ResultItem {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            thumbnail: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// What one engine produced for one request.
///
/// Serializes as `{"results": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOutcome {
    Results(Vec<ResultItem>),
    Error(String),
}

impl SearchOutcome {
    /// Outcome recorded for a requested engine the registry does not know
    pub fn not_found(id: &str) -> Self {
        Self::Error(format!("Engine {id} not found!"))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn results(&self) -> Option<&[ResultItem]> {
        match self {
            Self::Results(results) => Some(results),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Results(_) => None,
            Self::Error(message) => Some(message),
        }
    }

    /// Keep at most the first `limit` results. Errors are untouched.
    pub fn truncate(&mut self, limit: usize) {
        if let Self::Results(results) = self {
            results.truncate(limit);
        }
    }
}

impl From<anyhow::Result<Vec<ResultItem>>> for SearchOutcome {
    fn from(result: anyhow::Result<Vec<ResultItem>>) -> Self {
        match result {
            Ok(results) => Self::Results(results),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Parameters passed to every engine in a dispatch wave
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Search query string
    pub query: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Safe search level (0, 1, 2)
    pub safesearch: u8,
    /// Time range filter
    pub time_range: Option<TimeRange>,
    /// Locale, e.g. `en-US`
    pub locale: String,
    /// Country code, e.g. `US`
    pub country: String,
    /// Number of results wanted, for engines that can ask for a count
    pub num_results: Option<usize>,
    /// Proxy to route requests through
    pub proxy: Option<ProxySpec>,
    /// Per-engine request timeout
    pub timeout: Duration,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            safesearch: 0,
            time_range: None,
            locale: "en-US".to_string(),
            country: "US".to_string(),
            num_results: None,
            proxy: None,
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        }
    }
}

/// Main engine trait that all search engines must implement
#[async_trait]
pub trait Engine: Send + Sync {
    /// Implementation type name, e.g. `BingEngine`. The registry derives the
    /// engine id from it.
    fn type_name(&self) -> &str;

    /// Category this engine serves
    fn category(&self) -> Category {
        Category::General
    }

    /// Run a search.
    ///
    /// Failures are reported through the `Err` variant; the dispatcher turns
    /// them into `{"error": ...}` for this engine only.
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<Vec<ResultItem>>;
}
