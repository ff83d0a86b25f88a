//! Search request and response data models

use crate::engines::{Category, SearchOutcome, SearchRequest};
use crate::plugins::{Plugin, PluginOutcome};
use crate::proxy::ProxyInput;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Time range filter for search results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    /// Parse one of `day`, `week`, `month`, `year`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// Get the string representation for API calls
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A search request as the caller states it, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    /// The search query string
    #[serde(alias = "q")]
    pub query: String,
    /// Engine ids to search; None means the whole category
    pub engines: Option<Vec<String>>,
    /// Plugin ids to run; None means the pre pool
    pub plugins: Option<Vec<String>>,
    /// Page number (1-indexed)
    pub page: u32,
    /// Safe search level (0, 1, 2)
    pub safesearch: u8,
    /// Time range filter
    pub time_range: Option<String>,
    /// Locale; settings default when absent
    pub locale: Option<String>,
    /// Country; settings default when absent
    pub country: Option<String>,
    /// Max results kept per engine; None or 0 keeps all
    pub limit: Option<usize>,
    /// Engine category; unknown falls back to general
    pub category: Option<String>,
    /// Proxy for adapter traffic
    pub proxy: Option<ProxyInput>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            engines: None,
            plugins: None,
            page: 1,
            safesearch: 0,
            time_range: None,
            locale: None,
            country: None,
            limit: None,
            category: None,
            proxy: None,
        }
    }
}

impl SearchQuery {
    /// Create a simple query for a single string
    pub fn simple(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines = Some(engines.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_plugins<I, S>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugins = Some(plugins.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_safesearch(mut self, level: u8) -> Self {
        self.safesearch = level;
        self
    }

    pub fn with_time_range(mut self, range: impl Into<String>) -> Self {
        self.time_range = Some(range.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<ProxyInput>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Limit that actually truncates: None and 0 both mean "keep all"
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }
}

/// A validated request with its adapter selection resolved
pub struct RequestEnvelope {
    /// Parameters handed to every engine
    pub request: SearchRequest,
    /// Category engines were selected from
    pub category: Category,
    /// Engine ids to dispatch, including ids the registry does not know
    pub engines: Vec<String>,
    /// Plugins to dispatch alongside the engines
    pub plugins: Vec<(String, Arc<dyn Plugin>)>,
    /// Effective per-engine result limit
    pub limit: Option<usize>,
}

/// Aggregated response: per-adapter outcomes plus the registry snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub query: String,
    pub active_engines: Vec<String>,
    pub failed_engines: Vec<String>,
    pub active_plugins: Vec<String>,
    pub failed_plugins: Vec<String>,
    /// Outcome per engine id, including synthetic not-found entries
    pub results: BTreeMap<String, SearchOutcome>,
    /// Outcome per pre-plugin id
    pub pre_plugins: BTreeMap<String, PluginOutcome>,
}
