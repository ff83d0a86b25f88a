//! Proxy specification validation and normalization
//!
//! Callers may pass a single proxy URL or a scheme-keyed mapping. A URL must
//! use `http://` or `https://`; `https://` is rewritten to `http://` since
//! adapters only talk to HTTP-scheme proxy endpoints. A mapping must carry an
//! `http` or `https` key and is passed through untouched.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Caller-supplied proxy, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProxyInput {
    Url(String),
    Map(BTreeMap<String, String>),
}

impl From<&str> for ProxyInput {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

impl From<String> for ProxyInput {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl From<BTreeMap<String, String>> for ProxyInput {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::Map(map)
    }
}

/// Validated proxy handed to adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProxySpec {
    /// Single endpoint, always `http://`
    Url(String),
    /// Per-scheme endpoints; holds at least one of `http`/`https`
    Map(BTreeMap<String, String>),
}

impl ProxySpec {
    /// Endpoint for plain HTTP traffic
    pub fn http(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Map(map) => map.get("http").map(String::as_str),
        }
    }

    /// Endpoint for HTTPS traffic
    pub fn https(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Map(map) => map.get("https").map(String::as_str),
        }
    }
}

/// Validate and normalize a proxy input. `None` means no proxy.
pub fn resolve(input: Option<&ProxyInput>) -> Result<Option<ProxySpec>> {
    match input {
        None => Ok(None),
        Some(ProxyInput::Url(url)) => resolve_url(url).map(Some),
        Some(ProxyInput::Map(map)) => resolve_map(map).map(Some),
    }
}

fn resolve_url(url: &str) -> Result<ProxySpec> {
    if let Some(rest) = url.strip_prefix(HTTPS_PREFIX) {
        Ok(ProxySpec::Url(format!("{HTTP_PREFIX}{rest}")))
    } else if url.starts_with(HTTP_PREFIX) {
        Ok(ProxySpec::Url(url.to_string()))
    } else {
        Err(SearchError::InvalidProxy(format!(
            "'{url}' must start with http:// or https://"
        )))
    }
}

fn resolve_map(map: &BTreeMap<String, String>) -> Result<ProxySpec> {
    if map.contains_key("http") || map.contains_key("https") {
        Ok(ProxySpec::Map(map.clone()))
    } else {
        Err(SearchError::InvalidProxy(
            "mapping needs an 'http' or 'https' key".to_string(),
        ))
    }
}
