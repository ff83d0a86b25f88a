//! HTTP client construction for engine adapters
//!
//! Adapters that talk HTTP build their client from the request so the
//! caller's proxy and the per-adapter timeout are honored.

use crate::engines::SearchRequest;
use crate::proxy::ProxySpec;
use anyhow::Result;
use reqwest::{Client, ClientBuilder, Proxy};
use std::time::Duration;

/// Builder for adapter HTTP clients
pub struct HttpClient;

impl HttpClient {
    /// Client for one engine invocation
    pub fn for_request(request: &SearchRequest) -> Result<Client> {
        Self::build(request.timeout, request.proxy.as_ref())
    }

    /// Client with an explicit timeout and optional proxy
    pub fn build(timeout: Duration, proxy: Option<&ProxySpec>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        if let Some(proxy) = proxy {
            builder = Self::with_proxy(builder, proxy)?;
        }

        Ok(builder.build()?)
    }

    fn with_proxy(mut builder: ClientBuilder, proxy: &ProxySpec) -> Result<ClientBuilder> {
        match proxy {
            ProxySpec::Url(url) => {
                builder = builder.proxy(Proxy::all(url)?);
            }
            ProxySpec::Map(map) => {
                if let Some(http) = map.get("http") {
                    builder = builder.proxy(Proxy::http(http)?);
                }
                if let Some(https) = map.get("https") {
                    builder = builder.proxy(Proxy::https(https)?);
                }
            }
        }
        Ok(builder)
    }
}
