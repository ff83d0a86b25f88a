//! HTTP request handlers

use super::state::AppState;
use crate::error::SearchError;
use crate::search::SearchQuery;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

/// Query parameters for search
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub q: Option<String>,
    /// Engines (comma-separated)
    pub engines: Option<String>,
    /// Plugins (comma-separated)
    pub plugins: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Safe search level
    pub safesearch: Option<u8>,
    /// Time range
    pub time_range: Option<String>,
    pub locale: Option<String>,
    pub country: Option<String>,
    /// Max results per engine
    pub limit: Option<usize>,
    pub category: Option<String>,
    /// Proxy URL for adapter traffic
    pub proxy: Option<String>,
}

impl SearchParams {
    /// Convert into a query; `None` when `q` is missing or blank
    pub fn into_query(self) -> Option<SearchQuery> {
        let q = self.q.filter(|q| !q.trim().is_empty())?;

        let mut query = SearchQuery::simple(q);
        query.engines = self.engines.as_deref().map(split_list);
        query.plugins = self.plugins.as_deref().map(split_list);
        query.page = self.page.unwrap_or(1);
        query.safesearch = self.safesearch.unwrap_or(0);
        query.time_range = self.time_range;
        query.locale = self.locale;
        query.country = self.country;
        query.limit = self.limit;
        query.category = self.category;
        query.proxy = self.proxy.map(Into::into);
        Some(query)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Error body returned for rejected requests
#[derive(Debug)]
pub enum ApiError {
    MissingQuery,
    BadParams(String),
    Invalid(SearchError),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadParams(rejection.body_text())
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::Invalid(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::MissingQuery => "Missing search query".to_string(),
            ApiError::BadParams(message) => message,
            ApiError::Invalid(err) => err.to_string(),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}

/// Search handler for query-string requests
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let query = params.into_query().ok_or(ApiError::MissingQuery)?;
    run(&state, query).await
}

/// Search handler for JSON bodies
pub async fn search_json(
    State(state): State<AppState>,
    Json(query): Json<SearchQuery>,
) -> Result<Response, ApiError> {
    if query.query.trim().is_empty() {
        return Err(ApiError::MissingQuery);
    }
    run(&state, query).await
}

async fn run(state: &AppState, query: SearchQuery) -> Result<Response, ApiError> {
    let response = state.search.execute(&query).await.map_err(|e| {
        tracing::debug!("Rejected search '{}': {}", query.query, e);
        e
    })?;
    Ok(Json(response).into_response())
}

/// Engine classification handler
pub async fn engines(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.engines().list())
}

/// Plugin classification handler
pub async fn plugins(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.plugins().list())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
