//! Search execution and orchestration

use super::aggregator::{assemble, RegistrySnapshot};
use super::dispatcher::Dispatcher;
use super::models::{RequestEnvelope, ResponseEnvelope, SearchQuery, TimeRange};
use crate::config::{SearchSettings, Settings};
use crate::engines::{Category, Engine, EngineLoader, EngineModule, EngineRegistry, SearchRequest};
use crate::error::{Result, SearchError};
use crate::plugins::{Plugin, PluginKind, PluginLoader, PluginModule, PluginRegistry};
use crate::proxy;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Search executor that coordinates searching across engines and plugins
pub struct Search {
    /// Engine registry
    engines: Arc<EngineRegistry>,
    /// Plugin registry
    plugins: Arc<PluginRegistry>,
    /// Fan-out executor
    dispatcher: Dispatcher,
    /// Request defaults
    settings: SearchSettings,
}

impl Search {
    /// Create a new search executor over built registries
    pub fn new(
        engines: EngineRegistry,
        plugins: PluginRegistry,
        settings: &SearchSettings,
    ) -> Self {
        let dispatcher = Dispatcher::new(settings.workers()).with_deadline(settings.deadline());
        Self {
            engines: Arc::new(engines),
            plugins: Arc::new(plugins),
            dispatcher,
            settings: settings.clone(),
        }
    }

    /// Discover engines and plugins (built-ins included) and build an executor
    pub fn from_modules(
        settings: &Settings,
        engine_modules: Vec<EngineModule>,
        plugin_modules: Vec<PluginModule>,
    ) -> Self {
        let engines = EngineLoader::load(settings, engine_modules);
        let plugins = PluginLoader::load_with_builtins(settings, plugin_modules);
        Self::new(engines, plugins, &settings.search)
    }

    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Validate a query and resolve its engine and plugin selection.
    ///
    /// Nothing is dispatched; any error here rejects the whole request.
    pub fn prepare(&self, query: &SearchQuery) -> Result<RequestEnvelope> {
        if query.safesearch > 2 {
            return Err(SearchError::InvalidSafesearch(query.safesearch));
        }
        if query.page == 0 {
            return Err(SearchError::InvalidPage(query.page));
        }

        let time_range = match query.time_range.as_deref() {
            None => None,
            Some(raw) => Some(
                TimeRange::parse(raw)
                    .ok_or_else(|| SearchError::InvalidTimeRange(raw.to_string()))?,
            ),
        };

        let proxy = proxy::resolve(query.proxy.as_ref())?;
        let category = Category::for_request(query.category.as_deref());
        let engines = self.select_engines(query.engines.as_deref(), category)?;
        let plugins = self.select_plugins(query.plugins.as_deref())?;
        let limit = query.effective_limit();

        let request = SearchRequest {
            query: query.query.clone(),
            page: query.page,
            safesearch: query.safesearch,
            time_range,
            locale: query
                .locale
                .clone()
                .unwrap_or_else(|| self.settings.default_locale.clone()),
            country: query
                .country
                .clone()
                .unwrap_or_else(|| self.settings.default_country.clone()),
            num_results: limit,
            proxy,
            timeout: self.settings.adapter_timeout(),
        };

        Ok(RequestEnvelope {
            request,
            category,
            engines,
            plugins,
            limit,
        })
    }

    /// Execute a search query across the selected engines and pre-plugins
    #[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn execute(&self, query: &SearchQuery) -> Result<ResponseEnvelope> {
        let snapshot = RegistrySnapshot {
            engines: self.engines.list(),
            plugins: self.plugins.list(),
        };
        let envelope = self.prepare(query)?;

        let mut engine_tasks: Vec<(String, Arc<dyn Engine>)> = Vec::new();
        let mut missing = Vec::new();
        for id in &envelope.engines {
            match self.engines.get(id) {
                Some(engine) => engine_tasks.push((id.clone(), engine.clone())),
                None => missing.push(id.clone()),
            }
        }

        info!(
            "Executing search '{}' in category {} on {} engines and {} plugins",
            envelope.request.query,
            envelope.category,
            engine_tasks.len(),
            envelope.plugins.len()
        );
        if !missing.is_empty() {
            debug!("Requested engines not loaded: {:?}", missing);
        }

        let output = self
            .dispatcher
            .dispatch(&envelope.request, engine_tasks, envelope.plugins)
            .await;

        Ok(assemble(
            &envelope.request.query,
            snapshot,
            output,
            &missing,
            envelope.limit,
        ))
    }

    /// Explicit engines must sit in `category` when the registry knows them;
    /// unknown ids pass through and are reported as not found. Without an
    /// explicit list, the whole category bucket is used.
    fn select_engines(
        &self,
        requested: Option<&[String]>,
        category: Category,
    ) -> Result<Vec<String>> {
        let Some(requested) = requested else {
            return Ok(self.engines.by_category(category).to_vec());
        };

        let ids = normalize_ids(requested);
        let outside: Vec<String> = ids
            .iter()
            .filter(|id| matches!(self.engines.category_of(id), Some(c) if c != category))
            .cloned()
            .collect();

        if !outside.is_empty() {
            return Err(SearchError::EnginesOutsideCategory {
                category: category.to_string(),
                engines: outside,
            });
        }
        Ok(ids)
    }

    /// Explicit plugins must be loaded and not post plugins. Without an
    /// explicit list, the pre pool is used.
    fn select_plugins(
        &self,
        requested: Option<&[String]>,
    ) -> Result<Vec<(String, Arc<dyn Plugin>)>> {
        let ids = match requested {
            Some(requested) => normalize_ids(requested),
            None => self.plugins.pre_pool().to_vec(),
        };

        let unknown: Vec<String> = ids
            .iter()
            .filter(|id| !self.plugins.contains(id))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SearchError::UnknownPlugins(unknown));
        }

        let mut selected = Vec::with_capacity(ids.len());
        let mut post = Vec::new();
        for id in ids {
            if let Some(plugin) = self.plugins.get(&id) {
                if plugin.kind() == PluginKind::Post {
                    post.push(id);
                } else {
                    selected.push((id, plugin.clone()));
                }
            }
        }

        if !post.is_empty() {
            return Err(SearchError::PostPluginSelected(post));
        }
        Ok(selected)
    }
}

/// Lower-case, trim, drop blanks and repeats (first occurrence wins)
fn normalize_ids(requested: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdapterConfig, AdapterConfigs};
    use crate::engines::ResultItem;
    use crate::proxy::ProxySpec;
    use async_trait::async_trait;

    struct Stub {
        type_name: &'static str,
        category: Category,
    }

    #[async_trait]
    impl Engine for Stub {
        fn type_name(&self) -> &str {
            self.type_name
        }

        fn category(&self) -> Category {
            self.category
        }

        async fn search(&self, request: &SearchRequest) -> anyhow::Result<Vec<ResultItem>> {
            Ok(vec![ResultItem::new(
                format!("{} via {}", request.query, self.type_name),
                "https://example.com",
                request.locale.clone(),
            )])
        }
    }

    struct Later(AdapterConfig);

    #[async_trait]
    impl Plugin for Later {
        fn type_name(&self) -> &str {
            "LaterPlugin"
        }

        fn config(&self) -> &AdapterConfig {
            &self.0
        }

        async fn run(&self, _query: &str) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    fn engine_module(
        name: &'static str,
        type_name: &'static str,
        category: Category,
    ) -> EngineModule {
        EngineModule::single(name, type_name, move |_: &AdapterConfigs| {
            Ok(Box::new(Stub { type_name, category }) as Box<dyn Engine>)
        })
    }

    fn search() -> Search {
        let mut settings = Settings::default();
        settings.adapters.insert("LaterPlugin", AdapterConfig::typed("post"));
        let later = PluginModule::single("later", "LaterPlugin", |configs: &AdapterConfigs| {
            Ok(Box::new(Later(configs.get("LaterPlugin"))) as Box<dyn Plugin>)
        });

        Search::from_modules(
            &settings,
            vec![
                engine_module("bing", "BingEngine", Category::General),
                engine_module("brave", "BraveEngine", Category::General),
                engine_module("flickr", "FlickrEngine", Category::Images),
            ],
            vec![later],
        )
    }

    #[test]
    fn test_rejects_bad_safesearch() {
        let err = search()
            .prepare(&SearchQuery::simple("q").with_safesearch(3))
            .err()
            .unwrap();
        assert_eq!(err, SearchError::InvalidSafesearch(3));
    }

    #[test]
    fn test_rejects_bad_time_range() {
        let err = search()
            .prepare(&SearchQuery::simple("q").with_time_range("decade"))
            .err()
            .unwrap();
        assert_eq!(err, SearchError::InvalidTimeRange("decade".to_string()));
    }

    #[test]
    fn test_accepts_absent_time_range() {
        let envelope = search().prepare(&SearchQuery::simple("q")).unwrap();
        assert_eq!(envelope.request.time_range, None);
        let envelope = search()
            .prepare(&SearchQuery::simple("q").with_time_range("year"))
            .unwrap();
        assert_eq!(envelope.request.time_range, Some(TimeRange::Year));
    }

    #[test]
    fn test_rejects_page_zero() {
        assert!(matches!(
            search().prepare(&SearchQuery::simple("q").with_page(0)),
            Err(SearchError::InvalidPage(0))
        ));
    }

    #[test]
    fn test_defaults_to_category_bucket() {
        let envelope = search().prepare(&SearchQuery::simple("q")).unwrap();
        assert_eq!(envelope.engines, vec!["bing", "brave"]);

        let envelope = search()
            .prepare(&SearchQuery::simple("q").with_category("images"))
            .unwrap();
        assert_eq!(envelope.engines, vec!["flickr"]);
    }

    #[test]
    fn test_unknown_category_same_as_general() {
        let general = search()
            .prepare(&SearchQuery::simple("q").with_category("general"))
            .unwrap();
        let unknown = search()
            .prepare(&SearchQuery::simple("q").with_category("podcasts"))
            .unwrap();
        assert_eq!(general.engines, unknown.engines);
        assert_eq!(unknown.category, Category::General);
    }

    #[test]
    fn test_engine_outside_category_rejected() {
        let err = search()
            .prepare(&SearchQuery::simple("q").with_engines(["bing", "Flickr"]))
            .err()
            .unwrap();
        assert_eq!(
            err,
            SearchError::EnginesOutsideCategory {
                category: "general".to_string(),
                engines: vec!["flickr".to_string()],
            }
        );
    }

    #[test]
    fn test_explicit_engines_normalized() {
        let envelope = search()
            .prepare(&SearchQuery::simple("q").with_engines(["BING", " bing ", "yandex", ""]))
            .unwrap();
        assert_eq!(envelope.engines, vec!["bing", "yandex"]);
    }

    #[test]
    fn test_plugin_selection() {
        let envelope = search().prepare(&SearchQuery::simple("q")).unwrap();
        let ids: Vec<_> = envelope.plugins.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["hash"]);

        let err = search()
            .prepare(&SearchQuery::simple("q").with_plugins(["spellcheck"]))
            .err()
            .unwrap();
        assert_eq!(err, SearchError::UnknownPlugins(vec!["spellcheck".to_string()]));

        let err = search()
            .prepare(&SearchQuery::simple("q").with_plugins(["later"]))
            .err()
            .unwrap();
        assert_eq!(err, SearchError::PostPluginSelected(vec!["later".to_string()]));
    }

    #[test]
    fn test_proxy_resolved_into_request() {
        let envelope = search()
            .prepare(&SearchQuery::simple("q").with_proxy("https://p:3128"))
            .unwrap();
        assert_eq!(
            envelope.request.proxy,
            Some(ProxySpec::Url("http://p:3128".to_string()))
        );

        assert!(matches!(
            search().prepare(&SearchQuery::simple("q").with_proxy("ftp://p")),
            Err(SearchError::InvalidProxy(_))
        ));
    }

    #[test]
    fn test_request_defaults_from_settings() {
        let envelope = search()
            .prepare(&SearchQuery::simple("q").with_limit(3).with_country("DE"))
            .unwrap();
        assert_eq!(envelope.request.locale, "en-US");
        assert_eq!(envelope.request.country, "DE");
        assert_eq!(envelope.request.num_results, Some(3));
        assert_eq!(envelope.request.timeout, std::time::Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_execute_reports_unknown_engine() {
        let response = search()
            .execute(&SearchQuery::simple("cats").with_engines(["bing", "yandex"]))
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(
            response.results["yandex"].error(),
            Some("Engine yandex not found!")
        );
        assert_eq!(
            response.results["bing"].results().unwrap()[0].title,
            "cats via BingEngine"
        );
        assert_eq!(response.active_engines, vec!["bing", "brave", "flickr"]);
        assert_eq!(response.active_plugins, vec!["hash", "later"]);
        assert!(response.pre_plugins.contains_key("hash"));
    }
}
