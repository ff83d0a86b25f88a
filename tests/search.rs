//! End-to-end behavior of the search orchestrator

mod common;

use common::*;
use moa_search::config::{AdapterConfig, AdapterConfigs};
use moa_search::engines::{Category, EngineLoader, EngineModule};
use moa_search::plugins::{PluginLoader, PluginModule};
use moa_search::{Engine, Search, SearchError, SearchQuery, Settings};
use std::collections::HashSet;

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.adapters.insert("SpellPlugin", AdapterConfig::typed("post"));
    settings.adapters.insert("WeirdPlugin", AdapterConfig::typed("mid"));
    settings.adapters.insert("EchoPlugin", AdapterConfig::typed("pre"));
    settings
}

#[tokio::test]
async fn test_cats_scenario() {
    init_tracing();
    let search = Search::from_modules(
        &Settings::default(),
        vec![
            fixed("alpha", "AlphaEngine", Category::General, 5),
            failing("beta", "BetaEngine", "HTTP 503 from upstream"),
        ],
        vec![],
    );

    let response = search
        .execute(&SearchQuery::simple("cats").with_limit(2))
        .await
        .unwrap();

    let alpha = response.results["alpha"].results().unwrap();
    let titles: Vec<_> = alpha.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["cats #0", "cats #1"]);
    assert_eq!(
        response.results["beta"].error(),
        Some("HTTP 503 from upstream")
    );
    assert!(response.active_engines.contains(&"alpha".to_string()));
    assert!(response.active_engines.contains(&"beta".to_string()));
    assert!(response.failed_engines.is_empty());
}

#[tokio::test]
async fn test_panicking_engine_is_contained() {
    init_tracing();
    let search = Search::from_modules(
        &Settings::default(),
        vec![
            fixed("alpha", "AlphaEngine", Category::General, 3),
            exploding(),
        ],
        vec![],
    );

    let response = search.execute(&SearchQuery::simple("dogs")).await.unwrap();

    assert_eq!(response.results["alpha"].results().unwrap().len(), 3);
    let error = response.results["exploding"].error().unwrap();
    assert!(error.contains("parser blew up"), "{error}");
}

#[tokio::test]
async fn test_unknown_engine_not_found() {
    let search = Search::from_modules(
        &Settings::default(),
        vec![fixed("alpha", "AlphaEngine", Category::General, 1)],
        vec![],
    );

    let response = search
        .execute(&SearchQuery::simple("q").with_engines(["alpha", "nope"]))
        .await
        .unwrap();
    assert_eq!(response.results["nope"].error(), Some("Engine nope not found!"));
    assert!(!response.results["alpha"].is_error());
}

#[tokio::test]
async fn test_validation_rejects_before_dispatch() {
    let search = Search::from_modules(
        &Settings::default(),
        vec![fixed("alpha", "AlphaEngine", Category::General, 1)],
        vec![],
    );

    let cases = [
        (SearchQuery::simple("q").with_safesearch(3), SearchError::InvalidSafesearch(3)),
        (
            SearchQuery::simple("q").with_time_range("decade"),
            SearchError::InvalidTimeRange("decade".to_string()),
        ),
        (
            SearchQuery::simple("q").with_proxy("ftp://x"),
            SearchError::InvalidProxy("ftp://x".to_string()),
        ),
    ];

    for (query, expected) in cases {
        let err = search.execute(&query).await.err().unwrap();
        assert_eq!(std::mem::discriminant(&err), std::mem::discriminant(&expected));
    }
}

#[tokio::test]
async fn test_unknown_category_matches_general() {
    let search = Search::from_modules(
        &Settings::default(),
        vec![
            fixed("alpha", "AlphaEngine", Category::General, 1),
            fixed("pics", "PicsEngine", Category::Images, 1),
        ],
        vec![],
    );

    let general = search
        .execute(&SearchQuery::simple("q").with_category("general"))
        .await
        .unwrap();
    let unknown = search
        .execute(&SearchQuery::simple("q").with_category("holograms"))
        .await
        .unwrap();

    let keys = |r: &moa_search::ResponseEnvelope| r.results.keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys(&general), keys(&unknown));
    assert_eq!(keys(&general), vec!["alpha"]);
}

#[tokio::test]
async fn test_pre_plugins_run_with_engines() {
    let search = Search::from_modules(
        &settings(),
        vec![fixed("alpha", "AlphaEngine", Category::General, 1)],
        vec![declared("echo", "EchoPlugin"), declared("spell", "SpellPlugin")],
    );

    let response = search
        .execute(&SearchQuery::simple("md5 hello"))
        .await
        .unwrap();

    assert_eq!(
        response.pre_plugins.keys().cloned().collect::<Vec<_>>(),
        vec!["echo", "hash"]
    );
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["pre_plugins"]["echo"], serde_json::json!({"echo": "md5 hello"}));
    assert!(json["pre_plugins"]["hash"]["answer"]
        .as_str()
        .unwrap()
        .contains("5d41402abc4b2a76b9719d911017c592"));
    assert_eq!(search.plugins().post_pool(), ["spell"]);
}

#[test]
fn test_discovery_partitions_modules() {
    let modules: Vec<EngineModule> = vec![
        fixed("alpha", "AlphaEngine", Category::General, 1),
        EngineModule::new("empty"),
        fixed("alpha_again", "AlphaEngine", Category::News, 1),
        EngineModule::single("broken", "BrokenEngine", |_: &AdapterConfigs| {
            Err::<Box<dyn Engine>, _>(anyhow::anyhow!("missing api key"))
        }),
        EngineModule::single(
            "panicky",
            "PanickyEngine",
            |_: &AdapterConfigs| -> anyhow::Result<Box<dyn Engine>> { panic!("bad constructor") },
        ),
        EngineModule::single("nameless", "Engine", |_: &AdapterConfigs| {
            Ok(Box::new(Fixed {
                type_name: "Engine",
                category: Category::General,
                count: 0,
            }) as Box<dyn Engine>)
        }),
        fixed("pics", "PicsEngine", Category::Images, 1),
    ];
    let scanned = modules.len();

    let registry = EngineLoader::load(&Settings::default(), modules);

    let active: HashSet<_> = registry.active().iter().cloned().collect();
    let failed: HashSet<_> = registry.failed().iter().cloned().collect();
    assert!(active.is_disjoint(&failed));
    assert_eq!(active.len() + failed.len(), scanned);
    assert_eq!(registry.active(), ["alpha", "pics"]);
    assert_eq!(
        registry.failed(),
        ["empty", "alpha_again", "broken", "panicky", "nameless"]
    );

    let classification = registry.list();
    for id in registry.active() {
        let buckets = Category::ALL
            .iter()
            .filter(|c| classification.bucket(**c).contains(id))
            .count();
        assert_eq!(buckets, 1, "{id} should sit in exactly one bucket");
    }
}

#[test]
fn test_plugin_pools() {
    let modules: Vec<PluginModule> = vec![
        declared("echo", "EchoPlugin"),
        declared("spell", "SpellPlugin"),
        declared("weird", "WeirdPlugin"),
        declared("plain", "PlainPlugin"),
    ];

    let registry = PluginLoader::load(&settings(), modules);

    assert_eq!(registry.pre_pool(), ["echo"]);
    assert_eq!(registry.post_pool(), ["spell", "plain"]);
    assert!(registry.get("weird").is_some());
    assert!(!registry.pre_pool().contains(&"weird".to_string()));
    assert!(!registry.post_pool().contains(&"weird".to_string()));
}
