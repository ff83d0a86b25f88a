//! Shared mock adapters for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use moa_search::config::{AdapterConfig, AdapterConfigs};
use moa_search::engines::{Category, EngineModule};
use moa_search::plugins::PluginModule;
use moa_search::{Engine, Plugin, ResultItem, SearchRequest};
use serde_json::Value;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine returning `count` numbered results
pub struct Fixed {
    pub type_name: &'static str,
    pub category: Category,
    pub count: usize,
}

#[async_trait]
impl Engine for Fixed {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn search(&self, request: &SearchRequest) -> anyhow::Result<Vec<ResultItem>> {
        Ok((0..self.count)
            .map(|i| {
                ResultItem::new(
                    format!("{} #{i}", request.query),
                    format!("https://example.com/{i}"),
                    "",
                )
            })
            .collect())
    }
}

/// Engine that always fails
pub struct Failing {
    pub type_name: &'static str,
    pub message: &'static str,
}

#[async_trait]
impl Engine for Failing {
    fn type_name(&self) -> &str {
        self.type_name
    }

    async fn search(&self, _request: &SearchRequest) -> anyhow::Result<Vec<ResultItem>> {
        anyhow::bail!("{}", self.message)
    }
}

/// Engine that panics mid-search
pub struct Exploding;

#[async_trait]
impl Engine for Exploding {
    fn type_name(&self) -> &str {
        "ExplodingEngine"
    }

    async fn search(&self, _request: &SearchRequest) -> anyhow::Result<Vec<ResultItem>> {
        panic!("parser blew up")
    }
}

/// Plugin whose kind comes from its adapter config
pub struct Declared {
    pub type_name: &'static str,
    pub config: AdapterConfig,
}

#[async_trait]
impl Plugin for Declared {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    async fn run(&self, query: &str) -> anyhow::Result<Value> {
        Ok(serde_json::json!({ "echo": query }))
    }
}

pub fn fixed(
    name: &'static str,
    type_name: &'static str,
    category: Category,
    count: usize,
) -> EngineModule {
    EngineModule::single(name, type_name, move |_: &AdapterConfigs| {
        Ok(Box::new(Fixed {
            type_name,
            category,
            count,
        }) as Box<dyn Engine>)
    })
}

pub fn failing(name: &'static str, type_name: &'static str, message: &'static str) -> EngineModule {
    EngineModule::single(name, type_name, move |_: &AdapterConfigs| {
        Ok(Box::new(Failing { type_name, message }) as Box<dyn Engine>)
    })
}

pub fn exploding() -> EngineModule {
    EngineModule::single("exploding", "ExplodingEngine", |_: &AdapterConfigs| {
        Ok(Box::new(Exploding) as Box<dyn Engine>)
    })
}

pub fn declared(name: &'static str, type_name: &'static str) -> PluginModule {
    PluginModule::single(name, type_name, move |configs: &AdapterConfigs| {
        Ok(Box::new(Declared {
            type_name,
            config: configs.get(type_name),
        }) as Box<dyn Plugin>)
    })
}
