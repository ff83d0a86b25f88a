//! Settings structures for moa-search configuration

use super::adapters::{AdapterConfig, AdapterConfigs};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure matching moa.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    /// Per-adapter params and declared type, keyed by adapter type name.
    /// Built-in entries are kept unless the file overrides them.
    #[serde(deserialize_with = "adapters_with_builtins")]
    pub adapters: AdapterConfigs,
    /// Optional JSON file with more adapter entries
    pub adapter_params_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            adapters: default_adapters(),
            adapter_params_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;
        settings.load_adapter_params()?;
        Ok(settings)
    }

    /// Locate and load settings, falling back to defaults.
    ///
    /// Checks `MOA_SETTINGS_PATH`, then `moa.yml`, `config/moa.yml` and the
    /// platform config directory.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("MOA_SETTINGS_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                tracing::info!("Loading settings from: {}", path.display());
                let mut settings = Self::from_file(&path)?;
                settings.merge_env();
                return Ok(settings);
            }
        }

        let mut paths = vec![PathBuf::from("moa.yml"), PathBuf::from("config/moa.yml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("moa-search/moa.yml"));
        }

        for path in paths.iter().filter(|p| p.exists()) {
            tracing::info!("Loading settings from: {}", path.display());
            let mut settings = Self::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }

        tracing::info!("No settings file found, using defaults");
        let mut settings = Self::default();
        settings.merge_env();
        Ok(settings)
    }

    /// Merge entries from `adapter_params_path`; entries already in
    /// `adapters` win.
    fn load_adapter_params(&mut self) -> Result<()> {
        if let Some(ref path) = self.adapter_params_path {
            let extra = AdapterConfigs::from_json_file(path)?;
            self.adapters.merge_missing(extra);
        }
        Ok(())
    }

    /// Merge with environment variables (MOA_* prefix)
    pub fn merge_env(&mut self) {
        if let Some(workers) = env_parse::<usize>("MOA_MAX_WORKERS") {
            self.search.max_workers = workers;
        }
        if let Some(timeout) = env_parse::<f64>("MOA_REQUEST_TIMEOUT") {
            self.search.request_timeout = timeout;
        }
        if let Some(deadline) = env_parse::<f64>("MOA_DEADLINE") {
            self.search.deadline = Some(deadline);
        }
        if let Ok(val) = std::env::var("MOA_DEFAULT_LOCALE") {
            self.search.default_locale = val;
        }
        if let Ok(val) = std::env::var("MOA_DEFAULT_COUNTRY") {
            self.search.default_country = val;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Worker pool size shared by one dispatch wave
    pub max_workers: usize,
    /// Timeout handed to each adapter, in seconds
    pub request_timeout: f64,
    /// Upper bound for `request_timeout`
    pub max_request_timeout: f64,
    /// Overall per-request deadline in seconds; None waits for every task
    pub deadline: Option<f64>,
    /// Locale used when a request does not give one
    pub default_locale: String,
    /// Country used when a request does not give one
    pub default_country: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_workers: 16,
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            max_request_timeout: crate::MAX_TIMEOUT as f64,
            deadline: None,
            default_locale: "en-US".to_string(),
            default_country: "US".to_string(),
        }
    }
}

impl SearchSettings {
    /// Pool size, never below one
    pub fn workers(&self) -> usize {
        self.max_workers.max(1)
    }

    /// Effective per-adapter timeout. Values that do not fit a `Duration`
    /// fall back to `MAX_TIMEOUT`.
    pub fn adapter_timeout(&self) -> Duration {
        let secs = self.request_timeout.min(self.max_request_timeout).max(0.0);
        Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
            tracing::warn!(
                "request_timeout {} is out of range, using {}s",
                secs,
                crate::MAX_TIMEOUT
            );
            Duration::from_secs(crate::MAX_TIMEOUT)
        })
    }

    /// Effective overall deadline, if any. An out-of-range deadline is
    /// treated as none.
    pub fn deadline(&self) -> Option<Duration> {
        let secs = self.deadline.filter(|d| *d > 0.0)?;
        match Duration::try_from_secs_f64(secs) {
            Ok(deadline) => Some(deadline),
            Err(_) => {
                tracing::warn!("deadline {} is out of range, ignoring it", secs);
                None
            }
        }
    }
}

/// Default adapter table for the built-in plugins
fn default_adapters() -> AdapterConfigs {
    AdapterConfigs::new().with("HashPlugin", AdapterConfig::typed("pre"))
}

fn adapters_with_builtins<'de, D>(
    deserializer: D,
) -> std::result::Result<AdapterConfigs, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mut adapters = AdapterConfigs::deserialize(deserializer)?;
    adapters.merge_missing(default_adapters());
    Ok(adapters)
}
