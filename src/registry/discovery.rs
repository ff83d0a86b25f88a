//! Adapter discovery
//!
//! Adapters are registered explicitly as modules, each listing the adapter
//! types it provides. A module must provide exactly one. Anything that goes
//! wrong while resolving or constructing a module's adapter is recorded
//! against that module and discovery moves on.

use crate::config::AdapterConfigs;
use crate::error::DiscoveryError;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Constructor for one adapter type
pub type Factory<T> = Box<dyn Fn(&AdapterConfigs) -> anyhow::Result<Box<T>> + Send + Sync>;

/// An adapter type offered by a module
pub struct Candidate<T: ?Sized> {
    type_name: String,
    factory: Factory<T>,
}

impl<T: ?Sized> Candidate<T> {
    pub fn new<F>(type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&AdapterConfigs) -> anyhow::Result<Box<T>> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            factory: Box::new(factory),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// A named unit of registration holding zero or more candidate types
pub struct AdapterModule<T: ?Sized> {
    name: String,
    candidates: Vec<Candidate<T>>,
}

impl<T: ?Sized> AdapterModule<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
        }
    }

    /// Module with a single adapter type
    pub fn single<F>(name: impl Into<String>, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&AdapterConfigs) -> anyhow::Result<Box<T>> + Send + Sync + 'static,
    {
        Self::new(name).candidate(Candidate::new(type_name, factory))
    }

    pub fn candidate(mut self, candidate: Candidate<T>) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Output of a discovery pass
pub struct Discovered<T: ?Sized> {
    /// Loaded adapters in module order, keyed by derived id
    pub adapters: Vec<(String, Arc<T>)>,
    /// Names of modules that failed
    pub failed: Vec<String>,
}

/// Derive an adapter id from its type name: lower-cased with `suffix`
/// stripped from the end (`BingEngine` -> `bing`).
pub fn derive_id(type_name: &str, suffix: &str) -> String {
    let lower = type_name.to_lowercase();
    let suffix = suffix.to_lowercase();
    match lower.strip_suffix(suffix.as_str()) {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

/// Run discovery over `modules`. Never fails as a whole.
pub fn discover<T: ?Sized>(
    modules: Vec<AdapterModule<T>>,
    configs: &AdapterConfigs,
    suffix: &str,
) -> Discovered<T> {
    let mut adapters: Vec<(String, Arc<T>)> = Vec::new();
    let mut seen = HashSet::new();
    let mut failed = Vec::new();

    for module in modules {
        match load_module(&module, configs, suffix, &seen) {
            Ok((id, adapter)) => {
                debug!("Discovered {} '{}' from module {}", suffix, id, module.name);
                seen.insert(id.clone());
                adapters.push((id, adapter));
            }
            Err(e) => {
                error!("{} {} failed: {}", suffix, module.name, e);
                failed.push(module.name);
            }
        }
    }

    Discovered { adapters, failed }
}

fn load_module<T: ?Sized>(
    module: &AdapterModule<T>,
    configs: &AdapterConfigs,
    suffix: &str,
    seen: &HashSet<String>,
) -> Result<(String, Arc<T>), DiscoveryError> {
    let candidate = match module.candidates.as_slice() {
        [] => return Err(DiscoveryError::NoCapability),
        [only] => only,
        many => return Err(DiscoveryError::MultipleCapabilities(many.len())),
    };

    let id = derive_id(&candidate.type_name, suffix);
    if id.is_empty() {
        return Err(DiscoveryError::EmptyId(candidate.type_name.clone()));
    }
    if seen.contains(&id) {
        return Err(DiscoveryError::DuplicateId(id));
    }

    let built = catch_unwind(AssertUnwindSafe(|| (candidate.factory)(configs)))
        .map_err(|payload| DiscoveryError::Panicked(panic_message(payload.as_ref())))?
        .map_err(|e| DiscoveryError::Instantiation(format!("{e:#}")))?;

    Ok((id, Arc::from(built)))
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
