//! Assembly of the response envelope from raw dispatch outcomes

use super::dispatcher::DispatchOutput;
use super::models::ResponseEnvelope;
use crate::engines::{EngineClassification, SearchOutcome};
use crate::plugins::PluginClassification;
use std::collections::BTreeMap;

/// Registry state captured when the request was dispatched
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub engines: EngineClassification,
    pub plugins: PluginClassification,
}

/// Build the response envelope.
///
/// Engine results are cut to their first `limit` items; error outcomes are
/// left alone. `missing_engines` are requested ids the registry did not know,
/// each recorded as a not-found error.
pub fn assemble(
    query: &str,
    snapshot: RegistrySnapshot,
    output: DispatchOutput,
    missing_engines: &[String],
    limit: Option<usize>,
) -> ResponseEnvelope {
    let mut results: BTreeMap<_, _> = output.engines.into_iter().collect();

    if let Some(limit) = limit.filter(|l| *l > 0) {
        for outcome in results.values_mut() {
            outcome.truncate(limit);
        }
    }

    for id in missing_engines {
        results
            .entry(id.clone())
            .or_insert_with(|| SearchOutcome::not_found(id));
    }

    ResponseEnvelope {
        query: query.to_string(),
        active_engines: snapshot.engines.active,
        failed_engines: snapshot.engines.failed,
        active_plugins: snapshot.plugins.active,
        failed_plugins: snapshot.plugins.failed,
        results,
        pre_plugins: output.plugins.into_iter().collect(),
    }
}
