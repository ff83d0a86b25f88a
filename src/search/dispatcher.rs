//! Concurrent dispatch of one request across engines and pre-plugins
//!
//! Every task runs on its own spawned future, gated by a semaphore that acts
//! as the worker pool. Collection waits for all of them; one task failing,
//! erroring or panicking only affects its own slot.

use crate::engines::{Engine, SearchOutcome, SearchRequest};
use crate::plugins::{Plugin, PluginOutcome};
use crate::registry::panic_message;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, warn, Instrument};

/// Message recorded for tasks still running when the deadline expires
pub const TIMEOUT_MESSAGE: &str = "timeout";

/// Raw outcomes of one dispatch wave, keyed by adapter id
#[derive(Debug, Default)]
pub struct DispatchOutput {
    pub engines: HashMap<String, SearchOutcome>,
    pub plugins: HashMap<String, PluginOutcome>,
}

/// Bounded fan-out executor
#[derive(Debug, Clone)]
pub struct Dispatcher {
    workers: usize,
    deadline: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher running at most `workers` tasks at once
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            deadline: None,
        }
    }

    /// Give up on tasks still pending after `deadline`
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every engine and plugin task and wait for all of them.
    ///
    /// Ids must be unique within each task list.
    pub async fn dispatch(
        &self,
        request: &SearchRequest,
        engine_tasks: Vec<(String, Arc<dyn Engine>)>,
        plugin_tasks: Vec<(String, Arc<dyn Plugin>)>,
    ) -> DispatchOutput {
        let pool = Arc::new(Semaphore::new(self.workers));
        let deadline = self.deadline.map(|d| Instant::now() + d);
        let request = Arc::new(request.clone());

        let engine_handles: Vec<_> = engine_tasks
            .into_iter()
            .map(|(id, engine)| {
                let handle = spawn_engine(id.clone(), engine, request.clone(), pool.clone());
                (id, handle)
            })
            .collect();

        let plugin_handles: Vec<_> = plugin_tasks
            .into_iter()
            .map(|(id, plugin)| {
                let handle = spawn_plugin(id.clone(), plugin, request.query.clone(), pool.clone());
                (id, handle)
            })
            .collect();

        let _guard = AbortOnDrop(
            engine_handles
                .iter()
                .map(|(_, h)| h.abort_handle())
                .chain(plugin_handles.iter().map(|(_, h)| h.abort_handle()))
                .collect(),
        );

        let engines = join_all(engine_handles.into_iter().map(|(id, handle)| async move {
            let outcome = settle(&id, handle, deadline)
                .await
                .unwrap_or_else(SearchOutcome::Error);
            (id, outcome)
        }));

        let plugins = join_all(plugin_handles.into_iter().map(|(id, handle)| async move {
            let outcome = settle(&id, handle, deadline)
                .await
                .unwrap_or_else(PluginOutcome::error);
            (id, outcome)
        }));

        let (engines, plugins) = tokio::join!(engines, plugins);

        DispatchOutput {
            engines: engines.into_iter().collect(),
            plugins: plugins.into_iter().collect(),
        }
    }
}

/// Aborts the tracked tasks when the dispatch future is dropped
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

fn spawn_engine(
    id: String,
    engine: Arc<dyn Engine>,
    request: Arc<SearchRequest>,
    pool: Arc<Semaphore>,
) -> JoinHandle<SearchOutcome> {
    tokio::spawn(async move {
        let _permit = pool.acquire_owned().await.ok();
        let start = Instant::now();
        let outcome = SearchOutcome::from(engine.search(&request).await);

        match &outcome {
            SearchOutcome::Results(results) => debug!(
                "Engine {} returned {} results in {:?}",
                id,
                results.len(),
                start.elapsed()
            ),
            SearchOutcome::Error(e) => warn!("Engine {} failed: {}", id, e),
        }
        outcome
    }
    .in_current_span())
}

fn spawn_plugin(
    id: String,
    plugin: Arc<dyn Plugin>,
    query: String,
    pool: Arc<Semaphore>,
) -> JoinHandle<PluginOutcome> {
    tokio::spawn(async move {
        let _permit = pool.acquire_owned().await.ok();
        let start = Instant::now();
        let outcome = PluginOutcome::from(plugin.run(&query).await);

        if let PluginOutcome::Error { error } = &outcome {
            warn!("Plugin {} failed: {}", id, error);
        } else {
            debug!("Plugin {} finished in {:?}", id, start.elapsed());
        }
        outcome
    }
    .in_current_span())
}

/// Wait for one task. A panic, cancellation or expired deadline becomes an
/// error message.
async fn settle<T>(
    id: &str,
    handle: JoinHandle<T>,
    deadline: Option<Instant>,
) -> Result<T, String> {
    let joined = match deadline {
        None => handle.await,
        Some(deadline) => {
            let abort = handle.abort_handle();
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.abort();
                    warn!("Task {} still pending at deadline, abandoned", id);
                    return Err(TIMEOUT_MESSAGE.to_string());
                }
            }
        }
    };

    joined.map_err(|e| {
        if e.is_panic() {
            let message = panic_message(e.into_panic().as_ref());
            warn!("Task {} panicked: {}", id, message);
            message
        } else {
            e.to_string()
        }
    })
}
