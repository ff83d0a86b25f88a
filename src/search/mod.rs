//! Search orchestration module
//!
//! Validates requests, fans them out across engines and pre-plugins, and
//! assembles the per-adapter response envelope.

mod aggregator;
mod dispatcher;
mod executor;
mod models;

pub use aggregator::{assemble, RegistrySnapshot};
pub use dispatcher::{DispatchOutput, Dispatcher, TIMEOUT_MESSAGE};
pub use executor::Search;
pub use models::*;
