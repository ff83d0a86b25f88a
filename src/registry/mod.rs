//! Adapter discovery shared by the engine and plugin registries

mod discovery;

pub(crate) use discovery::panic_message;
pub use discovery::{derive_id, discover, AdapterModule, Candidate, Discovered, Factory};
