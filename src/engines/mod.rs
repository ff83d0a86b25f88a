//! Search engine module
//!
//! Defines the Engine capability, its category tag, and the registry engines
//! are discovered into. Concrete provider adapters live outside this crate and
//! are handed to [`EngineLoader`] as modules.

mod category;
mod loader;
mod registry;
mod traits;

pub use category::Category;
pub use loader::{EngineLoader, EngineModule, ENGINE_SUFFIX};
pub use registry::{EngineClassification, EngineRegistry};
pub use traits::*;
