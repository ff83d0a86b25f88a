//! Web server module
//!
//! Exposes the search orchestrator as a JSON HTTP API.

mod handlers;
mod routes;
mod state;

pub use handlers::{ApiError, SearchParams};
pub use routes::create_router;
pub use state::AppState;
