//! HTTP API module exposing CRUD routes for one resource.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::{ApiOptions, AppState};
pub use routes::{build_app, create_router, serve, API_PREFIX};
