//! In-memory CRUD REST services.
//!
//! Two small services share one implementation: health records served at
//! `/api/v1/records` and users served at `/api/v1/users`. Each keeps an
//! ordered, lock-guarded collection in process memory and hands out
//! identifiers that are never reused.
//!
//! ```text
//! POST   /api/v1/records        -> 201 {"id": 3, ...}
//! GET    /api/v1/records/3      -> 200 {"id": 3, ...}
//! DELETE /api/v1/records/3      -> 200 {"message": "Record deleted successfully"}
//! POST   /api/v1/records        -> 201 {"id": 4, ...}   (3 is never reused)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`model`]: Health record and user resources
//! - [`store`]: The generic in-memory store
//! - [`api`]: HTTP routes, handlers and middleware
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result, StoreError};
