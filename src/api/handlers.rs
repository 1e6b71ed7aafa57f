//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use super::extract::{JsonBody, RecordId};
use crate::config::Config;
use crate::error::{ErrorResponse, StoreError};
use crate::store::{Resource, Store};

/// Response shaping options for one service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiOptions {
    /// Wrap list/detail responses in `{"data": ...}`.
    pub envelope: bool,
    /// Answer with permissive CORS headers.
    pub cors: bool,
}

impl ApiOptions {
    /// Effective options for `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            envelope: config.envelope_enabled(),
            cors: config.cors_enabled(),
        }
    }

    /// Render a single record.
    fn one<R: Serialize>(self, status: StatusCode, record: R) -> Response {
        if self.envelope {
            (status, Json(DataEnvelope { data: record })).into_response()
        } else {
            (status, Json(record)).into_response()
        }
    }
}

/// Application state shared with handlers.
pub struct AppState<R: Resource> {
    /// The record store.
    pub store: Arc<Store<R>>,
    /// Response shaping.
    pub options: ApiOptions,
    /// Prometheus handle, when the recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl<R: Resource> AppState<R> {
    /// Create new app state around `store`.
    pub fn new(store: Store<R>, options: ApiOptions) -> Self {
        Self {
            store: Arc::new(store),
            options,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl<R: Resource> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options,
            metrics: self.metrics.clone(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "healthy".
    pub status: &'static str,
    /// Which service answered.
    pub message: String,
}

/// Envelope for single-record responses.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    /// The record.
    pub data: T,
}

/// Envelope for list responses.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    /// The records, in insertion order.
    pub data: Vec<T>,
    /// Number of records.
    pub count: usize,
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation message.
    pub message: String,
}

/// Health check handler - always returns 200.
pub async fn health<R: Resource>() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: format!("{} API is running", R::COLLECTION),
    })
}

/// List every record.
pub async fn list<R: Resource>(State(state): State<AppState<R>>) -> Response {
    let records = state.store.list();

    if state.options.envelope {
        Json(ListEnvelope {
            count: records.len(),
            data: records,
        })
        .into_response()
    } else {
        Json(records).into_response()
    }
}

/// Fetch one record by identifier.
pub async fn get_one<R: Resource>(
    State(state): State<AppState<R>>,
    RecordId(id): RecordId,
) -> Result<Response, StoreError> {
    let record = state.store.get(id)?;
    Ok(state.options.one(StatusCode::OK, record))
}

/// Create a record from the request body.
pub async fn create<R: Resource>(
    State(state): State<AppState<R>>,
    JsonBody(draft): JsonBody<R::Draft>,
) -> Result<Response, StoreError> {
    let record = state.store.create(draft)?;
    Ok(state.options.one(StatusCode::CREATED, record))
}

/// Replace a record wholesale.
pub async fn update<R: Resource>(
    State(state): State<AppState<R>>,
    RecordId(id): RecordId,
    JsonBody(draft): JsonBody<R::Draft>,
) -> Result<Response, StoreError> {
    let record = state.store.update(id, draft)?;
    Ok(state.options.one(StatusCode::OK, record))
}

/// Delete a record.
pub async fn delete<R: Resource>(
    State(state): State<AppState<R>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, StoreError> {
    state.store.delete(id)?;
    Ok(Json(MessageResponse {
        message: format!("{} deleted successfully", R::LABEL),
    }))
}

/// Prometheus exposition, 404 when metrics are disabled.
pub async fn render_metrics<R: Resource>(State(state): State<AppState<R>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => not_found().await.into_response(),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
}
