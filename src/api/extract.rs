//! Request extractors that reject with [`StoreError`].

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;

/// Integer identifier taken from the `:id` path segment.
///
/// Anything that does not parse as an `i64` is rejected with
/// [`StoreError::InvalidInput`] before a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = StoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StoreError::InvalidInput)?;

        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| StoreError::InvalidInput)
    }
}

/// JSON request body.
///
/// The body is parsed as JSON whatever the `Content-Type` says and must be
/// a JSON object. Unreadable, malformed or non-object bodies become
/// [`StoreError::Validation`].
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = StoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| StoreError::validation(rejection.body_text()))?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::validation(e.to_string()))?;
        if !value.is_object() {
            return Err(StoreError::validation("request body must be a JSON object"));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| StoreError::validation(e.to_string()))
    }
}
