//! The resource abstraction the store and router are generic over.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// One resource type served by a [`Store`](super::Store).
///
/// Implementors describe how a request body (the draft) becomes a stored
/// record. The identifier is always supplied by the store; drafts never
/// carry one.
pub trait Resource: Clone + Debug + Serialize + Send + Sync + 'static {
    /// Request body accepted by create and update.
    type Draft: DeserializeOwned + Send + 'static;

    /// Collection path segment, e.g. `records`.
    const COLLECTION: &'static str;

    /// Singular label used in messages, e.g. `Record`.
    const LABEL: &'static str;

    /// Validate `draft` and build the record stored under `id`.
    ///
    /// Returns [`StoreError::Validation`] for the first violated constraint.
    fn from_draft(id: i64, draft: Self::Draft) -> Result<Self, StoreError>;

    /// Store-assigned identifier.
    fn id(&self) -> i64;

    /// Records a fresh process starts with.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}
