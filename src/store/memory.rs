//! Lock-guarded in-memory record store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::Resource;
use crate::error::StoreError;
use crate::metrics;

/// Ordered collection of records for one resource type.
///
/// Records are keyed by identifier. Identifiers are handed out in strictly
/// increasing order and never reused, so ascending key order is insertion
/// order.
#[derive(Debug)]
pub struct Store<R: Resource> {
    inner: RwLock<Inner<R>>,
}

#[derive(Debug)]
struct Inner<R> {
    records: BTreeMap<i64, R>,
    /// `None` once `i64::MAX` has been handed out.
    next_id: Option<i64>,
}

impl<R: Resource> Store<R> {
    /// Create an empty store whose first identifier is 1.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store holding the resource's seed records.
    pub fn seeded() -> Self {
        Self::with_records(R::seed())
    }

    /// Create a store holding `records`.
    ///
    /// The counter starts one past the largest identifier given, or is
    /// exhausted when that identifier is `i64::MAX`. A later record with a
    /// duplicate identifier replaces the earlier one.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let records: BTreeMap<i64, R> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = records
            .keys()
            .next_back()
            .map_or(Some(1), |max| max.checked_add(1));
        metrics::set_store_records(R::COLLECTION, records.len());

        Self {
            inner: RwLock::new(Inner { records, next_id }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner<R>> {
        // Mutations never leave the map half-written, so a poisoned lock is still usable.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<R>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// All records in insertion order, as owned copies.
    pub fn list(&self) -> Vec<R> {
        let _timer = metrics::timer_store_op(R::COLLECTION, "list");
        let records: Vec<R> = self.read().records.values().cloned().collect();
        debug!(resource = R::COLLECTION, count = records.len(), "listed records");
        records
    }

    /// The record with identifier `id`.
    pub fn get(&self, id: i64) -> Result<R, StoreError> {
        let _timer = metrics::timer_store_op(R::COLLECTION, "get");
        self.read()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found("get", id))
    }

    /// Validate `draft`, store it under the next identifier and return it.
    ///
    /// The counter only advances when validation succeeds. Fails with
    /// [`StoreError::IdsExhausted`] once every identifier has been used.
    pub fn create(&self, draft: R::Draft) -> Result<R, StoreError> {
        let _timer = metrics::timer_store_op(R::COLLECTION, "create");
        let mut inner = self.write();

        let id = inner.next_id.ok_or_else(|| {
            Self::failed("create", StoreError::IdsExhausted { label: R::LABEL })
        })?;
        let record = R::from_draft(id, draft).map_err(|e| Self::failed("create", e))?;

        inner.next_id = id.checked_add(1);
        inner.records.insert(id, record.clone());
        metrics::set_store_records(R::COLLECTION, inner.records.len());

        info!(resource = R::COLLECTION, id, "created record");
        Ok(record)
    }

    /// Replace every field of the record `id` with `draft`.
    ///
    /// The identifier and the record's position are kept.
    pub fn update(&self, id: i64, draft: R::Draft) -> Result<R, StoreError> {
        let _timer = metrics::timer_store_op(R::COLLECTION, "update");
        let record = R::from_draft(id, draft).map_err(|e| Self::failed("update", e))?;

        let mut inner = self.write();
        let slot = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("update", id))?;
        *slot = record.clone();

        info!(resource = R::COLLECTION, id, "updated record");
        Ok(record)
    }

    /// Remove the record `id`.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let _timer = metrics::timer_store_op(R::COLLECTION, "delete");
        let mut inner = self.write();

        inner
            .records
            .remove(&id)
            .ok_or_else(|| Self::not_found("delete", id))?;
        metrics::set_store_records(R::COLLECTION, inner.records.len());

        info!(resource = R::COLLECTION, id, "deleted record");
        Ok(())
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Identifier the next successful create will receive, `None` when
    /// identifiers are exhausted.
    pub fn next_id(&self) -> Option<i64> {
        self.read().next_id
    }

    fn not_found(op: &'static str, id: i64) -> StoreError {
        Self::failed(op, StoreError::NotFound { label: R::LABEL, id })
    }

    fn failed(op: &'static str, err: StoreError) -> StoreError {
        metrics::inc_store_errors(R::COLLECTION, op, &err);
        err
    }
}

impl<R: Resource> Default for Store<R> {
    fn default() -> Self {
        Self::new()
    }
}
