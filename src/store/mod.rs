//! Resource store: the single source of truth for one entity's collection
//!
//! A [`ResourceStore`] owns the in-memory collection for one entity type
//! together with the lifecycle status and last error of the most recent
//! operation. Operations drive the gateway and fold the response back into
//! the collection; view bindings read [`snapshot`](ResourceStore::snapshot)
//! or watch [`subscribe`](ResourceStore::subscribe) and render from it.
//!
//! # Ordering
//!
//! Each dispatched operation is tagged with a monotonically increasing
//! sequence number. A completion (success or failure) whose sequence number
//! is no longer the latest issued for the store is discarded, so of two
//! overlapping operations the later-issued one always wins regardless of
//! which response arrives last. The discarded operation's caller still
//! receives its own result; only the shared state ignores it. There is no
//! cancellation: an issued request always runs to completion.

use crate::core::error::ApiResult;
use crate::core::resource::Resource;
use crate::core::status::LoadStatus;
use crate::gateway::ResourceGateway;
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

/// Point-in-time view of a store, safe to hand to renderers
#[derive(Debug, Clone)]
pub struct StoreSnapshot<R> {
    /// The collection in server order
    pub records: Vec<R>,

    /// Progress of the most recent operation
    pub status: LoadStatus,

    /// Message of the most recent failure; cleared on every new dispatch
    pub error: Option<String>,
}

impl<R> Default for StoreSnapshot<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
        }
    }
}

struct StoreState<R> {
    /// Records keyed by id; iteration order is insertion order, so a `list`
    /// replacement preserves the server's ordering and no two records can
    /// share an id
    records: IndexMap<i64, R>,
    status: LoadStatus,
    error: Option<String>,
    /// Sequence number of the most recently dispatched operation
    issued: u64,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            status: LoadStatus::Idle,
            error: None,
            issued: 0,
        }
    }
}

/// Store handle for one entity type.
///
/// Cheap to clone; all clones share the same state. The store never holds
/// its lock across a gateway call.
pub struct ResourceStore<R: Resource> {
    gateway: Arc<dyn ResourceGateway<R>>,
    state: Arc<RwLock<StoreState<R>>>,
    publisher: watch::Sender<StoreSnapshot<R>>,
}

impl<R: Resource> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
            publisher: self.publisher.clone(),
        }
    }
}

impl<R: Resource> ResourceStore<R> {
    /// Create a store driving the given gateway
    pub fn new(gateway: Arc<dyn ResourceGateway<R>>) -> Self {
        let (publisher, _) = watch::channel(StoreSnapshot::default());
        Self {
            gateway,
            state: Arc::new(RwLock::new(StoreState::default())),
            publisher,
        }
    }

    // === Operations ===

    /// Fetch the full collection and replace the store's contents with it
    pub async fn fetch_all(&self) -> ApiResult<Vec<R>> {
        self.run_list(R::list_route()).await
    }

    /// Fetch one record by id and upsert it: an existing record with the
    /// same id is replaced in place, otherwise the record is appended
    pub async fn fetch_by_id(&self, id: i64) -> ApiResult<R> {
        let seq = self.begin("get");
        match self.gateway.get(id).await {
            Ok(record) => {
                self.settle(seq, "get", |state| {
                    state.records.insert(record.id(), record.clone());
                });
                Ok(record)
            }
            Err(err) => {
                self.fail(seq, "get", &err);
                Err(err)
            }
        }
    }

    /// Create a record from a draft and append the server's response
    pub async fn create(&self, draft: &R::Draft) -> ApiResult<R> {
        let seq = self.begin("create");
        match self.gateway.create(draft).await {
            Ok(record) => {
                self.settle(seq, "create", |state| {
                    state.records.insert(record.id(), record.clone());
                });
                Ok(record)
            }
            Err(err) => {
                self.fail(seq, "create", &err);
                Err(err)
            }
        }
    }

    /// Update a record. The response replaces the matching record after
    /// being merged through [`Resource::absorb`], so server-resolved fields
    /// the response omits keep their previously known values. Returns the
    /// raw response record.
    pub async fn update(&self, id: i64, draft: &R::Draft) -> ApiResult<R> {
        let seq = self.begin("update");
        match self.gateway.update(id, draft).await {
            Ok(response) => {
                self.settle(seq, "update", |state| {
                    let merged = match state.records.get(&response.id()) {
                        Some(existing) => existing.absorb(response.clone()),
                        None => response.clone(),
                    };
                    state.records.insert(merged.id(), merged);
                });
                Ok(response)
            }
            Err(err) => {
                self.fail(seq, "update", &err);
                Err(err)
            }
        }
    }

    /// Delete the record with the given id, removing it from the
    /// collection on success and leaving every other record untouched
    pub async fn remove(&self, id: i64) -> ApiResult<()> {
        let seq = self.begin("delete");
        match self.gateway.delete(id).await {
            Ok(()) => {
                self.settle(seq, "delete", |state| {
                    state.records.shift_remove(&id);
                });
                Ok(())
            }
            Err(err) => {
                self.fail(seq, "delete", &err);
                Err(err)
            }
        }
    }

    /// Fetch an alternate collection route (recent, search, by-category)
    /// with `list` folding semantics: the response replaces the collection.
    pub(crate) async fn run_list(&self, route: String) -> ApiResult<Vec<R>> {
        let seq = self.begin("list");
        match self.gateway.list(&route).await {
            Ok(records) => {
                self.settle(seq, "list", |state| {
                    state.records = records.iter().map(|r| (r.id(), r.clone())).collect();
                });
                Ok(records)
            }
            Err(err) => {
                self.fail(seq, "list", &err);
                Err(err)
            }
        }
    }

    // === Reads ===

    /// Current collection in server order
    pub fn records(&self) -> Vec<R> {
        self.read_state().records.values().cloned().collect()
    }

    /// Cached record by id, if present
    pub fn cached(&self, id: i64) -> Option<R> {
        self.read_state().records.get(&id).cloned()
    }

    /// Lifecycle status of the most recent operation
    pub fn status(&self) -> LoadStatus {
        self.read_state().status
    }

    /// Message of the most recent failure
    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    /// Point-in-time view of the whole store
    pub fn snapshot(&self) -> StoreSnapshot<R> {
        let state = self.read_state();
        StoreSnapshot {
            records: state.records.values().cloned().collect(),
            status: state.status,
            error: state.error.clone(),
        }
    }

    /// Subscribe to state changes; the receiver always holds the latest
    /// snapshot
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot<R>> {
        self.publisher.subscribe()
    }

    // === Lifecycle plumbing ===

    fn begin(&self, op: &'static str) -> u64 {
        let seq;
        {
            let mut state = self.write_state();
            state.issued += 1;
            seq = state.issued;
            state.status = LoadStatus::Loading;
            state.error = None;
        }
        tracing::debug!(entity = R::resource_name(), seq, op, "operation dispatched");
        self.publish();
        seq
    }

    fn settle<F>(&self, seq: u64, op: &'static str, fold: F)
    where
        F: FnOnce(&mut StoreState<R>),
    {
        {
            let mut state = self.write_state();
            if state.issued != seq {
                tracing::debug!(
                    entity = R::resource_name(),
                    seq,
                    latest = state.issued,
                    op,
                    "discarding superseded completion"
                );
                return;
            }
            fold(&mut state);
            state.status = LoadStatus::Succeeded;
        }
        tracing::debug!(entity = R::resource_name(), seq, op, "operation succeeded");
        self.publish();
    }

    fn fail(&self, seq: u64, op: &'static str, err: &crate::core::error::ApiError) {
        {
            let mut state = self.write_state();
            if state.issued != seq {
                tracing::debug!(
                    entity = R::resource_name(),
                    seq,
                    latest = state.issued,
                    op,
                    "discarding superseded failure"
                );
                return;
            }
            state.status = LoadStatus::Failed;
            state.error = Some(err.message());
        }
        tracing::warn!(
            entity = R::resource_name(),
            seq,
            op,
            error = %err,
            "operation failed"
        );
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot());
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState<R>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState<R>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
