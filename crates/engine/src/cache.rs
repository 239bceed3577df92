//! Revalidating read cache for the registration list.
//!
//! [`RegistrationCache`] is the single shared mutable resource in the engine:
//! only [`mutate`](RegistrationCache::mutate) and
//! [`invalidate`](RegistrationCache::invalidate) write to it, and reads are
//! "sticky": while a refresh is in flight, [`read`](RegistrationCache::read)
//! keeps serving the previous known-good list instead of an empty value, so
//! routine polling never flickers.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use alertsync_client::api::SharedApi;
use alertsync_core::registration::{Registration, RegistrationId};

use crate::error::EngineError;
use crate::events::{SyncBus, SyncEvent};

/// Stale-while-revalidate cache over `GET /registrations/`.
///
/// Created via [`RegistrationCache::new`]; the returned `Arc` can be cheaply
/// cloned into reconcilers and background tasks.
pub struct RegistrationCache {
    api: SharedApi,
    /// Last known-good list. Served as-is until a refresh succeeds.
    records: RwLock<Vec<Registration>>,
    /// Set while a fetch is in flight; repeated invalidations coalesce.
    refreshing: AtomicBool,
    bus: Arc<SyncBus>,
}

impl RegistrationCache {
    /// Create an empty cache. Call [`invalidate`](Self::invalidate) to load
    /// the first list.
    pub fn new(api: SharedApi, bus: Arc<SyncBus>) -> Arc<Self> {
        Arc::new(Self {
            api,
            records: RwLock::new(Vec::new()),
            refreshing: AtomicBool::new(false),
            bus,
        })
    }

    /// The most recently known-good registration list.
    pub async fn read(&self) -> Vec<Registration> {
        self.records.read().await.clone()
    }

    /// Look up a single registration in the cached list.
    pub async fn find(&self, id: RegistrationId) -> Option<Registration> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Fetch a fresh list from the server and replace the cached one.
    ///
    /// Idempotent under repeated calls: if a fetch is already in flight the
    /// call returns immediately without queueing a second one. A failed
    /// fetch leaves the last known-good list in place and surfaces the
    /// error to the caller.
    pub async fn invalidate(&self) -> Result<(), EngineError> {
        if self.refreshing.swap(true, Ordering::SeqCst) {
            tracing::debug!("Refresh already in flight, coalescing");
            return Ok(());
        }

        let result = self.api.list().await;
        self.refreshing.store(false, Ordering::SeqCst);

        match result {
            Ok(list) => {
                let count = list.len();
                *self.records.write().await = list;
                tracing::debug!(count, "Registration list refreshed");
                self.bus.publish(SyncEvent::ListRefreshed { count });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration refresh failed, keeping last good list");
                Err(EngineError::Api(e))
            }
        }
    }

    /// Replace the cached list with an optimistic projection while
    /// `confirmation` settles in the background.
    ///
    /// The optimistic list is visible to [`read`](Self::read) as soon as this
    /// method returns. Whether `confirmation` succeeds or fails, the cache
    /// invalidates afterwards, so the optimistic value is always eventually
    /// superseded by a server-verified one. The returned handle resolves to
    /// the confirmation's outcome.
    pub async fn mutate<F>(
        self: &Arc<Self>,
        optimistic: Vec<Registration>,
        confirmation: F,
    ) -> JoinHandle<Result<(), EngineError>>
    where
        F: Future<Output = Result<(), EngineError>> + Send + 'static,
    {
        *self.records.write().await = optimistic;

        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let result = confirmation.await;

            // Reconcile with server truth regardless of the outcome. There is
            // no explicit rollback of the optimistic value; the refresh is it.
            if let Err(e) = cache.invalidate().await {
                tracing::warn!(error = %e, "Post-mutation refresh failed");
            }

            result
        })
    }
}
