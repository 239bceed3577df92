//! Shared test fixtures: an in-memory registration API with a call log,
//! per-id failure injection, and an optional gate that holds updates until
//! the test releases them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use alertsync_client::api::{ApiError, RegistrationApi, RegistrationUpdate, SharedApi};
use alertsync_core::registration::{Registration, RegistrationId, SectionStatus};
use alertsync_engine::{RegistrationCache, Reconciler, SyncBus};

/// In-memory stand-in for the registration server.
///
/// `update` mutates the mock's own record list the way the real server
/// would, so a subsequent `list` reflects server truth and convergence is
/// observable.
pub struct MockApi {
    records: Mutex<Vec<Registration>>,
    calls: Mutex<Vec<(RegistrationId, RegistrationUpdate)>>,
    list_calls: AtomicUsize,
    fail_updates: Mutex<HashSet<RegistrationId>>,
    fail_list: AtomicBool,
    update_gate: Mutex<Option<Arc<tokio::sync::Semaphore>>>,
}

#[allow(dead_code)]
impl MockApi {
    pub fn new(records: Vec<Registration>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            fail_updates: Mutex::new(HashSet::new()),
            fail_list: AtomicBool::new(false),
            update_gate: Mutex::new(None),
        })
    }

    /// Make every update for `id` fail with a 400.
    pub fn fail_update(&self, id: RegistrationId) {
        self.fail_updates.lock().unwrap().insert(id);
    }

    /// Make every list fetch fail with a 500 until cleared.
    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Hold every update until the returned semaphore gets a permit per call.
    pub fn gate_updates(&self) -> Arc<tokio::sync::Semaphore> {
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        *self.update_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Every `(id, update)` pair seen so far, in arrival order.
    pub fn update_calls(&self) -> Vec<(RegistrationId, RegistrationUpdate)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// What the "server" currently believes.
    pub fn server_records(&self) -> Vec<Registration> {
        self.records.lock().unwrap().clone()
    }

    pub fn set_server_records(&self, records: Vec<Registration>) {
        *self.records.lock().unwrap() = records;
    }
}

#[async_trait]
impl RegistrationApi for MockApi {
    async fn list(&self) -> Result<Vec<Registration>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 500,
                body: "server error".into(),
            });
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update(
        &self,
        id: RegistrationId,
        update: RegistrationUpdate,
    ) -> Result<(), ApiError> {
        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.calls.lock().unwrap().push((id, update));

        if self.fail_updates.lock().unwrap().contains(&id) {
            return Err(ApiError::Api {
                status: 400,
                body: format!("update rejected for {id}"),
            });
        }

        let mut records = self.records.lock().unwrap();
        match update {
            RegistrationUpdate::Resubscribe => {
                if let Some(r) = records.iter_mut().find(|r| r.id == id) {
                    r.is_active = true;
                    r.close_notification = false;
                }
            }
            RegistrationUpdate::Cancel => {
                if let Some(r) = records.iter_mut().find(|r| r.id == id) {
                    r.is_active = false;
                }
            }
            RegistrationUpdate::CloseNotification(on) => {
                if let Some(r) = records.iter_mut().find(|r| r.id == id) {
                    r.close_notification = on;
                }
            }
            RegistrationUpdate::Delete => {
                records.retain(|r| r.id != id);
            }
        }
        Ok(())
    }
}

/// Build a registration with sensible defaults.
#[allow(dead_code)]
pub fn registration(id: RegistrationId, is_active: bool, close_notification: bool) -> Registration {
    Registration {
        id,
        section_code: format!("CIS-1200-{id:03}"),
        is_active,
        auto_resubscribe: false,
        close_notification,
        last_notification_sent_at: None,
        section_status: SectionStatus::Open,
        // Spread creation times so the default sort is exercised.
        original_created_at: Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::hours(id),
    }
}

/// Wire a mock server, cache, bus, and reconciler together, with the cache
/// pre-loaded from the mock.
#[allow(dead_code)]
pub async fn setup(
    records: Vec<Registration>,
) -> (Arc<MockApi>, Arc<RegistrationCache>, Reconciler, Arc<SyncBus>) {
    let api = MockApi::new(records);
    let shared: SharedApi = api.clone();
    let bus = Arc::new(SyncBus::default());
    let cache = RegistrationCache::new(shared.clone(), Arc::clone(&bus));
    cache
        .invalidate()
        .await
        .expect("initial load should succeed");
    let reconciler = Reconciler::new(shared, Arc::clone(&cache), Arc::clone(&bus));
    (api, cache, reconciler, bus)
}
