//! Single-action reconciler.
//!
//! Validates a requested action against the registration's current state,
//! decides between optimistic and pessimistic dispatch, issues the network
//! operation, and feeds the result back into the cache. Exactly one network
//! request goes out per reconciled id per invocation.

use std::sync::Arc;

use tokio::task::JoinHandle;

use alertsync_client::api::{RegistrationUpdate, SharedApi};
use alertsync_core::action::{apply_to_all, AlertAction};
use alertsync_core::error::CoreError;
use alertsync_core::registration::RegistrationId;

use crate::cache::RegistrationCache;
use crate::error::EngineError;
use crate::events::{SyncBus, SyncEvent};

/// How a dispatch settled from the caller's point of view.
#[derive(Debug)]
pub enum Dispatched {
    /// Applied locally; the server confirmation is still settling in the
    /// background. The handle resolves to the confirmation's outcome.
    Optimistic(JoinHandle<Result<(), EngineError>>),
    /// The server confirmed before any local state changed.
    Confirmed,
}

/// Drives single and batch action dispatch against the cache.
#[derive(Clone)]
pub struct Reconciler {
    pub(crate) api: SharedApi,
    pub(crate) cache: Arc<RegistrationCache>,
    pub(crate) bus: Arc<SyncBus>,
}

impl Reconciler {
    pub fn new(api: SharedApi, cache: Arc<RegistrationCache>, bus: Arc<SyncBus>) -> Self {
        Self { api, cache, bus }
    }

    /// Dispatch one action for one registration.
    ///
    /// `Enable` is optimistic: the cached record flips immediately and the
    /// resubscribe request settles in the background. Everything else is
    /// pessimistic: the request goes out first and local state only changes
    /// (via a refresh) once the server confirms. An `EnableClosedNotif` on
    /// an inactive registration is rejected locally with no network call.
    pub async fn dispatch_action(
        &self,
        id: RegistrationId,
        action: AlertAction,
    ) -> Result<Dispatched, EngineError> {
        let record = self
            .cache
            .find(id)
            .await
            .ok_or(CoreError::NotFound(id))?;

        if let Err(e) = action.validate(&record) {
            tracing::debug!(id, ?action, "Rejected invalid transition locally");
            self.bus.publish(SyncEvent::ActionFailed {
                id,
                action,
                reason: e.to_string(),
            });
            return Err(e.into());
        }

        match action {
            AlertAction::Enable => self.dispatch_optimistic(id, action).await,
            _ => self.dispatch_pessimistic(id, action).await,
        }
    }

    /// Apply locally first, confirm in the background.
    async fn dispatch_optimistic(
        &self,
        id: RegistrationId,
        action: AlertAction,
    ) -> Result<Dispatched, EngineError> {
        let mut optimistic = self.cache.read().await;
        apply_to_all(&mut optimistic, &[id], action);

        let api = Arc::clone(&self.api);
        let bus = Arc::clone(&self.bus);
        let confirmation = async move {
            match api.update(id, update_for(action)).await {
                Ok(()) => {
                    bus.publish(SyncEvent::ActionApplied { id, action });
                    Ok(())
                }
                Err(e) => {
                    // No rollback here: the refresh that follows settlement
                    // restores server truth.
                    tracing::warn!(id, ?action, error = %e, "Optimistic action rejected by server");
                    bus.publish(SyncEvent::ActionFailed {
                        id,
                        action,
                        reason: e.to_string(),
                    });
                    Err(EngineError::Api(e))
                }
            }
        };

        tracing::debug!(id, ?action, "Dispatching optimistically");
        let handle = self.cache.mutate(optimistic, confirmation).await;
        Ok(Dispatched::Optimistic(handle))
    }

    /// Confirm with the server first; only then refresh local state.
    async fn dispatch_pessimistic(
        &self,
        id: RegistrationId,
        action: AlertAction,
    ) -> Result<Dispatched, EngineError> {
        tracing::debug!(id, ?action, "Dispatching pessimistically");

        match self.api.update(id, update_for(action)).await {
            Ok(()) => {
                if let Err(e) = self.cache.invalidate().await {
                    tracing::warn!(id, error = %e, "Post-action refresh failed");
                }
                self.bus.publish(SyncEvent::ActionApplied { id, action });
                Ok(Dispatched::Confirmed)
            }
            Err(e) => {
                tracing::warn!(id, ?action, error = %e, "Action rejected, local state unchanged");
                self.bus.publish(SyncEvent::ActionFailed {
                    id,
                    action,
                    reason: e.to_string(),
                });
                Err(EngineError::Api(e))
            }
        }
    }
}

/// The wire payload each action maps to.
pub(crate) fn update_for(action: AlertAction) -> RegistrationUpdate {
    match action {
        AlertAction::Enable => RegistrationUpdate::Resubscribe,
        AlertAction::Disable => RegistrationUpdate::Cancel,
        AlertAction::EnableClosedNotif => RegistrationUpdate::CloseNotification(true),
        AlertAction::DisableClosedNotif => RegistrationUpdate::CloseNotification(false),
        AlertAction::Delete => RegistrationUpdate::Delete,
    }
}
