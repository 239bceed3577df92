//! Batch reconciler.
//!
//! Coordinates the single-action rules over a whole selection: no-effect
//! filtering decides between the optimistic and pessimistic code paths,
//! per-id requests within a wave fire in parallel, and a batch disable is a
//! two-phase commit (cancel wave, then a close-notification-clear wave gated
//! on the first wave's full success). Any failure in a wave routes the whole
//! batch to the error path; mutations that already landed server-side are
//! not rolled back.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use alertsync_client::api::{RegistrationUpdate, SharedApi};
use alertsync_core::action::{apply_to_all, AlertAction};
use alertsync_core::registration::{Registration, RegistrationId};

use crate::error::{BatchItemFailure, EngineError};
use crate::events::SyncEvent;
use crate::reconcile::{update_for, Dispatched, Reconciler};

impl Reconciler {
    /// Dispatch one action across a set of selected registrations.
    pub async fn dispatch_batch(
        &self,
        ids: &[RegistrationId],
        action: AlertAction,
    ) -> Result<Dispatched, EngineError> {
        let records = self.cache.read().await;
        let by_id: HashMap<RegistrationId, &Registration> =
            records.iter().map(|r| (r.id, r)).collect();

        // No-effect filtering: which of the selected ids would this action
        // actually change? The full id list is still dispatched; the subset
        // only chooses between the optimistic and pessimistic paths below.
        let any_effective = ids
            .iter()
            .any(|id| by_id.get(id).is_some_and(|r| action.has_effect_on(r)));

        tracing::debug!(
            ?action,
            selected = ids.len(),
            any_effective,
            "Dispatching batch"
        );

        match action {
            AlertAction::Enable if any_effective => {
                self.batch_enable_optimistic(ids, records).await
            }
            AlertAction::Disable => self.batch_disable_two_phase(ids).await,
            // Close-notif toggles, deletes, and an all-already-enabled
            // enable: parallel pessimistic wave with per-id validation.
            _ => self.batch_pessimistic_wave(ids, action, &by_id).await,
        }
    }

    /// Batch enable: one combined optimistic mutation covering every
    /// selected id, then one resubscribe request per id in parallel.
    async fn batch_enable_optimistic(
        &self,
        ids: &[RegistrationId],
        records: Vec<Registration>,
    ) -> Result<Dispatched, EngineError> {
        let action = AlertAction::Enable;
        let mut optimistic = records;
        apply_to_all(&mut optimistic, ids, action);

        let api = Arc::clone(&self.api);
        let bus = Arc::clone(&self.bus);
        let all_ids = ids.to_vec();
        let confirmation = async move {
            let failures = run_wave(&api, &all_ids, RegistrationUpdate::Resubscribe).await;
            bus.publish(SyncEvent::BatchSettled {
                action,
                attempted: all_ids.len(),
                failed: failures.len(),
            });
            if failures.is_empty() {
                Ok(())
            } else {
                Err(EngineError::PartialFailure {
                    attempted: all_ids.len(),
                    failures,
                })
            }
        };

        let handle = self.cache.mutate(optimistic, confirmation).await;
        Ok(Dispatched::Optimistic(handle))
    }

    /// Batch disable: a parallel cancel wave, then, only once every cancel
    /// succeeded, a parallel wave forcing `close_notification = false` on
    /// the same ids. Disabling an alert clears its close-notification
    /// preference server-side as well as client-side.
    async fn batch_disable_two_phase(
        &self,
        ids: &[RegistrationId],
    ) -> Result<Dispatched, EngineError> {
        let action = AlertAction::Disable;

        let failures = run_wave(&self.api, ids, RegistrationUpdate::Cancel).await;
        if !failures.is_empty() {
            tracing::warn!(
                failed = failures.len(),
                "Cancel wave failed, skipping close-notification clear"
            );
            return self.settle_batch(action, ids.len(), failures).await;
        }

        let failures = run_wave(&self.api, ids, RegistrationUpdate::CloseNotification(false)).await;
        self.settle_batch(action, ids.len(), failures).await
    }

    /// Parallel pessimistic wave: validate each id against its own
    /// pre-action record, fire requests for the valid ones, aggregate.
    async fn batch_pessimistic_wave(
        &self,
        ids: &[RegistrationId],
        action: AlertAction,
        by_id: &HashMap<RegistrationId, &Registration>,
    ) -> Result<Dispatched, EngineError> {
        let mut failures = Vec::new();
        let mut to_send = Vec::new();

        for &id in ids {
            match by_id.get(&id) {
                None => failures.push(BatchItemFailure {
                    id,
                    reason: alertsync_core::error::CoreError::NotFound(id).to_string(),
                }),
                Some(record) => match action.validate(record) {
                    Ok(()) => to_send.push(id),
                    Err(e) => failures.push(BatchItemFailure {
                        id,
                        reason: e.to_string(),
                    }),
                },
            }
        }

        failures.extend(run_wave(&self.api, &to_send, update_for(action)).await);
        self.settle_batch(action, ids.len(), failures).await
    }

    /// Common tail: refresh + success event when the wave was clean,
    /// error event + aggregate error otherwise.
    async fn settle_batch(
        &self,
        action: AlertAction,
        attempted: usize,
        failures: Vec<BatchItemFailure>,
    ) -> Result<Dispatched, EngineError> {
        self.bus.publish(SyncEvent::BatchSettled {
            action,
            attempted,
            failed: failures.len(),
        });

        if failures.is_empty() {
            if let Err(e) = self.cache.invalidate().await {
                tracing::warn!(error = %e, "Post-batch refresh failed");
            }
            Ok(Dispatched::Confirmed)
        } else {
            Err(EngineError::PartialFailure {
                attempted,
                failures,
            })
        }
    }
}

/// Fire `update` for every id in parallel and collect the failures.
async fn run_wave(
    api: &SharedApi,
    ids: &[RegistrationId],
    update: RegistrationUpdate,
) -> Vec<BatchItemFailure> {
    let results = join_all(ids.iter().map(|&id| {
        let api = Arc::clone(api);
        async move { (id, api.update(id, update).await) }
    }))
    .await;

    results
        .into_iter()
        .filter_map(|(id, result)| {
            result.err().map(|e| BatchItemFailure {
                id,
                reason: e.to_string(),
            })
        })
        .collect()
}
