//! Integration tests for the revalidating registration cache: sticky reads,
//! failure-preserving refresh, optimistic mutation, and convergence.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use alertsync_engine::EngineError;

use common::{registration, setup};

// ---------------------------------------------------------------------------
// Sticky reads
// ---------------------------------------------------------------------------

/// A failed refresh surfaces an error but keeps serving the last good list.
#[tokio::test]
async fn failed_refresh_preserves_last_good_list() {
    let (api, cache, _reconciler, _bus) = setup(vec![registration(1, true, false)]).await;
    assert_eq!(cache.read().await.len(), 1);

    api.fail_list(true);
    let err = cache.invalidate().await.unwrap_err();
    assert_matches!(err, EngineError::Api(_));

    // The cache still answers with the previous list.
    let records = cache.read().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 1);
}

/// A successful refresh replaces the list with current server truth.
#[tokio::test]
async fn refresh_picks_up_server_changes() {
    let (api, cache, _reconciler, _bus) = setup(vec![registration(1, true, false)]).await;

    api.set_server_records(vec![registration(1, true, false), registration(2, false, false)]);
    cache.invalidate().await.expect("refresh should succeed");

    assert_eq!(cache.read().await.len(), 2);
}

// ---------------------------------------------------------------------------
// Optimistic mutation
// ---------------------------------------------------------------------------

/// The optimistic list is readable before the confirmation settles, and the
/// settle always triggers a refresh back to server truth.
#[tokio::test]
async fn mutate_serves_optimistic_value_then_reconciles() {
    let (api, cache, _reconciler, _bus) = setup(vec![registration(1, false, false)]).await;

    // Confirmation held open until the test releases it.
    let gate = Arc::new(tokio::sync::Semaphore::new(0));
    let confirmation_gate = Arc::clone(&gate);

    let mut optimistic = cache.read().await;
    optimistic[0].is_active = true;

    let handle = cache
        .mutate(optimistic, async move {
            let _permit = confirmation_gate.acquire().await.expect("gate closed");
            Ok(())
        })
        .await;

    // Optimistic value visible immediately.
    assert!(cache.read().await[0].is_active);
    let lists_before_settle = api.list_count();

    gate.add_permits(1);
    handle.await.expect("task").expect("confirmation");

    // Settlement refreshed from the server, whose record is still inactive.
    assert!(api.list_count() > lists_before_settle);
    assert!(!cache.read().await[0].is_active);
}

/// A failed confirmation still reconciles to server truth via refresh.
#[tokio::test]
async fn mutate_reconciles_even_when_confirmation_fails() {
    let (api, cache, _reconciler, _bus) = setup(vec![registration(1, false, false)]).await;

    let mut optimistic = cache.read().await;
    optimistic[0].is_active = true;

    let handle = cache
        .mutate(optimistic, async {
            Err(EngineError::Api(alertsync_client::api::ApiError::Api {
                status: 400,
                body: "rejected".into(),
            }))
        })
        .await;

    let result = handle.await.expect("task");
    assert_matches!(result, Err(EngineError::Api(_)));

    // The optimistic flip was superseded by the re-fetched server list.
    assert!(!cache.read().await[0].is_active);
    assert!(!api.server_records()[0].is_active);
}

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

/// Repeated invalidation with no further mutations is a fixed point.
#[tokio::test]
async fn repeated_invalidate_converges() {
    let (_api, cache, _reconciler, _bus) =
        setup(vec![registration(1, true, true), registration(2, false, false)]).await;

    let first = cache.read().await;
    for _ in 0..3 {
        cache.invalidate().await.expect("refresh should succeed");
        assert_eq!(cache.read().await, first);
    }
}
