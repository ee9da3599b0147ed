//! End-to-end scenarios for the playback session actor.

use std::time::Duration;

use super::SessionError;
use super::commands::SessionPhase;
use super::test_mocks::{
    MockOverrideStore, series_only_catalog, small_catalog, spawn_harness,
};
use crate::health::{HealthStatus, HealthUpdate};
use crate::media::ContentIdentity;
use crate::sources::{OverrideLinks, ProviderCatalog};

const LONG_STALL: Duration = Duration::from_secs(30);

#[tokio::test]
async fn first_candidate_active_immediately_after_build() {
    let harness = spawn_harness(
        ProviderCatalog::builtin(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    let state = harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();
    assert_eq!(state.phase, SessionPhase::Loading);
    assert_eq!(state.active_index, 0);

    let active = harness.handle.active_source().await.unwrap().unwrap();
    assert_eq!(active.provider_id, "vidsrc");
    assert_eq!(active.url, "https://vidsrc.to/embed/movie/550?ds_lang=en");

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn override_link_used_verbatim() {
    let mut links = OverrideLinks::new();
    links.insert("vidsrc".to_string(), "https://custom/550".to_string());
    let overrides = MockOverrideStore::new().with_links(ContentIdentity::movie(550), links);

    let harness = spawn_harness(ProviderCatalog::builtin(), overrides, LONG_STALL, false);
    let state = harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    let vidsrc = state
        .candidates
        .iter()
        .find(|c| c.provider_id == "vidsrc")
        .unwrap();
    assert_eq!(vidsrc.url, "https://custom/550");

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn override_fetch_failure_still_builds_candidates() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::failing(),
        LONG_STALL,
        false,
    );

    let state = harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();
    assert_eq!(state.candidates.len(), 3);
    assert_eq!(state.phase, SessionPhase::Loading);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn stall_timeout_advances_exactly_once_per_window() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        Duration::from_millis(200),
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    // One timeout window plus slack: exactly one auto-advance.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let state = harness.handle.current_state().await.unwrap();
    assert_eq!(state.active_index, 1);
    assert_eq!(state.phase, SessionPhase::Loading);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn full_cycle_without_success_exhausts_and_stays_put() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        Duration::from_millis(60),
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    // 3 candidates * 60ms: exhausted well before 500ms.
    tokio::time::sleep(Duration::from_millis(500)).await;
    let state = harness.handle.current_state().await.unwrap();
    assert_eq!(state.phase, SessionPhase::Exhausted);

    // No further auto-advance without explicit user action.
    let index = state.active_index;
    tokio::time::sleep(Duration::from_millis(200)).await;
    let later = harness.handle.current_state().await.unwrap();
    assert_eq!(later.phase, SessionPhase::Exhausted);
    assert_eq!(later.active_index, index);

    // Manual rotate restarts the cycle.
    let restarted = harness.handle.next_source().await.unwrap();
    assert_eq!(restarted.phase, SessionPhase::Loading);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn load_success_cancels_stall_timer() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        Duration::from_millis(100),
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();
    harness.handle.load_succeeded().await.unwrap();

    // Well past the timeout: the cancelled timer must not fire.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let state = harness.handle.current_state().await.unwrap();
    assert_eq!(state.phase, SessionPhase::Ready);
    assert_eq!(state.active_index, 0);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn manual_rotate_wraps_from_last_candidate() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();
    harness.handle.select_source(2).await.unwrap();

    let state = harness.handle.next_source().await.unwrap();
    assert_eq!(state.active_index, 0);
    assert_eq!(state.phase, SessionPhase::Loading);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn select_out_of_range_is_rejected() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    let result = harness.handle.select_source(9).await;
    assert_eq!(
        result.unwrap_err(),
        SessionError::IndexOutOfRange { index: 9, len: 3 }
    );

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_select_keeps_stall_timer_running() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        Duration::from_millis(200),
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    let result = harness.handle.select_source(9).await;
    assert_eq!(
        result.unwrap_err(),
        SessionError::IndexOutOfRange { index: 9, len: 3 }
    );

    // The rejection must not disturb the armed timer: the stalled first
    // candidate is still auto-advanced past.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let state = harness.handle.current_state().await.unwrap();
    assert_eq!(state.active_index, 1);
    assert_eq!(state.phase, SessionPhase::Loading);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn report_broken_records_and_advances_exactly_once() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();
    harness.handle.select_source(1).await.unwrap();

    let state = harness.handle.report_broken().await.unwrap();
    assert_eq!(state.active_index, 2);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let reports = harness.sink.recorded();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].provider_id, "beta");
    assert_eq!(reports[0].identity, ContentIdentity::movie(550));

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn report_write_failure_never_blocks_rotation() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        true,
    );

    harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    let state = harness.handle.report_broken().await.unwrap();
    assert_eq!(state.active_index, 1);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.sink.recorded().len(), 1);

    // Exactly one advance happened despite the failed write.
    let current = harness.handle.current_state().await.unwrap();
    assert_eq!(current.active_index, 1);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn stale_override_fetch_cannot_clobber_newer_identity() {
    let movie = ContentIdentity::movie(550);
    let series = ContentIdentity::episode(1399, 1, 1);

    let mut stale_links = OverrideLinks::new();
    stale_links.insert("alpha".to_string(), "https://stale/550".to_string());
    let overrides = MockOverrideStore::new()
        .with_links(movie.clone(), stale_links)
        .with_delay(movie.clone(), Duration::from_millis(300));

    let harness = spawn_harness(small_catalog(), overrides, LONG_STALL, false);

    // Start the slow movie load, then supersede it with the series.
    let slow_handle = harness.handle.clone();
    let slow_movie = tokio::spawn(async move { slow_handle.load_identity(movie).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = harness.handle.load_identity(series).await.unwrap();
    assert!(state.candidates.iter().all(|c| c.url.contains("/tv/1399/1/1")));

    assert_eq!(
        slow_movie.await.unwrap().unwrap_err(),
        SessionError::Superseded
    );

    // Let the stale fetch resolve; it must be discarded.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let current = harness.handle.current_state().await.unwrap();
    assert!(current.candidates.iter().all(|c| !c.url.contains("stale")));
    assert!(current.candidates.iter().all(|c| c.url.contains("/tv/1399/1/1")));

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn health_updates_annotate_without_reordering() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    let before = harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();

    harness.health.apply(HealthUpdate {
        provider_id: "beta".to_string(),
        status: HealthStatus::Offline,
        latency_ms: None,
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let after = harness.handle.current_state().await.unwrap();
    assert_eq!(after.candidates.len(), before.candidates.len());
    assert_eq!(after.active_index, before.active_index);
    let order: Vec<_> = after.candidates.iter().map(|c| c.provider_id.clone()).collect();
    assert_eq!(order, vec!["alpha", "beta", "gamma"]);
    assert_eq!(after.candidates[1].status, HealthStatus::Offline);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn unaddressable_title_is_exhausted_with_no_viable_source() {
    let harness = spawn_harness(
        series_only_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    let state = harness
        .handle
        .load_identity(ContentIdentity::movie(550))
        .await
        .unwrap();
    assert_eq!(state.phase, SessionPhase::Exhausted);
    assert!(state.candidates.is_empty());
    assert!(harness.handle.active_source().await.unwrap().is_none());

    let result = harness.handle.next_source().await;
    assert_eq!(result.unwrap_err(), SessionError::NoViableSource);

    harness.handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_the_actor() {
    let harness = spawn_harness(
        small_catalog(),
        MockOverrideStore::new(),
        LONG_STALL,
        false,
    );

    assert!(harness.handle.is_running());
    harness.handle.shutdown().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let result = harness.handle.current_state().await;
    assert!(result.is_err());
}
