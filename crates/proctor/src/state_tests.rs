use super::*;

const BASE_MS: i64 = 1_700_000_000_000;

#[tokio::test]
async fn record_counts_events_by_type_within_the_window() {
    let windows = BehaviorWindowMap::new(Duration::from_secs(300), 50);
    let now = Instant::now();
    windows.record("s1", "TAB_SWITCH", BASE_MS, now).await;
    windows.record("s1", "TAB_SWITCH", BASE_MS + 1_000, now).await;
    let features = windows.record("s1", "COPY_PASTE", BASE_MS + 2_000, now).await;
    assert_eq!(features.tab_switches, 2);
    assert_eq!(features.copy_paste_count, 1);
}

#[tokio::test]
async fn record_evicts_oldest_event_once_capacity_is_exceeded() {
    let windows = BehaviorWindowMap::new(Duration::from_secs(300), 2);
    let now = Instant::now();
    windows.record("s1", "TAB_SWITCH", BASE_MS, now).await;
    windows.record("s1", "TAB_SWITCH", BASE_MS + 1_000, now).await;
    let features = windows.record("s1", "TAB_SWITCH", BASE_MS + 2_000, now).await;
    assert_eq!(features.tab_switches, 2);
}

#[tokio::test]
async fn events_outside_the_window_do_not_contribute_to_features() {
    let windows = BehaviorWindowMap::new(Duration::from_secs(60), 50);
    let now = Instant::now();
    windows.record("s1", "TAB_SWITCH", BASE_MS, now).await;
    let later_ms = BASE_MS + 120_000;
    let features = windows.record("s1", "COPY_PASTE", later_ms, now).await;
    assert_eq!(features.tab_switches, 0);
    assert_eq!(features.copy_paste_count, 1);
}

#[tokio::test]
async fn out_of_order_timestamps_still_window_relative_to_the_latest_event() {
    // A replayed/late-arriving message carries an old timestamp; it must
    // window against its own timestamp, not receipt order.
    let windows = BehaviorWindowMap::new(Duration::from_secs(60), 50);
    let now = Instant::now();
    windows.record("s1", "TAB_SWITCH", BASE_MS + 200_000, now).await;
    let features = windows.record("s1", "COPY_PASTE", BASE_MS, now).await;
    assert_eq!(features.tab_switches, 0);
    assert_eq!(features.copy_paste_count, 1);
}

#[tokio::test]
async fn evict_stale_removes_sessions_idle_past_the_ttl_and_keeps_fresh_ones() {
    let windows = BehaviorWindowMap::new(Duration::from_secs(300), 50);
    let now = Instant::now();
    windows.record("stale", "TAB_SWITCH", BASE_MS, now).await;
    windows.record("fresh", "TAB_SWITCH", BASE_MS, now).await;

    let later = now + Duration::from_secs(10);
    windows.record("fresh", "TAB_SWITCH", BASE_MS + 10_000, later).await;

    let evicted = windows.evict_stale(Duration::from_secs(5), later).await;
    assert_eq!(evicted, 1);
    assert_eq!(windows.session_count().await, 1);
}

#[tokio::test]
async fn evict_stale_is_a_noop_when_nothing_has_expired() {
    let windows = BehaviorWindowMap::new(Duration::from_secs(300), 50);
    let now = Instant::now();
    windows.record("s1", "TAB_SWITCH", BASE_MS, now).await;
    let evicted = windows.evict_stale(Duration::from_secs(300), now).await;
    assert_eq!(evicted, 0);
    assert_eq!(windows.session_count().await, 1);
}
