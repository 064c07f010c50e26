// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::db::BehaviorStore;
use crate::model_registry::ModelRegistry;
use crate::risk::types::BehaviourFeatures;
use crate::storage::ObjectStoreClient;

/// Shared state handed to every consumer task and the HTTP router.
pub struct ServiceState {
    pub config: Config,
    pub models: ModelRegistry,
    pub object_store: ObjectStoreClient,
    pub behavior_store: BehaviorStore,
    pub behavior_windows: BehaviorWindowMap,
    pub shutdown: CancellationToken,
}

impl ServiceState {
    pub fn new(
        config: Config,
        models: ModelRegistry,
        object_store: ObjectStoreClient,
        behavior_store: BehaviorStore,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            behavior_windows: BehaviorWindowMap::new(config.behavior_window(), config.behavior_window_capacity),
            config,
            models,
            object_store,
            behavior_store,
            shutdown,
        }
    }
}

/// One session's rolling behaviour-event history, bounded to `capacity`
/// entries and scored only over the trailing `window` duration. Events are
/// timestamped with the incoming message's own epoch-millisecond timestamp,
/// not receipt time, so out-of-order or replayed deliveries window correctly;
/// `last_seen` is tracked separately on the wall clock purely to drive the
/// idle-session sweep.
#[derive(Debug, Default)]
struct SessionHistory {
    events: std::collections::VecDeque<(String, i64)>,
    last_seen: Option<Instant>,
}

/// Per-session behaviour event windows, guarded by a single mutex. A
/// periodic sweep (see [`spawn_window_janitor`]) evicts idle sessions the
/// same way a connection pool reaps dead entries on a timer.
pub struct BehaviorWindowMap {
    window: Duration,
    capacity: usize,
    sessions: Mutex<HashMap<String, SessionHistory>>,
}

impl BehaviorWindowMap {
    pub fn new(window: Duration, capacity: usize) -> Self {
        Self { window, capacity, sessions: Mutex::new(HashMap::new()) }
    }

    /// Record one event for `session_id`, windowed against `timestamp_ms`
    /// (the event's own epoch-millisecond timestamp), and return the
    /// recomputed feature vector over the trailing window. `now` is the
    /// receipt-time wall clock, used only to keep the idle-session sweep
    /// accurate.
    pub async fn record(
        &self,
        session_id: &str,
        event_type: &str,
        timestamp_ms: i64,
        now: Instant,
    ) -> BehaviourFeatures {
        let mut sessions = self.sessions.lock().await;
        let history = sessions.entry(session_id.to_owned()).or_default();

        history.events.push_back((event_type.to_owned(), timestamp_ms));
        while history.events.len() > self.capacity {
            history.events.pop_front();
        }
        history.last_seen = Some(now);

        compute_features(&history.events, timestamp_ms, self.window)
    }

    /// Evict sessions whose last event is older than `ttl`. Returns the count evicted.
    pub async fn evict_stale(&self, ttl: Duration, now: Instant) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, history| {
            history.last_seen.map(|seen| now.duration_since(seen) < ttl).unwrap_or(false)
        });
        before - sessions.len()
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn compute_features(
    events: &std::collections::VecDeque<(String, i64)>,
    now_ms: i64,
    window: Duration,
) -> BehaviourFeatures {
    let cutoff = now_ms.saturating_sub(window.as_millis() as i64);
    let recent: Vec<&(String, i64)> = events.iter().filter(|(_, ts)| *ts >= cutoff).collect();

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for (event_type, _) in &recent {
        *counts.entry(event_type.as_str()).or_insert(0) += 1;
    }

    let window_minutes = window.as_secs_f64() / 60.0;
    let event_rate_per_min =
        if recent.is_empty() || window_minutes <= 0.0 { 0.0 } else { recent.len() as f64 / window_minutes };

    BehaviourFeatures {
        tab_switches: *counts.get("TAB_SWITCH").unwrap_or(&0),
        copy_paste_count: *counts.get("COPY_PASTE").unwrap_or(&0),
        context_menu_count: *counts.get("CONTEXT_MENU").unwrap_or(&0),
        fullscreen_exits: *counts.get("FULLSCREEN_EXIT").unwrap_or(&0),
        focus_loss_count: *counts.get("FOCUS_LOSS").unwrap_or(&0),
        event_rate_per_min,
    }
}

/// Spawn the periodic sweep that evicts behaviour-window entries idle
/// longer than four window-lengths.
pub fn spawn_window_janitor(state: Arc<ServiceState>) {
    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        let ttl = state.config.behavior_session_ttl();
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tick.tick() => {
                    let evicted = state.behavior_windows.evict_stale(ttl, Instant::now()).await;
                    if evicted > 0 {
                        tracing::debug!(evicted, "evicted stale behavior-window sessions");
                    }
                }
            }
        }
    });
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
