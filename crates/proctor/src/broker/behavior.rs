// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavior consumer: persist the raw event, update the session's rolling
//! window, score it, and publish when the result clears the emission
//! threshold.

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use crate::broker::consumer::ConsumerHandler;
use crate::broker::publisher::{OutboundResult, ResultPublisher};
use crate::model_registry::{ModelRegistry, ModelSlot};
use crate::risk::{rule_based_behaviour_risk, score_behaviour, BehaviourFeatures};
use crate::state::ServiceState;

#[derive(Debug, Deserialize)]
struct BehaviorMessage {
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    timestamp: Option<i64>,
    /// Every other field of the inbound message, passed through verbatim
    /// into the persisted row's `metadata_json`.
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

pub struct BehaviorConsumer {
    state: Arc<ServiceState>,
    publisher: ResultPublisher,
}

impl BehaviorConsumer {
    pub fn new(state: Arc<ServiceState>) -> Self {
        let publisher = ResultPublisher::new(
            state.config.broker_url.clone(),
            state.config.exchange_name.clone(),
            state.config.results_routing_key.clone(),
        );
        Self { state, publisher }
    }
}

/// The behaviour classifier's prediction when loaded, falling back to the
/// rule-based score on any load/inference failure.
fn classify_or_fallback(features: &BehaviourFeatures, models: &ModelRegistry) -> f64 {
    if let ModelSlot::Ready(session) = &models.behavior_classifier {
        let input = [
            features.tab_switches as f32,
            features.copy_paste_count as f32,
            features.context_menu_count as f32,
            features.fullscreen_exits as f32,
            features.focus_loss_count as f32,
            features.event_rate_per_min as f32,
        ];
        match session.run(&[1, input.len()], &input) {
            Ok(out) if out.len() >= 2 => return out[1] as f64,
            Ok(out) if out.len() == 1 => return out[0] as f64,
            Ok(_) => {
                tracing::warn!("behavior classifier returned an empty tensor, using rule fallback");
            }
            Err(e) => {
                tracing::warn!(err = %e, "behavior classifier inference failed, using rule fallback");
            }
        }
    }
    rule_based_behaviour_risk(features)
}

fn build_metadata(event_type: &str, features: &BehaviourFeatures) -> serde_json::Value {
    serde_json::json!({
        "eventType": event_type,
        "tabSwitches": features.tab_switches,
        "copyPasteCount": features.copy_paste_count,
        "contextMenuCount": features.context_menu_count,
        "fullscreenExits": features.fullscreen_exits,
        "focusLossCount": features.focus_loss_count,
        "eventRatePerMin": features.event_rate_per_min,
    })
}

#[async_trait::async_trait]
impl ConsumerHandler for BehaviorConsumer {
    fn queue_name(&self) -> &str {
        &self.state.config.behavior_queue
    }

    async fn handle(&self, body: &[u8]) -> anyhow::Result<()> {
        let msg: BehaviorMessage =
            serde_json::from_slice(body).map_err(|e| anyhow::anyhow!("malformed behavior message: {e}"))?;

        let timestamp_ms = msg.timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        let metadata =
            if msg.extra.is_empty() { None } else { Some(serde_json::Value::Object(msg.extra.clone())) };
        self.state
            .behavior_store
            .append_event(&msg.session_id, &msg.event_type, timestamp_ms, metadata)
            .await;

        let features = self
            .state
            .behavior_windows
            .record(&msg.session_id, &msg.event_type, timestamp_ms, Instant::now())
            .await;
        let risk = classify_or_fallback(&features, &self.state.models);
        let result = score_behaviour(&features, risk, self.state.config.severity_thresholds());

        if result.risk_score < 0.30 && result.violations.is_empty() {
            return Ok(());
        }

        let metadata_bag = build_metadata(&msg.event_type, &features);
        for violation in &result.violations {
            let outbound =
                OutboundResult::new(&msg.session_id, violation, result.risk_score, None, metadata_bag.clone());
            self.publisher.publish(&outbound).await;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "behavior_tests.rs"]
mod tests;
