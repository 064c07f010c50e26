// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audio consumer: run VAD on the inbound clip and publish a
//! `SUSPICIOUS_AUDIO` violation when speech is detected above threshold.

use std::sync::Arc;

use serde::Deserialize;

use crate::audio;
use crate::broker::consumer::ConsumerHandler;
use crate::broker::publisher::{OutboundResult, ResultPublisher};
use crate::risk::{AudioResult, Severity, Violation};
use crate::state::ServiceState;

#[derive(Debug, Deserialize)]
struct AudioMessage {
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(rename = "audioData")]
    audio_data: String,
    #[allow(dead_code)]
    #[serde(default)]
    timestamp: Option<i64>,
}

pub struct AudioConsumer {
    state: Arc<ServiceState>,
    publisher: ResultPublisher,
}

impl AudioConsumer {
    pub fn new(state: Arc<ServiceState>) -> Self {
        let publisher = ResultPublisher::new(
            state.config.broker_url.clone(),
            state.config.exchange_name.clone(),
            state.config.results_routing_key.clone(),
        );
        Self { state, publisher }
    }
}

fn build_metadata(audio: &AudioResult) -> serde_json::Value {
    serde_json::json!({
        "speechRatio": audio.speech_ratio,
        "speechDurationMs": audio.speech_duration_ms,
        "totalDurationMs": audio.total_duration_ms,
    })
}

fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}

/// Wire-contract severity for a detected speech ratio. Deliberately a fixed
/// three-tier cut, not the configurable `SeverityThresholds` used elsewhere —
/// the audio consumer's output contract is pinned independent of the global
/// high-risk/critical knobs.
fn severity_for_ratio(ratio: f64) -> Severity {
    if ratio > 0.70 {
        Severity::High
    } else if ratio > 0.50 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[async_trait::async_trait]
impl ConsumerHandler for AudioConsumer {
    fn queue_name(&self) -> &str {
        &self.state.config.audio_queue
    }

    async fn handle(&self, body: &[u8]) -> anyhow::Result<()> {
        let msg: AudioMessage =
            serde_json::from_slice(body).map_err(|e| anyhow::anyhow!("malformed audio message: {e}"))?;

        let vad = audio::analyze(&msg.audio_data, self.state.config.speech_ratio_threshold);
        if !vad.speech_detected {
            return Ok(());
        }

        let risk_score = round3(vad.speech_ratio * 0.6);
        let violation = Violation {
            event_type: "SUSPICIOUS_AUDIO",
            severity: severity_for_ratio(vad.speech_ratio),
            confidence: vad.speech_ratio,
            description: format!(
                "Speech detected ({:.1}% of audio chunk, {:.0} ms).",
                vad.speech_ratio * 100.0,
                vad.speech_duration_ms
            ),
        };
        let metadata = build_metadata(&vad);
        let outbound = OutboundResult::new(&msg.session_id, &violation, risk_score, None, metadata);
        self.publisher.publish(&outbound).await;

        Ok(())
    }
}

#[cfg(test)]
#[path = "audio_tests.rs"]
mod tests;
