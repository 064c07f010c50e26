// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame consumer: decode → run the four vision analyzers → aggregate risk
//! → (maybe) snapshot → publish one result per violation.

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use serde::Deserialize;
use uuid::Uuid;

use crate::broker::consumer::ConsumerHandler;
use crate::broker::publisher::{OutboundResult, ResultPublisher};
use crate::risk::{score_frame, Severity, VisionResult};
use crate::state::ServiceState;
use crate::vision::analyze_frame;

/// JPEG quality used when re-encoding a HIGH/CRITICAL frame for the
/// snapshot bucket.
const SNAPSHOT_QUALITY: u8 = 85;

#[derive(Debug, Deserialize)]
struct FrameMessage {
    #[serde(rename = "sessionId")]
    session_id: String,
    #[serde(rename = "frameData")]
    frame_data: String,
    #[allow(dead_code)]
    #[serde(default)]
    timestamp: Option<i64>,
}

pub struct FrameConsumer {
    state: Arc<ServiceState>,
    publisher: ResultPublisher,
}

impl FrameConsumer {
    pub fn new(state: Arc<ServiceState>) -> Self {
        let publisher = ResultPublisher::new(
            state.config.broker_url.clone(),
            state.config.exchange_name.clone(),
            state.config.results_routing_key.clone(),
        );
        Self { state, publisher }
    }

    async fn upload_snapshot(&self, session_id: &str, rgb: &RgbImage) -> Option<String> {
        let mut buf = Vec::new();
        {
            let mut cursor = Cursor::new(&mut buf);
            let mut encoder = JpegEncoder::new_with_quality(&mut cursor, SNAPSHOT_QUALITY);
            if let Err(e) = encoder.encode_image(rgb) {
                tracing::warn!(session_id, err = %e, "snapshot re-encode failed, publishing without one");
                return None;
            }
        }
        let key = snapshot_key(session_id);
        self.state.object_store.upload_bytes(&self.state.config.bucket_snapshots, &key, buf, "image/jpeg").await
    }
}

/// Object key for a violation snapshot: `{sessionId}/{random-hex}.jpg`.
fn snapshot_key(session_id: &str) -> String {
    format!("{session_id}/{}.jpg", Uuid::new_v4().simple())
}

fn build_metadata(vision: &VisionResult) -> serde_json::Value {
    serde_json::json!({
        "faceCount": vision.face_count,
        "headYawDeg": vision.head_yaw,
        "headPitchDeg": vision.head_pitch,
        "lipRatio": vision.lip_ratio,
        "phoneConfidence": vision.phone_confidence,
        "notesConfidence": vision.notes_confidence,
    })
}

#[async_trait::async_trait]
impl ConsumerHandler for FrameConsumer {
    fn queue_name(&self) -> &str {
        &self.state.config.frame_queue
    }

    async fn handle(&self, body: &[u8]) -> anyhow::Result<()> {
        let msg: FrameMessage =
            serde_json::from_slice(body).map_err(|e| anyhow::anyhow!("malformed frame message: {e}"))?;

        let Ok(jpeg_bytes) = base64::engine::general_purpose::STANDARD.decode(&msg.frame_data) else {
            tracing::warn!(session_id = %msg.session_id, "frame payload is not valid base64, dropping");
            return Ok(());
        };

        let Ok(decoded) = image::load_from_memory_with_format(&jpeg_bytes, image::ImageFormat::Jpeg) else {
            tracing::warn!(session_id = %msg.session_id, "frame JPEG decode failed, dropping");
            return Ok(());
        };
        let rgb = decoded.to_rgb8();

        let vision = analyze_frame(&rgb, &self.state.models, &self.state.config);
        let result = score_frame(&vision, self.state.config.severity_thresholds());
        if result.violations.is_empty() {
            return Ok(());
        }

        let snapshot_path = if matches!(result.severity, Severity::High | Severity::Critical) {
            self.upload_snapshot(&msg.session_id, &rgb).await
        } else {
            None
        };

        let metadata = build_metadata(&vision);
        for violation in &result.violations {
            let outbound =
                OutboundResult::new(&msg.session_id, violation, result.risk_score, snapshot_path.clone(), metadata.clone());
            self.publisher.publish(&outbound).await;
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
