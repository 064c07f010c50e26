// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Face presence/count detection, backed by an optional face-mesh model.
//!
//! Contract: the model takes one RGB frame (flattened, row-major,
//! normalised to `[0, 1]`) and returns a flat vector of
//! `[confidence_0, confidence_1, ...]` detection scores, one per detected
//! face region. Detections at or above `face_confidence_threshold` count.

use image::RgbImage;

use crate::config::Config;
use crate::model_registry::ModelSlot;

pub struct FaceResult {
    pub face_present: bool,
    pub face_count: u32,
}

pub fn analyze(frame: &RgbImage, face_mesh: &ModelSlot, config: &Config) -> FaceResult {
    let ModelSlot::Ready(session) = face_mesh else {
        return default_result();
    };

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let input = normalize_rgb(frame);

    match session.run(&[1, h, w, 3], &input) {
        Ok(scores) => {
            let face_count =
                scores.iter().filter(|&&s| s as f64 >= config.face_confidence_threshold).count() as u32;
            FaceResult { face_present: face_count > 0, face_count }
        }
        Err(e) => {
            tracing::warn!(err = %e, "face detector inference failed");
            default_result()
        }
    }
}

/// Assume present to avoid false positives when the model is unavailable,
/// matching the original module's `_default_result`.
fn default_result() -> FaceResult {
    FaceResult { face_present: true, face_count: 1 }
}

/// Produce a face embedding for identity verification, backed by the
/// (separately loaded) face-encoder model slot. Returns `None` when the
/// model isn't loaded or inference finds no face — the caller (the
/// `/ai/verify-identity` handler) turns that into a 422/503, never a panic.
pub fn encode(frame: &RgbImage, face_encoder: &ModelSlot) -> Option<Vec<f32>> {
    let ModelSlot::Ready(session) = face_encoder else {
        return None;
    };

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let input = normalize_rgb(frame);

    match session.run(&[1, h, w, 3], &input) {
        Ok(embedding) if !embedding.is_empty() => Some(embedding),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(err = %e, "face encoder inference failed");
            None
        }
    }
}

pub(super) fn normalize_rgb(frame: &RgbImage) -> Vec<f32> {
    frame.as_raw().iter().map(|&b| b as f32 / 255.0).collect()
}

#[cfg(test)]
#[path = "face_tests.rs"]
mod tests;
