// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vision analyzers that turn a decoded frame into the evidence
//! [`crate::risk::score_frame`] consumes. Each analyzer degrades to a safe
//! default when its backing model slot is unavailable, exactly as the
//! original per-module `analyze()` functions degrade when their optional
//! dependency (mediapipe/YOLO) failed to import.

pub mod face;
pub mod gaze;
pub mod mouth;
pub mod object;

use image::RgbImage;

use crate::config::Config;
use crate::model_registry::ModelRegistry;
use crate::risk::VisionResult;

/// Run all four vision analyzers over one decoded frame and assemble the
/// combined evidence `score_frame` needs.
pub fn analyze_frame(frame: &RgbImage, models: &ModelRegistry, config: &Config) -> VisionResult {
    let face = face::analyze(frame, &models.face_mesh, config);
    let gaze = gaze::analyze(frame, &models.face_mesh, config);
    let mouth = mouth::analyze(frame, &models.face_mesh, config);
    let object = object::analyze(frame, &models.object_detector, config);

    VisionResult {
        face_present: face.face_present,
        face_count: face.face_count,
        gaze_off_screen: gaze.gaze_off_screen,
        eyes_closed: gaze.eyes_closed,
        mouth_open: mouth.mouth_open,
        phone_detected: object.phone_detected,
        notes_detected: object.notes_detected,
        extra_person: object.extra_person,
        phone_confidence: object.phone_confidence,
        notes_confidence: object.notes_confidence,
        head_yaw: gaze.head_yaw,
        head_pitch: gaze.head_pitch,
        lip_ratio: mouth.lip_ratio,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
