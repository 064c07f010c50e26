// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mouth-open detection, backed by an optional face-mesh model.
//!
//! Contract: the model returns `[lip_ratio]`, the vertical lip-gap
//! normalised by mouth-corner distance. Mirrors the original module's
//! `lip_ratio` field.

use image::RgbImage;

use crate::config::Config;
use crate::model_registry::ModelSlot;
use crate::vision::face::normalize_rgb;

pub struct MouthResult {
    pub mouth_open: bool,
    pub lip_ratio: f64,
}

pub fn analyze(frame: &RgbImage, face_mesh: &ModelSlot, config: &Config) -> MouthResult {
    let ModelSlot::Ready(session) = face_mesh else {
        return default_result();
    };

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let input = normalize_rgb(frame);

    match session.run(&[1, h, w, 3], &input) {
        Ok(out) if !out.is_empty() => {
            let lip_ratio = out[0] as f64;
            MouthResult { mouth_open: lip_ratio > config.lip_distance_threshold, lip_ratio }
        }
        Ok(_) => default_result(),
        Err(e) => {
            tracing::warn!(err = %e, "mouth monitor inference failed");
            default_result()
        }
    }
}

fn default_result() -> MouthResult {
    MouthResult { mouth_open: false, lip_ratio: 0.0 }
}

#[cfg(test)]
#[path = "mouth_tests.rs"]
mod tests;
