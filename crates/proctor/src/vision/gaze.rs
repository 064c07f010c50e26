// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Head-pose / gaze estimation, backed by an optional face-mesh model.
//!
//! Contract: the model returns `[yaw_degrees, pitch_degrees, eye_aspect_ratio]`.
//! Gaze is "off screen" once either angle exceeds its configured threshold;
//! eyes are "closed" once the aspect ratio drops below a fixed 0.20 — the
//! same EAR cutoff the original module used.

use image::RgbImage;

use crate::config::Config;
use crate::model_registry::ModelSlot;
use crate::vision::face::normalize_rgb;

const EAR_CLOSED_THRESHOLD: f32 = 0.20;

pub struct GazeResult {
    pub head_yaw: f64,
    pub head_pitch: f64,
    pub gaze_off_screen: bool,
    pub eyes_closed: bool,
}

pub fn analyze(frame: &RgbImage, face_mesh: &ModelSlot, config: &Config) -> GazeResult {
    let ModelSlot::Ready(session) = face_mesh else {
        return default_result();
    };

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let input = normalize_rgb(frame);

    match session.run(&[1, h, w, 3], &input) {
        Ok(out) if out.len() >= 3 => {
            let (yaw, pitch, ear) = (out[0] as f64, out[1] as f64, out[2]);
            GazeResult {
                head_yaw: yaw,
                head_pitch: pitch,
                gaze_off_screen: yaw.abs() > config.gaze_yaw_threshold || pitch.abs() > config.gaze_pitch_threshold,
                eyes_closed: ear < EAR_CLOSED_THRESHOLD,
            }
        }
        Ok(_) => default_result(),
        Err(e) => {
            tracing::warn!(err = %e, "gaze tracker inference failed");
            default_result()
        }
    }
}

fn default_result() -> GazeResult {
    GazeResult { head_yaw: 0.0, head_pitch: 0.0, gaze_off_screen: false, eyes_closed: false }
}

#[cfg(test)]
#[path = "gaze_tests.rs"]
mod tests;
