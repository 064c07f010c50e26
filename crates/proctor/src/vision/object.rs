// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object detection (phone / notes / extra person), backed by an optional
//! object-detection model.
//!
//! Contract: the model returns per-detection triples
//! `[class_id, confidence, ...]` flattened, where class ids follow the
//! original COCO convention (`0` person, `67` cell phone, `73` book).

use image::RgbImage;

use crate::config::Config;
use crate::model_registry::ModelSlot;
use crate::vision::face::normalize_rgb;

const PERSON_CLASS: f32 = 0.0;
const PHONE_CLASS: f32 = 67.0;
const BOOK_CLASS: f32 = 73.0;

pub struct ObjectResult {
    pub phone_detected: bool,
    pub phone_confidence: f64,
    pub notes_detected: bool,
    pub notes_confidence: f64,
    pub extra_person: bool,
}

pub fn analyze(frame: &RgbImage, object_detector: &ModelSlot, config: &Config) -> ObjectResult {
    let ModelSlot::Ready(session) = object_detector else {
        return default_result();
    };

    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let input = normalize_rgb(frame);

    match session.run(&[1, h, w, 3], &input) {
        Ok(detections) => summarize(&detections, config),
        Err(e) => {
            tracing::warn!(err = %e, "object detector inference failed");
            default_result()
        }
    }
}

fn summarize(detections: &[f32], config: &Config) -> ObjectResult {
    let mut phone_conf: f64 = 0.0;
    let mut notes_conf: f64 = 0.0;
    let mut person_count = 0u32;

    for pair in detections.chunks_exact(2) {
        let (class_id, confidence) = (pair[0], pair[1] as f64);
        if class_id == PHONE_CLASS {
            phone_conf = phone_conf.max(confidence);
        } else if class_id == BOOK_CLASS {
            notes_conf = notes_conf.max(confidence);
        } else if class_id == PERSON_CLASS {
            person_count += 1;
        }
    }

    ObjectResult {
        phone_detected: phone_conf >= config.phone_confidence_threshold,
        phone_confidence: phone_conf,
        notes_detected: notes_conf >= config.notes_confidence_threshold,
        notes_confidence: notes_conf,
        extra_person: person_count >= 2,
    }
}

fn default_result() -> ObjectResult {
    ObjectResult {
        phone_detected: false,
        phone_confidence: 0.0,
        notes_detected: false,
        notes_confidence: 0.0,
        extra_person: false,
    }
}

#[cfg(test)]
#[path = "object_tests.rs"]
mod tests;
