// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Aggregated vision-module outputs for one camera frame.
///
/// `head_yaw`/`head_pitch`/`lip_ratio` are carried through purely as
/// descriptive metadata for the outbound result's metadata bag — they
/// play no role in [`crate::risk::score_frame`]'s scoring.
#[derive(Debug, Clone, Default)]
pub struct VisionResult {
    pub face_present: bool,
    pub face_count: u32,
    pub gaze_off_screen: bool,
    pub eyes_closed: bool,
    pub mouth_open: bool,
    pub phone_detected: bool,
    pub notes_detected: bool,
    pub extra_person: bool,
    pub phone_confidence: f64,
    pub notes_confidence: f64,
    pub head_yaw: f64,
    pub head_pitch: f64,
    pub lip_ratio: f64,
}

/// Voice-activity-detection result for one audio chunk.
#[derive(Debug, Clone, Default)]
pub struct AudioResult {
    pub speech_detected: bool,
    pub speech_ratio: f64,
    pub speech_duration_ms: f64,
    pub total_duration_ms: f64,
}

/// Rolling-window behavioural event counts, in the fixed feature order the
/// behaviour classifier (or its rule-based fallback) expects.
#[derive(Debug, Clone, Default)]
pub struct BehaviourFeatures {
    pub tab_switches: u32,
    pub copy_paste_count: u32,
    pub context_menu_count: u32,
    pub fullscreen_exits: u32,
    pub focus_loss_count: u32,
    pub event_rate_per_min: f64,
}

/// Severity tier assigned to a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emittable violation produced by a scoring function.
#[derive(Debug, Clone)]
pub struct Violation {
    pub event_type: &'static str,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
}

/// Output of a scoring function: an overall score in `[0, 1]`, its severity
/// tier, and the violations worth emitting (MEDIUM and above).
#[derive(Debug, Clone)]
pub struct RiskResult {
    pub risk_score: f64,
    pub severity: Severity,
    pub violations: Vec<Violation>,
}
