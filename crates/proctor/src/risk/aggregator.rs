// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure risk-scoring functions. No I/O, no config loading — callers pass
//! in whatever thresholds apply. Kept pure and panic-free so every branch
//! is exhaustively unit-testable without a broker or model connection.

use super::types::{AudioResult, BehaviourFeatures, RiskResult, Severity, Violation, VisionResult};

/// Severity cutoffs that come from configuration; MEDIUM/LOW bands below
/// HIGH are fixed, matching the original service's hardcoded 0.40/0.0 bands.
#[derive(Debug, Clone, Copy)]
pub struct SeverityThresholds {
    pub high_risk: f64,
    pub critical: f64,
}

fn severity(score: f64, thresholds: SeverityThresholds) -> Severity {
    if score >= thresholds.critical {
        Severity::Critical
    } else if score >= thresholds.high_risk {
        Severity::High
    } else if score >= 0.40 {
        Severity::Medium
    } else if score > 0.0 {
        Severity::Low
    } else {
        Severity::None
    }
}

fn only_emittable(violations: Vec<Violation>) -> Vec<Violation> {
    violations
        .into_iter()
        .filter(|v| matches!(v.severity, Severity::Medium | Severity::High | Severity::Critical))
        .collect()
}

/// Score a single camera frame's vision-module outputs.
///
/// Weighted formula: face 0.30, gaze 0.20, object 0.20, mouth 0.10. The
/// remaining 0.20 is a reserved-and-unused audio slot: audio is scored in
/// its own pipeline (see [`score_audio`]) and never fused here.
pub fn score_frame(vision: &VisionResult, thresholds: SeverityThresholds) -> RiskResult {
    let mut violations = Vec::new();

    let face_missing = !vision.face_present || vision.face_count == 0;
    let multiple_faces = vision.face_count >= 2;

    let face_risk = if face_missing {
        violations.push(Violation {
            event_type: "FACE_NOT_DETECTED",
            severity: Severity::High,
            confidence: 0.95,
            description: "No face detected in frame.".to_owned(),
        });
        1.0
    } else if multiple_faces {
        violations.push(Violation {
            event_type: "MULTIPLE_FACES",
            severity: Severity::High,
            confidence: 0.85,
            description: format!("{} faces detected in frame.", vision.face_count),
        });
        0.80
    } else {
        0.0
    };

    let gaze_risk = if vision.gaze_off_screen {
        violations.push(Violation {
            event_type: "GAZE_AWAY",
            severity: Severity::Medium,
            confidence: 0.80,
            description: "Student's gaze is off screen.".to_owned(),
        });
        1.0
    } else {
        0.0
    };

    let mut object_risk: f64 = 0.0;
    if vision.phone_detected {
        object_risk = object_risk.max(vision.phone_confidence.max(0.75));
        violations.push(Violation {
            event_type: "PHONE_DETECTED",
            severity: Severity::High,
            confidence: vision.phone_confidence,
            description: format!(
                "Mobile phone detected (conf={:.0}%).",
                vision.phone_confidence * 100.0
            ),
        });
    }
    if vision.notes_detected {
        object_risk = object_risk.max(vision.notes_confidence.max(0.65));
        violations.push(Violation {
            event_type: "NOTES_DETECTED",
            severity: Severity::Medium,
            confidence: vision.notes_confidence,
            description: format!(
                "Book/notes detected (conf={:.0}%).",
                vision.notes_confidence * 100.0
            ),
        });
    }
    if vision.extra_person {
        object_risk = object_risk.max(0.85);
        violations.push(Violation {
            event_type: "MULTIPLE_PERSONS",
            severity: Severity::High,
            confidence: 0.85,
            description: "Extra person detected in frame.".to_owned(),
        });
    }

    let mouth_risk = if vision.mouth_open { 0.10 } else { 0.0 };

    let final_score = (face_risk * 0.30 + gaze_risk * 0.20 + object_risk * 0.20 + mouth_risk * 0.10).min(1.0);

    RiskResult {
        risk_score: final_score,
        severity: severity(final_score, thresholds),
        violations: only_emittable(violations),
    }
}

/// Score one audio chunk's VAD output.
pub fn score_audio(audio: &AudioResult, thresholds: SeverityThresholds) -> RiskResult {
    let mut violations = Vec::new();
    let risk_score = if audio.speech_detected {
        let sev = if audio.speech_ratio > 0.50 { Severity::High } else { Severity::Medium };
        violations.push(Violation {
            event_type: "SUSPICIOUS_AUDIO",
            severity: sev,
            confidence: audio.speech_ratio,
            description: format!(
                "Speech detected ({:.1}% of audio chunk, {:.0} ms).",
                audio.speech_ratio * 100.0,
                audio.speech_duration_ms
            ),
        });
        audio.speech_ratio.min(1.0)
    } else {
        0.0
    };

    RiskResult { risk_score, severity: severity(risk_score, thresholds), violations }
}

/// Score a behaviour feature snapshot using `classify` — the behaviour
/// classifier's prediction when loaded, or the rule-based fallback.
pub fn score_behaviour(
    features: &BehaviourFeatures,
    risk: f64,
    thresholds: SeverityThresholds,
) -> RiskResult {
    let risk = risk.clamp(0.0, 1.0);
    let mut violations = Vec::new();

    if risk >= 0.30 {
        violations.push(Violation {
            event_type: "SUSPICIOUS_BEHAVIOR",
            severity: severity(risk, thresholds),
            confidence: risk,
            description: format!(
                "Suspicious behaviour pattern detected (tab_switches={}, copy_paste={}, rate={:.1}/min).",
                features.tab_switches, features.copy_paste_count, features.event_rate_per_min
            ),
        });
    }

    RiskResult { risk_score: risk, severity: severity(risk, thresholds), violations }
}

/// Rule-based behaviour-risk fallback, used when no behaviour classifier is loaded.
pub fn rule_based_behaviour_risk(features: &BehaviourFeatures) -> f64 {
    let mut score = 0.0;
    score += (features.tab_switches as f64 * 0.06).min(0.40);
    score += (features.copy_paste_count as f64 * 0.05).min(0.25);
    score += (features.context_menu_count as f64 * 0.04).min(0.20);
    score += (features.fullscreen_exits as f64 * 0.05).min(0.20);
    score += (features.focus_loss_count as f64 * 0.04).min(0.20);
    score += (features.event_rate_per_min * 0.02).min(0.20);
    score.min(1.0)
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
