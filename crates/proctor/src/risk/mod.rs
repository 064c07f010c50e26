// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Risk scoring: pure functions over vision/audio/behaviour evidence plus
//! the shared types they operate on.

pub mod aggregator;
pub mod types;

pub use aggregator::{rule_based_behaviour_risk, score_audio, score_behaviour, score_frame, SeverityThresholds};
pub use types::{AudioResult, BehaviourFeatures, RiskResult, Severity, Violation, VisionResult};
