// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Energy-based voice-activity detection over 16kHz mono 16-bit PCM.
//!
//! The original service decodes arbitrary WebM/Opus blobs before running
//! webrtcvad; this service expects audio already normalised to raw PCM by
//! the producer and scores it directly, 30ms frames at a time — the same
//! frame size webrtcvad used.

use base64::Engine as _;

use crate::risk::AudioResult;

const SAMPLE_RATE: usize = 16_000;
const FRAME_MS: usize = 30;
const FRAME_SAMPLES: usize = SAMPLE_RATE * FRAME_MS / 1000;
const FRAME_BYTES: usize = FRAME_SAMPLES * 2;

/// Root-mean-square amplitude (as a fraction of full scale) above which a
/// frame counts as speech.
const ENERGY_THRESHOLD: f64 = 0.02;

/// Decode a base64-encoded PCM16 audio blob and score it.
pub fn analyze(audio_b64: &str, speech_ratio_threshold: f64) -> AudioResult {
    let Ok(raw) = base64::engine::general_purpose::STANDARD.decode(audio_b64) else {
        tracing::warn!("audio VAD: base64 decode failed");
        return AudioResult::default();
    };
    analyze_bytes(&raw, speech_ratio_threshold)
}

/// Score raw PCM16 bytes directly.
pub fn analyze_bytes(raw: &[u8], speech_ratio_threshold: f64) -> AudioResult {
    if raw.len() < FRAME_BYTES {
        return AudioResult::default();
    }

    let mut total_frames = 0usize;
    let mut speech_frames = 0usize;

    for frame in raw.chunks_exact(FRAME_BYTES) {
        total_frames += 1;
        if frame_is_speech(frame) {
            speech_frames += 1;
        }
    }

    if total_frames == 0 {
        return AudioResult::default();
    }

    let speech_ratio = speech_frames as f64 / total_frames as f64;
    AudioResult {
        speech_detected: speech_ratio > speech_ratio_threshold,
        speech_ratio,
        speech_duration_ms: (speech_frames * FRAME_MS) as f64,
        total_duration_ms: (total_frames * FRAME_MS) as f64,
    }
}

fn frame_is_speech(frame: &[u8]) -> bool {
    let samples = frame.chunks_exact(2).map(|b| i16::from_le_bytes([b[0], b[1]]));
    let mut sum_sq = 0f64;
    let mut count = 0usize;
    for sample in samples {
        let normalized = sample as f64 / i16::MAX as f64;
        sum_sq += normalized * normalized;
        count += 1;
    }
    if count == 0 {
        return false;
    }
    (sum_sq / count as f64).sqrt() >= ENERGY_THRESHOLD
}

#[cfg(test)]
#[path = "vad_tests.rs"]
mod tests;
