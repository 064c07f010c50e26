use super::*;

#[test]
fn metadata_carries_vad_fields() {
    let audio = AudioResult {
        speech_detected: true,
        speech_ratio: 0.80,
        speech_duration_ms: 4000.0,
        total_duration_ms: 5000.0,
    };
    let metadata = build_metadata(&audio);
    assert_eq!(metadata["speechRatio"], 0.80);
    assert_eq!(metadata["speechDurationMs"], 4000.0);
    assert_eq!(metadata["totalDurationMs"], 5000.0);
}

#[test]
fn audio_message_parses_camel_case_wire_fields() -> anyhow::Result<()> {
    let json = r#"{"sessionId":"abc-123","audioData":"Zm9v","timestamp":1700000000000}"#;
    let msg: AudioMessage = serde_json::from_str(json)?;
    assert_eq!(msg.session_id, "abc-123");
    assert_eq!(msg.audio_data, "Zm9v");
    Ok(())
}

#[test]
fn risk_score_is_six_tenths_of_speech_ratio_rounded_to_three_decimals() {
    assert_eq!(round3(0.60 * 0.6), 0.36);
}

#[test]
fn severity_cut_matches_the_three_tier_bands() {
    assert_eq!(severity_for_ratio(0.80), Severity::High);
    assert_eq!(severity_for_ratio(0.71), Severity::High);
    assert_eq!(severity_for_ratio(0.70), Severity::Medium);
    assert_eq!(severity_for_ratio(0.60), Severity::Medium);
    assert_eq!(severity_for_ratio(0.51), Severity::Medium);
    assert_eq!(severity_for_ratio(0.50), Severity::Low);
    assert_eq!(severity_for_ratio(0.25), Severity::Low);
}

#[test]
fn low_band_ratio_still_produces_a_violation() {
    // A ratio just above the VAD's own detection floor but below the
    // MEDIUM cut must still publish, unlike the frame pipeline's
    // MEDIUM-and-above filter.
    let ratio = 0.30;
    let risk_score = round3(ratio * 0.6);
    assert_eq!(severity_for_ratio(ratio), Severity::Low);
    assert!(risk_score > 0.0);
}
