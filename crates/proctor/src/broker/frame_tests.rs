use super::*;

#[test]
fn snapshot_key_is_session_scoped_and_jpg() {
    let key = snapshot_key("session-123");
    assert!(key.starts_with("session-123/"));
    assert!(key.ends_with(".jpg"));
}

#[test]
fn snapshot_keys_are_unique_per_call() {
    let a = snapshot_key("session-123");
    let b = snapshot_key("session-123");
    assert_ne!(a, b);
}

#[test]
fn metadata_carries_raw_pose_and_detector_fields() {
    let vision = VisionResult {
        face_count: 1,
        head_yaw: 12.5,
        head_pitch: -3.0,
        lip_ratio: 0.08,
        phone_confidence: 0.91,
        notes_confidence: 0.0,
        ..Default::default()
    };
    let metadata = build_metadata(&vision);
    assert_eq!(metadata["faceCount"], 1);
    assert_eq!(metadata["headYawDeg"], 12.5);
    assert_eq!(metadata["headPitchDeg"], -3.0);
    assert_eq!(metadata["lipRatio"], 0.08);
    assert_eq!(metadata["phoneConfidence"], 0.91);
}

#[test]
fn frame_message_parses_camel_case_wire_fields() -> anyhow::Result<()> {
    let json = r#"{"sessionId":"abc-123","frameData":"Zm9v","timestamp":1700000000000}"#;
    let msg: FrameMessage = serde_json::from_str(json)?;
    assert_eq!(msg.session_id, "abc-123");
    assert_eq!(msg.frame_data, "Zm9v");
    Ok(())
}

#[test]
fn frame_message_tolerates_missing_timestamp() -> anyhow::Result<()> {
    let json = r#"{"sessionId":"abc-123","frameData":"Zm9v"}"#;
    let msg: FrameMessage = serde_json::from_str(json)?;
    assert_eq!(msg.timestamp, None);
    Ok(())
}
