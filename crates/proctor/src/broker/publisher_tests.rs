use super::*;
use crate::risk::Severity;

fn violation(confidence: f64) -> Violation {
    Violation {
        event_type: "PHONE_DETECTED",
        severity: Severity::High,
        confidence,
        description: "Mobile phone detected.".to_owned(),
    }
}

#[test]
fn new_clamps_and_rounds_to_four_decimals() {
    let result = OutboundResult::new(
        "session-1",
        &violation(1.23456),
        1.5,
        None,
        serde_json::json!({}),
    );
    assert_eq!(result.confidence, Some(1.0));
    assert_eq!(result.risk_score, 1.0);
}

#[test]
fn new_preserves_four_decimal_precision() {
    let result = OutboundResult::new("session-1", &violation(0.123456), 0.987654, None, serde_json::json!({}));
    assert_eq!(result.confidence, Some(0.1235));
    assert_eq!(result.risk_score, 0.9877);
}

#[test]
fn json_round_trips_with_wire_contract_field_names() {
    let result = OutboundResult::new(
        "session-1",
        &violation(0.90),
        0.18,
        Some("session-1/abcd.jpg".to_owned()),
        serde_json::json!({"faceCount": 1}),
    );
    let json = serde_json::to_value(&result).unwrap_or(serde_json::Value::Null);
    assert_eq!(json["sessionId"], "session-1");
    assert_eq!(json["eventType"], "PHONE_DETECTED");
    assert_eq!(json["severity"], "HIGH");
    assert_eq!(json["confidence"], 0.9);
    assert_eq!(json["snapshotPath"], "session-1/abcd.jpg");
    assert_eq!(json["riskScore"], 0.18);
    assert!(json["metadata"].is_object());
}

#[test]
fn null_confidence_serializes_as_json_null() {
    let result = OutboundResult {
        session_id: "session-1".to_owned(),
        event_type: "SUSPICIOUS_BEHAVIOR".to_owned(),
        severity: Severity::Medium,
        confidence: None,
        description: "desc".to_owned(),
        snapshot_path: None,
        risk_score: 0.5,
        metadata: serde_json::json!({}),
    };
    let json = serde_json::to_value(&result).unwrap_or(serde_json::Value::Null);
    assert!(json["confidence"].is_null());
    assert!(json["snapshotPath"].is_null());
}
