use super::*;

#[test]
fn identical_encodings_have_zero_distance() {
    let a = vec![0.1, 0.2, 0.3];
    assert_eq!(euclidean_distance(&a, &a), 0.0);
}

#[test]
fn distance_matches_hand_computed_value() {
    let a = vec![0.0, 0.0];
    let b = vec![3.0, 4.0];
    assert_eq!(euclidean_distance(&a, &b), 5.0);
}

#[test]
fn round4_truncates_to_four_decimal_places() {
    assert_eq!(round4(0.123_456), 0.1235);
    assert_eq!(round4(1.0), 1.0);
}

#[test]
fn health_response_serializes_camel_case_object_store_field() -> anyhow::Result<()> {
    let body = HealthResponse {
        status: "ok",
        models: ModelReadiness {
            object_detector: true,
            behavior_classifier: true,
            face_encoder: false,
            face_mesh: true,
        },
        object_store: true,
        database: true,
    };
    let json = serde_json::to_value(&body)?;
    assert_eq!(json["objectStore"], true);
    assert_eq!(json["status"], "ok");
    Ok(())
}

#[test]
fn verify_identity_response_uses_match_as_the_wire_field_name() -> anyhow::Result<()> {
    let body = VerifyIdentityResponse { matched: true, confidence: 0.9, message: "identity verified".to_owned() };
    let json = serde_json::to_value(&body)?;
    assert_eq!(json["match"], true);
    assert_eq!(json.get("matched"), None);
    Ok(())
}

#[test]
fn verify_identity_request_parses_camel_case_wire_fields() -> anyhow::Result<()> {
    let json = r#"{"liveSelfieBase64":"Zm9v","studentId":"student-1"}"#;
    let req: VerifyIdentityRequest = serde_json::from_str(json)?;
    assert_eq!(req.live_selfie_base64, "Zm9v");
    assert_eq!(req.student_id, "student-1");
    Ok(())
}
