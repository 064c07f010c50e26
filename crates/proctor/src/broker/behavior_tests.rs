use super::*;

fn empty_registry() -> ModelRegistry {
    ModelRegistry {
        object_detector: ModelSlot::Unavailable("test".to_owned()),
        behavior_classifier: ModelSlot::Unavailable("test".to_owned()),
        face_encoder: ModelSlot::Unavailable("test".to_owned()),
        face_mesh: ModelSlot::Unavailable("test".to_owned()),
    }
}

#[test]
fn classify_without_model_falls_back_to_rule_based_score() {
    let features = BehaviourFeatures {
        tab_switches: 15,
        copy_paste_count: 10,
        context_menu_count: 5,
        fullscreen_exits: 5,
        focus_loss_count: 8,
        event_rate_per_min: 12.0,
    };
    let registry = empty_registry();
    let score = classify_or_fallback(&features, &registry);
    assert_eq!(score, rule_based_behaviour_risk(&features));
}

#[test]
fn metadata_carries_triggering_event_and_full_feature_vector() {
    let features = BehaviourFeatures { tab_switches: 3, event_rate_per_min: 1.5, ..Default::default() };
    let metadata = build_metadata("TAB_SWITCH", &features);
    assert_eq!(metadata["eventType"], "TAB_SWITCH");
    assert_eq!(metadata["tabSwitches"], 3);
    assert_eq!(metadata["eventRatePerMin"], 1.5);
}

#[test]
fn behavior_message_flattens_passthrough_fields_into_extra() -> anyhow::Result<()> {
    let json =
        r#"{"sessionId":"abc-123","type":"TAB_SWITCH","timestamp":1700000000000,"tabTitle":"docs"}"#;
    let msg: BehaviorMessage = serde_json::from_str(json)?;
    assert_eq!(msg.session_id, "abc-123");
    assert_eq!(msg.event_type, "TAB_SWITCH");
    assert_eq!(msg.extra.get("tabTitle").and_then(|v| v.as_str()), Some("docs"));
    assert!(!msg.extra.contains_key("sessionId"));
    Ok(())
}

#[test]
fn behavior_message_with_no_extra_fields_yields_empty_map() -> anyhow::Result<()> {
    let json = r#"{"sessionId":"abc-123","type":"TAB_SWITCH"}"#;
    let msg: BehaviorMessage = serde_json::from_str(json)?;
    assert!(msg.extra.is_empty());
    Ok(())
}
