use super::*;

#[test]
fn slot_with_no_path_is_unavailable() {
    let slot = ModelSlot::load(None, "test");
    assert!(!slot.is_ready());
}

#[test]
fn slot_with_missing_file_is_unavailable() {
    let slot = ModelSlot::load(Some(Path::new("/nonexistent/model.onnx")), "test");
    assert!(!slot.is_ready());
}

#[test]
fn readiness_reflects_each_slot_independently() {
    let registry = ModelRegistry {
        object_detector: ModelSlot::load(None, "object_detector"),
        behavior_classifier: ModelSlot::load(Some(Path::new("/nonexistent/b.onnx")), "behavior_classifier"),
        face_encoder: ModelSlot::Unavailable("disabled for test".to_owned()),
        face_mesh: ModelSlot::Unavailable("disabled for test".to_owned()),
    };
    let readiness = registry.readiness();
    assert!(!readiness.object_detector);
    assert!(!readiness.behavior_classifier);
    assert!(!readiness.face_encoder);
    assert!(!readiness.face_mesh);
}
