use super::*;
use crate::model_registry::ModelSlot;
use clap::Parser;

fn test_config() -> Config {
    Config::parse_from(["proctor-ai"])
}

fn empty_registry() -> ModelRegistry {
    ModelRegistry {
        object_detector: ModelSlot::Unavailable("test".to_owned()),
        behavior_classifier: ModelSlot::Unavailable("test".to_owned()),
        face_encoder: ModelSlot::Unavailable("test".to_owned()),
        face_mesh: ModelSlot::Unavailable("test".to_owned()),
    }
}

#[test]
fn analyze_frame_without_models_returns_safe_defaults() {
    let frame = RgbImage::new(8, 8);
    let registry = empty_registry();
    let vision = analyze_frame(&frame, &registry, &test_config());
    assert!(vision.face_present);
    assert!(!vision.phone_detected);
    assert!(!vision.gaze_off_screen);
}
