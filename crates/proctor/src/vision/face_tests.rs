use super::*;
use crate::model_registry::ModelSlot;
use clap::Parser;
use image::RgbImage;

fn test_config() -> Config {
    Config::parse_from(["proctor-ai"])
}

#[test]
fn unavailable_model_defaults_to_present() {
    let frame = RgbImage::new(4, 4);
    let slot = ModelSlot::Unavailable("no model".to_owned());
    let result = analyze(&frame, &slot, &test_config());
    assert!(result.face_present);
    assert_eq!(result.face_count, 1);
}

#[test]
fn encode_without_model_returns_none() {
    let frame = RgbImage::new(4, 4);
    let slot = ModelSlot::Unavailable("no model".to_owned());
    assert!(encode(&frame, &slot).is_none());
}
