// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads the optional ONNX artifacts the vision/audio/behaviour pipelines
//! consult, and reports per-artifact readiness on `/health`.
//!
//! Each artifact is an external collaborator specified only by its
//! interface contract: one tensor in, one tensor out. Model training and
//! the concrete network architectures are out of scope here; this module
//! owns only the loading, the readiness bookkeeping, and a thin run()
//! wrapper that isolates `tract`'s generic `RunnableModel` type to this
//! one file.

use std::path::Path;

use tract_onnx::prelude::*;

/// A loaded, runnable ONNX model. Kept behind a trait so callers never
/// name tract's concrete generic type.
pub trait InferenceSession: Send + Sync {
    /// Run inference on a single flat `f32` input tensor of the given shape,
    /// returning the flat output tensor.
    fn run(&self, shape: &[usize], input: &[f32]) -> anyhow::Result<Vec<f32>>;
}

struct TractSession {
    model: TypedRunnableModel<TypedModel>,
}

impl InferenceSession for TractSession {
    fn run(&self, shape: &[usize], input: &[f32]) -> anyhow::Result<Vec<f32>> {
        let tensor = Tensor::from_shape(shape, input)?;
        let outputs = self.model.run(tvec!(tensor.into()))?;
        let first = outputs.first().ok_or_else(|| anyhow::anyhow!("model produced no outputs"))?;
        Ok(first.as_slice::<f32>()?.to_vec())
    }
}

fn load_onnx(path: &Path) -> anyhow::Result<Box<dyn InferenceSession>> {
    let model = tract_onnx::onnx()
        .model_for_path(path)?
        .into_optimized()?
        .into_runnable()?;
    Ok(Box::new(TractSession { model }))
}

/// One optional model slot: ready, or unavailable with the reason recorded
/// for `/health` diagnostics. Mirrors `model_loader.py`'s per-artifact
/// try/except plus its `status: dict`.
pub enum ModelSlot {
    Ready(Box<dyn InferenceSession>),
    Unavailable(String),
}

impl ModelSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelSlot::Ready(_))
    }

    fn load(path: Option<&Path>, label: &str) -> Self {
        let Some(path) = path else {
            return ModelSlot::Unavailable("no path configured".to_owned());
        };
        if !path.exists() {
            tracing::warn!(label, path = %path.display(), "model artifact not found, disabling");
            return ModelSlot::Unavailable(format!("{} not found", path.display()));
        }
        match load_onnx(path) {
            Ok(session) => {
                tracing::info!(label, path = %path.display(), "model artifact loaded");
                ModelSlot::Ready(session)
            }
            Err(e) => {
                tracing::warn!(label, err = %e, "model artifact load failed, disabling");
                ModelSlot::Unavailable(e.to_string())
            }
        }
    }
}

/// Readiness flags for `/health`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelReadiness {
    pub object_detector: bool,
    pub behavior_classifier: bool,
    pub face_encoder: bool,
    pub face_mesh: bool,
}

/// All optional ML artifacts the pipelines consult. Any slot may be
/// `Unavailable`; pipelines fall back to rule-based heuristics or safe
/// defaults rather than failing.
pub struct ModelRegistry {
    pub object_detector: ModelSlot,
    pub behavior_classifier: ModelSlot,
    pub face_encoder: ModelSlot,
    pub face_mesh: ModelSlot,
}

impl ModelRegistry {
    pub fn load(config: &crate::config::Config) -> Self {
        Self {
            object_detector: ModelSlot::load(config.object_detector_path.as_deref(), "object_detector"),
            behavior_classifier: ModelSlot::load(
                config.behavior_classifier_path.as_deref(),
                "behavior_classifier",
            ),
            face_encoder: ModelSlot::load(config.face_encoder_path.as_deref(), "face_encoder"),
            face_mesh: ModelSlot::load(config.face_mesh_path.as_deref(), "face_mesh"),
        }
    }

    pub fn readiness(&self) -> ModelReadiness {
        ModelReadiness {
            object_detector: self.object_detector.is_ready(),
            behavior_classifier: self.behavior_classifier.is_ready(),
            face_encoder: self.face_encoder.is_ready(),
            face_mesh: self.face_mesh.is_ready(),
        }
    }
}

#[cfg(test)]
#[path = "model_registry_tests.rs"]
mod tests;
