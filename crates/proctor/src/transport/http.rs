// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /health` and `POST /ai/verify-identity` — the process's ambient
//! HTTP surface. Both are thin wrappers around collaborators the core
//! pipeline also uses (model registry, object store, database); neither
//! touches the broker.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorResponse};
use crate::model_registry::{ModelReadiness, ModelSlot};
use crate::state::ServiceState;
use crate::vision::face;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models: ModelReadiness,
    #[serde(rename = "objectStore")]
    pub object_store: bool,
    pub database: bool,
}

/// Reports per-model readiness plus object-store/database reachability.
/// Never fails: unreachable dependencies are reflected in the body, not an
/// HTTP error status, so orchestrators can poll it unconditionally.
pub async fn health(State(state): State<Arc<ServiceState>>) -> Json<HealthResponse> {
    let object_store = state.object_store.check_connection().await;
    let database = state.behavior_store.check_connection().await;
    let models = state.models.readiness();
    let status = if object_store && database { "ok" } else { "degraded" };
    Json(HealthResponse { status, models, object_store, database })
}

#[derive(Debug, Deserialize)]
pub struct VerifyIdentityRequest {
    #[serde(rename = "liveSelfieBase64")]
    pub live_selfie_base64: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyIdentityResponse {
    #[serde(rename = "match")]
    pub matched: bool,
    pub confidence: f64,
    pub message: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Compare a live selfie to the student's stored reference photo by
/// face-distance. A thin wrapper: all it does is invoke the face-encoder
/// collaborator and the object store.
pub async fn verify_identity(
    State(state): State<Arc<ServiceState>>,
    Json(req): Json<VerifyIdentityRequest>,
) -> ApiResult<VerifyIdentityResponse> {
    if !matches!(state.models.face_encoder, ModelSlot::Ready(_)) {
        return Err(ApiError::ModelUnavailable.to_http_response("face encoder model is not loaded"));
    }

    let Ok(selfie_bytes) = base64::engine::general_purpose::STANDARD.decode(&req.live_selfie_base64) else {
        return Err(ApiError::BadRequest.to_http_response("liveSelfieBase64 is not valid base64"));
    };
    let Ok(selfie_image) = image::load_from_memory(&selfie_bytes) else {
        return Err(ApiError::BadRequest.to_http_response("liveSelfieBase64 is not a decodable image"));
    };
    let selfie_rgb = selfie_image.to_rgb8();

    let Some(live_encoding) = face::encode(&selfie_rgb, &state.models.face_encoder) else {
        return Err(ApiError::FaceNotDetected.to_http_response("no face detected in live selfie"));
    };

    let Some(reference_bytes) = fetch_reference_photo(&state, &req.student_id).await else {
        return Err(ApiError::ReferencePhotoNotFound.to_http_response("no reference photo on file for student"));
    };
    let Ok(reference_image) = image::load_from_memory(&reference_bytes) else {
        return Err(ApiError::ReferencePhotoUnusable.to_http_response("reference photo could not be decoded"));
    };
    let reference_rgb = reference_image.to_rgb8();

    let Some(reference_encoding) = face::encode(&reference_rgb, &state.models.face_encoder) else {
        return Err(ApiError::ReferencePhotoUnusable.to_http_response("no face detected in reference photo"));
    };

    let distance = euclidean_distance(&live_encoding, &reference_encoding);
    let confidence = round4((1.0 - distance).clamp(0.0, 1.0));
    let matched = distance <= state.config.face_match_threshold;

    Ok(Json(VerifyIdentityResponse {
        matched,
        confidence,
        message: if matched { "identity verified".to_owned() } else { "identity mismatch".to_owned() },
    }))
}

/// Fetch `{studentId}.jpg`, falling back to `.png`.
async fn fetch_reference_photo(state: &ServiceState, student_id: &str) -> Option<Vec<u8>> {
    let jpg_key = format!("{student_id}.jpg");
    if let Some(bytes) = state.object_store.download_bytes(&state.config.bucket_profiles, &jpg_key).await {
        return Some(bytes);
    }
    let png_key = format!("{student_id}.png");
    state.object_store.download_bytes(&state.config.bucket_profiles, &png_key).await
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| ((*x - *y) as f64).powi(2)).sum::<f64>().sqrt()
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

impl IntoResponse for VerifyIdentityResponse {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
