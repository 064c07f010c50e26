// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin HTTP surface: `/health` and `/ai/verify-identity`. Out of the core
//! consumer-pipeline scope, but still part of the process's ambient
//! surface: one `axum::Router` over `Arc<ServiceState>`.

pub mod http;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::ServiceState;

pub fn build_router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/health", get(http::health))
        .route("/ai/verify-identity", post(http::verify_identity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
