// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proctoring analytics engine: consumes frame/audio/behavior event
//! messages off a broker, scores each for academic-dishonesty risk, and
//! publishes violations back onto the broker. A small HTTP surface
//! (`/health`, `/ai/verify-identity`) sits alongside the consumer pipeline.

pub mod audio;
pub mod broker;
pub mod config;
pub mod db;
pub mod error;
pub mod model_registry;
pub mod risk;
pub mod state;
pub mod storage;
pub mod transport;
pub mod vision;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::broker::audio::AudioConsumer;
use crate::broker::behavior::BehaviorConsumer;
use crate::broker::frame::FrameConsumer;
use crate::broker::run_consumer;
use crate::config::Config;
use crate::db::BehaviorStore;
use crate::model_registry::ModelRegistry;
use crate::state::{spawn_window_janitor, ServiceState};
use crate::storage::ObjectStoreClient;
use crate::transport::build_router;

/// Wire up every collaborator, spawn the three consumers and the window
/// janitor, then serve the HTTP surface until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let models = ModelRegistry::load(&config);
    let object_store = ObjectStoreClient::connect(&config).await;
    object_store.ensure_bucket_exists(&config.bucket_snapshots).await;
    object_store.ensure_bucket_exists(&config.bucket_profiles).await;
    let behavior_store = BehaviorStore::connect(&config).await?;

    let state = Arc::new(ServiceState::new(config, models, object_store, behavior_store, shutdown.clone()));

    spawn_window_janitor(Arc::clone(&state));

    let frame_handler = Arc::new(FrameConsumer::new(Arc::clone(&state)));
    let audio_handler = Arc::new(AudioConsumer::new(Arc::clone(&state)));
    let behavior_handler = Arc::new(BehaviorConsumer::new(Arc::clone(&state)));

    tokio::spawn(run_consumer(frame_handler, state.config.broker_url.clone(), shutdown.clone()));
    tokio::spawn(run_consumer(audio_handler, state.config.broker_url.clone(), shutdown.clone()));
    tokio::spawn(run_consumer(behavior_handler, state.config.broker_url.clone(), shutdown.clone()));

    tracing::info!("proctor-ai listening on {addr}");
    let router = build_router(Arc::clone(&state));
    let listener = TcpListener::bind(&addr).await?;

    let shutdown_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received shutdown signal");
            shutdown_signal.cancel();
        }
    });

    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
