// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort, append-only writer for the `behavior_events` table. Every
//! other table in the relational store is read-only from this service and
//! out of scope here. Mirrors `db/repository.py`'s single `insert_event`
//! call: one row per call, transactional, failures logged and swallowed
//! rather than propagated across the consumer's ack boundary.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

#[derive(Clone)]
pub struct BehaviorStore {
    pool: PgPool,
}

impl BehaviorStore {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(&config.database_url).await?;
        Ok(Self { pool })
    }

    /// Append one row to `behavior_events`. Logs and swallows any failure —
    /// persistence is auxiliary, never allowed to fail the inbound message.
    pub async fn append_event(
        &self,
        session_id: &str,
        event_type: &str,
        timestamp_ms: i64,
        metadata: Option<serde_json::Value>,
    ) {
        let timestamp = epoch_ms_to_utc(timestamp_ms);
        let result = sqlx::query(
            "INSERT INTO behavior_events (session_id, event_type, timestamp, metadata) \
             VALUES ($1::uuid, $2, $3, $4)",
        )
        .bind(session_id)
        .bind(event_type)
        .bind(timestamp)
        .bind(metadata)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(session_id, event_type, err = %e, "behavior event persistence failed, swallowing");
        }
    }

    /// Backs the `/health` database reachability check.
    pub async fn check_connection(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Convert an inbound epoch-millisecond timestamp to UTC, falling back to
/// the current time for out-of-range values rather than failing the row.
fn epoch_ms_to_utc(timestamp_ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).unwrap_or_else(Utc::now)
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
