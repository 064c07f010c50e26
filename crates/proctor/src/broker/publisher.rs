// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-affine outbound publisher. Each consumer task owns exactly one
//! `ResultPublisher`; the framework never shares or serializes publishes
//! across tasks (the underlying broker client isn't safe to share
//! mid-operation). Lazily connect, declare the exchange once, publish, and
//! on failure drop the connection and retry exactly once before giving up.

use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::risk::{Severity, Violation};

/// The outbound wire contract, bit-exact field names.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundResult {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub severity: Severity,
    pub confidence: Option<f64>,
    pub description: String,
    #[serde(rename = "snapshotPath")]
    pub snapshot_path: Option<String>,
    #[serde(rename = "riskScore")]
    pub risk_score: f64,
    pub metadata: serde_json::Value,
}

impl OutboundResult {
    /// Build one outbound record for `violation`, clamping and rounding
    /// `riskScore`/`confidence` to 4 decimals — the single canonical
    /// rounding point for the publisher.
    pub fn new(
        session_id: impl Into<String>,
        violation: &Violation,
        risk_score: f64,
        snapshot_path: Option<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            event_type: violation.event_type.to_owned(),
            severity: violation.severity,
            confidence: Some(round4(violation.confidence.clamp(0.0, 1.0))),
            description: violation.description.clone(),
            snapshot_path,
            risk_score: round4(risk_score.clamp(0.0, 1.0)),
            metadata,
        }
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

struct Conn {
    _connection: Connection,
    channel: Channel,
}

/// Lazily-connected, per-task AMQP publisher for the outbound topic exchange.
pub struct ResultPublisher {
    broker_url: String,
    exchange: String,
    routing_key: String,
    conn: Mutex<Option<Conn>>,
}

impl ResultPublisher {
    pub fn new(broker_url: String, exchange: String, routing_key: String) -> Self {
        Self { broker_url, exchange, routing_key, conn: Mutex::new(None) }
    }

    /// Publish one result. Retries the connect-and-publish sequence exactly
    /// once on failure; if the retry also fails, logs and drops the
    /// message — no dead-letter persistence, the upstream streams are the
    /// source of truth. Returns whether the publish ultimately succeeded.
    pub async fn publish(&self, result: &OutboundResult) -> bool {
        let payload = match serde_json::to_vec(result) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(err = %e, "failed to serialize outbound result, dropping");
                return false;
            }
        };

        for attempt in 0..2u8 {
            match self.try_publish(&payload).await {
                Ok(()) => return true,
                Err(e) => {
                    tracing::warn!(attempt, err = %e, "result publish failed");
                    *self.conn.lock().await = None;
                }
            }
        }

        tracing::error!(
            session_id = %result.session_id,
            event_type = %result.event_type,
            "dropping result after publish retry exhausted"
        );
        false
    }

    async fn try_publish(&self, payload: &[u8]) -> anyhow::Result<()> {
        let channel = self.connected_channel().await?;
        let props =
            BasicProperties::default().with_content_type("application/json".into()).with_delivery_mode(2);
        channel
            .basic_publish(&self.exchange, &self.routing_key, BasicPublishOptions::default(), payload, props)
            .await?
            .await?;
        Ok(())
    }

    async fn connected_channel(&self) -> anyhow::Result<Channel> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.channel.clone());
        }

        let connection = Connection::connect(&self.broker_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                &self.exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions { durable: true, ..Default::default() },
                FieldTable::default(),
            )
            .await?;

        let result_channel = channel.clone();
        *guard = Some(Conn { _connection: connection, channel });
        Ok(result_channel)
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
