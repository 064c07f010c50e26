// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic reconnecting single-queue consumer driver shared by the frame,
//! audio, and behavior consumers: connect, subscribe, run a select loop,
//! reconnect with a fixed delay on any connection-level error, translated
//! to AMQP ack/nack semantics. Each concrete consumer only implements
//! [`ConsumerHandler`]; this module owns the
//! connect/prefetch/ack/nack/reconnect state machine once.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use tokio_util::sync::CancellationToken;

/// Fixed reconnect backoff; retries are unbounded.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// One inbound-queue message handler. The driver never shares a handler's
/// connection or channel with another consumer — each concrete consumer
/// owns its own broker connection end to end.
#[async_trait::async_trait]
pub trait ConsumerHandler: Send + Sync + 'static {
    /// The queue this handler is bound to. Passively asserted on connect,
    /// never actively declared (an external service owns declarations).
    fn queue_name(&self) -> &str;

    /// Handle one message body. `Ok` acks; `Err` nacks without requeue —
    /// poison-message isolation, never a redelivery loop. A handler that
    /// wants to silently drop a message (e.g. an undecodable frame) should
    /// return `Ok(())` after logging, not propagate an error.
    async fn handle(&self, body: &[u8]) -> anyhow::Result<()>;
}

/// Drive `handler` against its queue until `shutdown` is cancelled,
/// reconnecting with a fixed delay on any connection-level error.
pub async fn run_consumer<H: ConsumerHandler>(handler: Arc<H>, broker_url: String, shutdown: CancellationToken) {
    let queue = handler.queue_name().to_owned();
    loop {
        if shutdown.is_cancelled() {
            return;
        }
        match connect_and_consume(&handler, &broker_url, &queue, &shutdown).await {
            Ok(()) => return,
            Err(e) => {
                tracing::warn!(queue = %queue, err = %e, "consumer disconnected, reconnecting in 5s");
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                }
            }
        }
    }
}

async fn connect_and_consume<H: ConsumerHandler>(
    handler: &Arc<H>,
    broker_url: &str,
    queue: &str,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    let conn = Connection::connect(broker_url, ConnectionProperties::default()).await?;
    let channel = conn.create_channel().await?;
    channel.basic_qos(1, BasicQosOptions::default()).await?;

    channel
        .queue_declare(queue, QueueDeclareOptions { passive: true, ..Default::default() }, FieldTable::default())
        .await?;

    let consumer_tag = format!("proctor-ai-{queue}");
    let mut consumer = channel
        .basic_consume(queue, &consumer_tag, BasicConsumeOptions::default(), FieldTable::default())
        .await?;

    tracing::info!(queue, "consumer subscribed");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = conn.close(0, "shutdown").await;
                return Ok(());
            }
            next = consumer.next() => {
                let Some(delivery) = next else {
                    anyhow::bail!("consumer stream for {queue} ended unexpectedly");
                };
                let delivery = delivery?;
                match handler.handle(&delivery.data).await {
                    Ok(()) => delivery.ack(BasicAckOptions::default()).await?,
                    Err(e) => {
                        tracing::warn!(queue, err = %e, "handler failed, nacking without requeue");
                        delivery.nack(BasicNackOptions { requeue: false, ..Default::default() }).await?;
                    }
                }
            }
        }
    }
}
