//! Out-of-band audit delivery
//!
//! Decouples external persistence from the decision path: events are queued
//! on a bounded channel and delivered by a background task with bounded
//! retries. Delivery failure is surfaced through logs and counters, never
//! through the caller of a guarded action.

use crate::config::AuditConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::types::AuditEvent;

/// External audit persistence collaborator.
///
/// Contract: at-least-once delivery with idempotency keyed on `event.id`;
/// a duplicate write of the same id must be a no-op on the backend side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditBackend: Send + Sync {
    /// Persist one event
    async fn write(&self, event: &AuditEvent) -> Result<()>;
}

/// Handle enqueuing events for background delivery
pub struct AuditWriter {
    sender: mpsc::Sender<AuditEvent>,
    dropped: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl AuditWriter {
    /// Spawn the delivery task and return the enqueue handle
    pub fn spawn(config: &AuditConfig, backend: Arc<dyn AuditBackend>) -> Self {
        let (sender, receiver) = mpsc::channel(config.buffer_size);
        let failed = Arc::new(AtomicU64::new(0));

        tokio::spawn(delivery_loop(
            receiver,
            backend,
            config.delivery_max_attempts,
            Duration::from_millis(config.delivery_backoff_ms),
            failed.clone(),
        ));

        Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
            failed,
        }
    }

    /// Queue an event for delivery without blocking.
    ///
    /// A full buffer or a closed channel drops the delivery (the local
    /// store already holds the event) and bumps the dropped counter.
    pub fn enqueue(&self, event: AuditEvent) {
        match self.sender.try_send(event) {
            Ok(()) => debug!("audit event queued for delivery"),
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(event_id = %event.id, "audit delivery buffer full, delivery dropped");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                error!(event_id = %event.id, "audit delivery channel closed");
            }
        }
    }

    /// Whether the delivery channel is still open
    pub fn is_healthy(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Approximate fill ratio of the delivery buffer
    pub fn buffer_usage(&self) -> f64 {
        let capacity = self.sender.capacity();
        let max_capacity = self.sender.max_capacity();
        1.0 - (capacity as f64 / max_capacity as f64)
    }

    /// Deliveries dropped because the buffer was full or closed
    pub fn dropped_deliveries(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Deliveries abandoned after exhausting retries
    pub fn failed_deliveries(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

async fn delivery_loop(
    mut receiver: mpsc::Receiver<AuditEvent>,
    backend: Arc<dyn AuditBackend>,
    max_attempts: u32,
    backoff: Duration,
    failed: Arc<AtomicU64>,
) {
    while let Some(event) = receiver.recv().await {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match backend.write(&event).await {
                Ok(()) => break,
                Err(e) if attempt < max_attempts => {
                    warn!(
                        event_id = %event.id,
                        attempt,
                        "audit delivery failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(backoff * attempt).await;
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    error!(
                        event_id = %event.id,
                        attempts = attempt,
                        "audit delivery abandoned: {}",
                        e
                    );
                    break;
                }
            }
        }
    }
    debug!("audit delivery loop stopped");
}
