//! Audit configuration models

use serde::{Deserialize, Serialize};

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Maximum events buffered for delivery before applying backpressure
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Maximum delivery attempts per event against the external backend
    #[serde(default = "default_delivery_max_attempts")]
    pub delivery_max_attempts: u32,
    /// Base backoff between delivery attempts, in milliseconds
    #[serde(default = "default_delivery_backoff_ms")]
    pub delivery_backoff_ms: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            delivery_max_attempts: default_delivery_max_attempts(),
            delivery_backoff_ms: default_delivery_backoff_ms(),
        }
    }
}

fn default_buffer_size() -> usize {
    10_000
}

fn default_delivery_max_attempts() -> u32 {
    3
}

fn default_delivery_backoff_ms() -> u64 {
    250
}
