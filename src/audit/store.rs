//! Append-only audit event storage

use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use super::types::AuditEvent;

/// Append-only sink of fully constructed audit events.
///
/// `append` is idempotent on the event id: a duplicate append is a no-op.
/// Events are only published to the store once fully built, so readers
/// always observe consistent records.
pub trait AuditStore: Send + Sync {
    /// Append an event. Returns false when the id was already stored.
    fn append(&self, event: AuditEvent) -> bool;

    /// Consistent snapshot of all stored events, in creation order.
    fn snapshot(&self) -> Vec<AuditEvent>;

    /// Number of stored events
    fn len(&self) -> usize;

    /// Whether the store holds no events
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct StoreInner {
    events: Vec<AuditEvent>,
    seen: HashSet<Uuid>,
}

/// In-memory append-only audit store, safe under concurrent writes
#[derive(Default)]
pub struct InMemoryAuditStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryAuditStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, event: AuditEvent) -> bool {
        let mut inner = self.inner.write();
        if !inner.seen.insert(event.id) {
            debug!(event_id = %event.id, "duplicate audit append ignored");
            return false;
        }
        inner.events.push(event);
        true
    }

    fn snapshot(&self) -> Vec<AuditEvent> {
        self.inner.read().events.clone()
    }

    fn len(&self) -> usize {
        self.inner.read().events.len()
    }
}
