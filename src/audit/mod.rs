//! Security-classified audit trail
//!
//! Every guarded action produces exactly one immutable [`AuditEvent`],
//! regardless of its verdict. Writing is never permission-gated; only
//! reading the trail back requires `audit:view`. External persistence is
//! decoupled from the decision path via the background writer.

pub mod query;
pub mod store;
pub mod types;
pub mod writer;

#[cfg(test)]
mod tests;

pub use query::AuditQuery;
pub use store::{AuditStore, InMemoryAuditStore};
pub use types::{AuditEvent, AuditEventType, AuditRecord, RequestMeta, SecurityLevel};
pub use writer::{AuditBackend, AuditWriter};

use crate::auth::session::UserPermissions;
use crate::auth::types::Permission;
use crate::config::AuditConfig;
use crate::utils::error::{AuthzError, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// User id recorded when no session is present, so denied anonymous
/// attempts remain attributable in the trail
const ANONYMOUS_USER: &str = "anonymous";

/// Classifies and appends immutable audit events, and answers
/// permission-gated queries over the stored trail
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
    writer: AuditWriter,
}

impl AuditLogger {
    /// Create a logger over an in-memory store, spawning the background
    /// delivery task against the external backend
    pub fn new(config: &AuditConfig, backend: Arc<dyn AuditBackend>) -> Self {
        info!("Initializing audit logger");
        Self {
            store: Arc::new(InMemoryAuditStore::new()),
            writer: AuditWriter::spawn(config, backend),
        }
    }

    /// Build and append one event for a guarded action.
    ///
    /// Appends unconditionally: no permission ever gates the write path,
    /// and failed actions are recorded the same as successful ones. The
    /// fully built event is returned to the caller.
    pub fn log_event(
        &self,
        session: Option<&UserPermissions>,
        record: AuditRecord,
        meta: &RequestMeta,
    ) -> AuditEvent {
        let (user_id, mut user_roles) = match session {
            Some(session) => (
                session.user_id.clone(),
                session.roles.iter().cloned().collect::<Vec<_>>(),
            ),
            None => (ANONYMOUS_USER.to_string(), Vec::new()),
        };
        user_roles.sort();

        let event = AuditEvent {
            id: Uuid::new_v4(),
            event_type: record.event_type,
            user_id,
            user_roles,
            timestamp: Utc::now(),
            resource_type: record.resource_type,
            resource_id: record.resource_id,
            action: record.action,
            details: record.details,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            session_id: meta.session_id.clone(),
            success: record.success,
            error_message: record.error_message,
            security_level: record.event_type.security_level(),
            metadata: record.metadata,
        };

        self.store.append(event.clone());
        self.writer.enqueue(event.clone());
        event
    }

    /// Read the trail back, newest first.
    ///
    /// Requires the caller to hold `audit:view`; filters apply
    /// conjunctively.
    pub fn get_audit_events(
        &self,
        session: Option<&UserPermissions>,
        query: &AuditQuery,
    ) -> Result<Vec<AuditEvent>> {
        let may_view = session
            .is_some_and(|s| s.has_permission(&Permission::new("audit", "view"), None));
        if !may_view {
            return Err(AuthzError::permission_denied(
                "audit:view is required to read the audit trail",
            ));
        }

        let mut events: Vec<AuditEvent> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|event| query.matches(event))
            .collect();
        // Store order is creation order; newest first
        events.reverse();
        Ok(events)
    }

    /// Number of events recorded locally
    pub fn recorded_events(&self) -> usize {
        self.store.len()
    }

    /// Delivery health and counters
    pub fn writer(&self) -> &AuditWriter {
        &self.writer
    }
}
