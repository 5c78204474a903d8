//! Audit trail query filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AuditEvent, AuditEventType};

/// Conjunctive filter set for reading the audit trail.
/// Every populated field must match; an empty query matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    /// Match a specific event type
    pub event_type: Option<AuditEventType>,
    /// Match a specific acting user
    pub user_id: Option<String>,
    /// Match a specific resource type
    pub resource_type: Option<String>,
    /// Match a specific resource id
    pub resource_id: Option<String>,
    /// Only events at or after this instant
    pub date_from: Option<DateTime<Utc>>,
    /// Only events at or before this instant
    pub date_to: Option<DateTime<Utc>>,
}

impl AuditQuery {
    /// A query matching all events
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter by event type
    pub fn with_event_type(mut self, event_type: AuditEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Filter by acting user
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Filter by resource type
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Filter by resource id
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Only events at or after the instant
    pub fn since(mut self, date_from: DateTime<Utc>) -> Self {
        self.date_from = Some(date_from);
        self
    }

    /// Only events at or before the instant
    pub fn until(mut self, date_to: DateTime<Utc>) -> Self {
        self.date_to = Some(date_to);
        self
    }

    /// Whether an event satisfies every populated filter
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(event_type) = self.event_type {
            if event.event_type != event_type {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if &event.user_id != user_id {
                return false;
            }
        }
        if let Some(resource_type) = &self.resource_type {
            if event.resource_type.as_ref() != Some(resource_type) {
                return false;
            }
        }
        if let Some(resource_id) = &self.resource_id {
            if event.resource_id.as_ref() != Some(resource_id) {
                return false;
            }
        }
        if let Some(date_from) = self.date_from {
            if event.timestamp < date_from {
                return false;
            }
        }
        if let Some(date_to) = self.date_to {
            if event.timestamp > date_to {
                return false;
            }
        }
        true
    }
}
