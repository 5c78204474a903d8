//! Audit event types and security classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Kinds of security-relevant events recorded by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// User logged in
    Login,
    /// User logged out
    Logout,
    /// A resource was created
    ResourceCreation,
    /// A resource was updated
    ResourceUpdate,
    /// A resource was viewed
    ResourceView,
    /// A resource was deleted
    ResourceDeletion,
    /// Access to a resource was revoked
    AccessRevocation,
    /// An access attempt was denied
    UnauthorizedAccess,
    /// Platform settings were changed
    SettingsChange,
    /// A permission was granted to a user
    PermissionGrant,
    /// A permission was revoked from a user
    PermissionRevoke,
    /// Consent was collected from a subject
    ConsentCollection,
    /// Data was exported out of the platform
    DataExport,
    /// An approval was requested
    ApprovalRequested,
    /// An approval was granted or rejected
    ApprovalDecision,
}

impl AuditEventType {
    /// Security classification of this event type.
    /// Table-driven and deterministic: the same type always classifies the
    /// same way.
    pub fn security_level(&self) -> SecurityLevel {
        match self {
            Self::ResourceDeletion
            | Self::AccessRevocation
            | Self::UnauthorizedAccess
            | Self::SettingsChange
            | Self::PermissionGrant
            | Self::PermissionRevoke => SecurityLevel::Restricted,
            Self::ConsentCollection | Self::DataExport => SecurityLevel::Confidential,
            Self::Login
            | Self::Logout
            | Self::ResourceCreation
            | Self::ResourceUpdate
            | Self::ResourceView
            | Self::ApprovalRequested
            | Self::ApprovalDecision => SecurityLevel::Internal,
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::ResourceCreation => "resource_creation",
            Self::ResourceUpdate => "resource_update",
            Self::ResourceView => "resource_view",
            Self::ResourceDeletion => "resource_deletion",
            Self::AccessRevocation => "access_revocation",
            Self::UnauthorizedAccess => "unauthorized_access",
            Self::SettingsChange => "settings_change",
            Self::PermissionGrant => "permission_grant",
            Self::PermissionRevoke => "permission_revoke",
            Self::ConsentCollection => "consent_collection",
            Self::DataExport => "data_export",
            Self::ApprovalRequested => "approval_requested",
            Self::ApprovalDecision => "approval_decision",
        };
        f.write_str(s)
    }
}

/// Sensitivity classification of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    /// Normal operational events
    Internal,
    /// Events touching personal or contractual data
    Confidential,
    /// Security-sensitive events requiring controlled access
    Restricted,
}

impl SecurityLevel {
    /// Numeric rank for comparison (higher = more sensitive)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Internal => 0,
            Self::Confidential => 1,
            Self::Restricted => 2,
        }
    }

    /// Whether this level meets a minimum sensitivity threshold
    pub fn meets_threshold(&self, threshold: Self) -> bool {
        self.rank() >= threshold.rank()
    }
}

impl PartialOrd for SecurityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SecurityLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Request metadata supplied by the calling boundary, never derived
/// internally
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    /// Client IP address
    pub ip_address: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
    /// Session identifier
    pub session_id: Option<String>,
}

impl RequestMeta {
    /// Empty metadata for boundaries with nothing to report
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the client IP address
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Set the client user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the session identifier
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Immutable record of one security-relevant action.
/// Fully constructed before publication; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event id, the idempotency key for external delivery
    pub id: Uuid,
    /// Kind of event
    pub event_type: AuditEventType,
    /// Acting user id (`anonymous` when no session was present)
    pub user_id: String,
    /// Roles held by the acting user at decision time
    pub user_roles: Vec<String>,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Type of the affected resource, if any
    pub resource_type: Option<String>,
    /// Id of the affected resource, if any
    pub resource_id: Option<String>,
    /// Action that was attempted
    pub action: String,
    /// Human-readable detail
    pub details: String,
    /// Client IP address
    pub ip_address: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
    /// Session identifier
    pub session_id: Option<String>,
    /// Whether the action succeeded
    pub success: bool,
    /// Error message for failed actions
    pub error_message: Option<String>,
    /// Sensitivity classification, derived from the event type
    pub security_level: SecurityLevel,
    /// Structured extra context
    pub metadata: serde_json::Value,
}

/// Input to [`crate::audit::AuditLogger::log_event`]: the facts about the
/// action; id, timestamp, caller identity, and classification are filled in
/// by the logger.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// Kind of event
    pub event_type: AuditEventType,
    /// Action that was attempted
    pub action: String,
    /// Human-readable detail
    pub details: String,
    /// Type of the affected resource, if any
    pub resource_type: Option<String>,
    /// Id of the affected resource, if any
    pub resource_id: Option<String>,
    /// Whether the action succeeded
    pub success: bool,
    /// Error message for failed actions
    pub error_message: Option<String>,
    /// Structured extra context
    pub metadata: serde_json::Value,
}

impl AuditRecord {
    /// A successful action record
    pub fn new(
        event_type: AuditEventType,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            action: action.into(),
            details: details.into(),
            resource_type: None,
            resource_id: None,
            success: true,
            error_message: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach the affected resource
    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Mark the action as failed with an error message
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error_message.into());
        self
    }

    /// Attach structured extra context
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
