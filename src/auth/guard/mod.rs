//! Endpoint access validation
//!
//! Composes required-permission checks with ownership, vendor-access, and
//! approval rules at an API boundary. Rule order is fixed and
//! short-circuiting so denial reasons are deterministic and the external
//! lookups run last.


use crate::audit::types::AuditEventType;
use crate::auth::session::UserPermissions;
use crate::auth::types::{AccessVerdict, Permission, PermissionContext, ResourceFacts};
use crate::config::ApprovalConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resource-ownership lookup collaborator.
/// Resolves the current owner of an arbitrary resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipLookup: Send + Sync {
    /// Current owner of the resource, if known
    async fn owner_of(&self, resource_type: &str, resource_id: &str) -> Result<Option<String>>;
}

/// Approval-workflow collaborator.
/// Answers whether an action on a resource has been approved; the core
/// never creates or tracks approvals itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApprovalService: Send + Sync {
    /// Whether the action on the resource has been approved
    async fn is_approved(
        &self,
        action: &str,
        resource_type: &str,
        resource_id: &str,
    ) -> Result<bool>;
}

/// Additional validation rules for an endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdditionalValidation {
    /// Caller must own the target resource
    pub requires_ownership: bool,
    /// Caller must hold vendor access for the target's vendor
    pub requires_vendor_access: bool,
    /// Action must have been approved through the workflow
    pub requires_approval: bool,
}

/// Declarative access policy for one API endpoint
#[derive(Debug, Clone)]
pub struct EndpointPolicy {
    /// Action name, used for approval lookups and audit records
    pub name: String,
    /// Permissions the caller must hold, all of them
    pub required_permissions: Vec<Permission>,
    /// Additional validation rules
    pub validation: AdditionalValidation,
    /// Audit classification of the guarded action
    pub event_type: AuditEventType,
}

impl EndpointPolicy {
    /// Create a policy requiring the given permissions
    pub fn new<S: Into<String>>(
        name: S,
        required_permissions: Vec<Permission>,
        event_type: AuditEventType,
    ) -> Self {
        Self {
            name: name.into(),
            required_permissions,
            validation: AdditionalValidation::default(),
            event_type,
        }
    }

    /// Require the caller to own the target resource
    pub fn require_ownership(mut self) -> Self {
        self.validation.requires_ownership = true;
        self
    }

    /// Require vendor access for the target's vendor
    pub fn require_vendor_access(mut self) -> Self {
        self.validation.requires_vendor_access = true;
        self
    }

    /// Require the action to be approved
    pub fn require_approval(mut self) -> Self {
        self.validation.requires_approval = true;
        self
    }
}

/// Guard gating an API boundary with a fixed rule pipeline
pub struct EndpointGuard {
    ownership: Arc<dyn OwnershipLookup>,
    approval: Arc<dyn ApprovalService>,
    approval_config: ApprovalConfig,
}

impl EndpointGuard {
    /// Create a guard over the external collaborators
    pub fn new(
        ownership: Arc<dyn OwnershipLookup>,
        approval: Arc<dyn ApprovalService>,
        approval_config: ApprovalConfig,
    ) -> Self {
        Self {
            ownership,
            approval,
            approval_config,
        }
    }

    /// Validate access to an endpoint.
    ///
    /// Rules run in fixed order: permissions, ownership, vendor access,
    /// approval. The first failing rule produces the verdict. Collaborator
    /// errors deny the action (fail closed) and are logged, never surfaced
    /// in the reason text.
    pub async fn validate_access(
        &self,
        session: Option<&UserPermissions>,
        policy: &EndpointPolicy,
        context: &PermissionContext,
    ) -> AccessVerdict {
        if !policy.required_permissions.is_empty() {
            let held = session.is_some_and(|s| {
                s.has_all_permissions(&policy.required_permissions, Some(context))
            });
            if !held {
                debug!(endpoint = %policy.name, "denied: insufficient permissions");
                return AccessVerdict::deny("insufficient permissions");
            }
        }

        if policy.validation.requires_ownership && !self.verify_ownership(session, context).await {
            debug!(endpoint = %policy.name, "denied: ownership check failed");
            return AccessVerdict::deny("resource not owned by caller");
        }

        if policy.validation.requires_vendor_access && !self.verify_vendor_access(session, context)
        {
            debug!(endpoint = %policy.name, "denied: vendor access check failed");
            return AccessVerdict::deny("no access to this vendor");
        }

        if policy.validation.requires_approval && !self.verify_approval(policy, context).await {
            debug!(endpoint = %policy.name, "denied: approval check failed");
            return AccessVerdict::deny("action has not been approved");
        }

        AccessVerdict::allow()
    }

    /// Whether a vendor commission percentage deviates from the accepted
    /// default and therefore requires an approved action.
    pub fn commission_requires_approval(&self, commission_percent: f64) -> bool {
        (commission_percent - self.approval_config.commission_threshold_percent).abs()
            > f64::EPSILON
    }

    async fn verify_ownership(
        &self,
        session: Option<&UserPermissions>,
        context: &PermissionContext,
    ) -> bool {
        let Some(session) = session else {
            return false;
        };
        let (Some(resource_type), Some(resource_id)) = (
            context.resource.resource_type.as_deref(),
            context.resource.id.as_deref(),
        ) else {
            return false;
        };

        match self.ownership.owner_of(resource_type, resource_id).await {
            Ok(Some(owner)) => owner == session.user_id,
            Ok(None) => false,
            Err(e) => {
                warn!("ownership lookup failed, denying: {}", e);
                false
            }
        }
    }

    fn verify_vendor_access(
        &self,
        session: Option<&UserPermissions>,
        context: &PermissionContext,
    ) -> bool {
        let Some(session) = session else {
            return false;
        };
        let Some(vendor_id) = context.resource.vendor_id.as_deref() else {
            return false;
        };

        let mut facts = ResourceFacts::new()
            .with_type("vendor")
            .with_vendor(vendor_id);
        facts.vendor_type = context.resource.vendor_type.clone();
        facts.poc_role = context.resource.poc_role.clone();

        let vendor_context = PermissionContext::for_resource(facts);
        session.has_permission(&Permission::new("vendors", "view"), Some(&vendor_context))
    }

    async fn verify_approval(&self, policy: &EndpointPolicy, context: &PermissionContext) -> bool {
        let resource_type = context.resource.resource_type.as_deref().unwrap_or("");
        let resource_id = context.resource.id.as_deref().unwrap_or("");

        match self
            .approval
            .is_approved(&policy.name, resource_type, resource_id)
            .await
        {
            Ok(approved) => approved,
            Err(e) => {
                warn!("approval lookup failed, denying: {}", e);
                false
            }
        }
    }
}
