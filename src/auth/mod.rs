//! Authorization core
//!
//! Role-based permission evaluation with contextual conditions, collection
//! filtering, and endpoint guarding. Decisions are fail-closed, synchronous,
//! and free of hidden session state: the resolved [`UserPermissions`] value
//! is passed explicitly into every call.

mod evaluator;
pub mod filter;
pub mod guard;
pub mod registry;
pub mod session;
pub mod types;


pub use guard::{
    AdditionalValidation, ApprovalService, EndpointGuard, EndpointPolicy, OwnershipLookup,
};
pub use registry::{staffing_catalog, PermissionRegistry, RoleDefinition};
pub use session::{IdentityProfile, IdentityProvider, UserPermissions};
pub use types::{
    AccessVerdict, Condition, Grant, Permission, PermissionContext, PermissionDecision,
    ResourceFacts, Restrictions, ScopedResource,
};

use crate::audit::{AuditBackend, AuditEventType, AuditLogger, AuditQuery, AuditRecord, RequestMeta};
use crate::audit::AuditEvent;
use crate::config::Config;
use crate::utils::error::Result;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authorization and audit facade for the platform.
///
/// Owns the immutable role registry, the per-session permission table, the
/// endpoint guard, and the audit trail. All decision entry points take the
/// session explicitly; an absent session denies.
pub struct AccessControl {
    /// Core configuration
    config: Arc<Config>,
    /// Immutable role registry, built once at startup
    registry: Arc<PermissionRegistry>,
    /// Resolved sessions by user id
    sessions: DashMap<String, Arc<UserPermissions>>,
    /// Identity/session collaborator
    identity: Arc<dyn IdentityProvider>,
    /// Endpoint guard over the external collaborators
    guard: EndpointGuard,
    /// Audit trail
    audit: AuditLogger,
}

impl AccessControl {
    /// Create the core with the built-in staffing role catalog
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        ownership: Arc<dyn OwnershipLookup>,
        approval: Arc<dyn ApprovalService>,
        audit_backend: Arc<dyn AuditBackend>,
    ) -> Result<Self> {
        Self::with_roles(
            config,
            staffing_catalog(),
            identity,
            ownership,
            approval,
            audit_backend,
        )
    }

    /// Create the core with a custom role catalog
    pub fn with_roles(
        config: Config,
        roles: Vec<RoleDefinition>,
        identity: Arc<dyn IdentityProvider>,
        ownership: Arc<dyn OwnershipLookup>,
        approval: Arc<dyn ApprovalService>,
        audit_backend: Arc<dyn AuditBackend>,
    ) -> Result<Self> {
        info!("Initializing authorization core");

        let registry = Arc::new(PermissionRegistry::build(roles)?);
        let guard = EndpointGuard::new(ownership, approval, config.authz.approval.clone());
        let audit = AuditLogger::new(&config.audit, audit_backend);

        info!("Authorization core initialized");
        Ok(Self {
            config: Arc::new(config),
            registry,
            sessions: DashMap::new(),
            identity,
            guard,
            audit,
        })
    }

    /// Resolve a user's session from the identity provider.
    ///
    /// Unions the grants of every recognized role, deduplicated. Role names
    /// the registry does not know are skipped with a warning; identity data
    /// is runtime input and must not take down the decision path. The
    /// configured default role applies when the provider supplies no roles.
    pub async fn initialize_permissions(&self, user_id: &str) -> Result<Arc<UserPermissions>> {
        let profile = self.identity.profile(user_id).await?;

        let mut role_names = profile.roles;
        if role_names.is_empty() {
            role_names.push(self.config.authz.default_role.clone());
        }

        let mut roles = HashSet::new();
        let mut grants = Vec::new();
        let mut seen = HashSet::new();
        for role in role_names {
            let Some(resolved) = self.registry.resolve(&role) else {
                warn!(user_id, role = %role, "identity provider reported unknown role, skipping");
                continue;
            };
            for grant in resolved {
                if seen.insert(grant.clone()) {
                    grants.push(grant.clone());
                }
            }
            roles.insert(role);
        }

        let session = Arc::new(UserPermissions {
            user_id: profile.user_id.clone(),
            roles,
            grants,
            restrictions: profile.restrictions,
        });

        self.sessions
            .insert(profile.user_id.clone(), session.clone());
        info!(user_id = %profile.user_id, roles = session.roles.len(), "session initialized");
        Ok(session)
    }

    /// Active session for a user, if one was initialized
    pub fn session(&self, user_id: &str) -> Option<Arc<UserPermissions>> {
        self.sessions.get(user_id).map(|entry| entry.value().clone())
    }

    /// Drop a user's session on logout. Subsequent checks without the
    /// session value deny.
    pub fn clear_permissions(&self, user_id: &str) {
        if self.sessions.remove(user_id).is_some() {
            info!(user_id, "session cleared");
        }
    }

    /// Permission check. An absent session denies every request.
    pub fn has_permission(
        &self,
        session: Option<&UserPermissions>,
        permission: &Permission,
        context: Option<&PermissionContext>,
    ) -> bool {
        match session {
            Some(session) => session.has_permission(permission, context),
            None => {
                debug!(permission = %permission, "no session, denying");
                false
            }
        }
    }

    /// Whether the session holds any of the permissions.
    /// An absent session denies.
    pub fn has_any_permission(
        &self,
        session: Option<&UserPermissions>,
        permissions: &[Permission],
        context: Option<&PermissionContext>,
    ) -> bool {
        session.is_some_and(|s| s.has_any_permission(permissions, context))
    }

    /// Whether the session holds all of the permissions.
    /// An absent session denies.
    pub fn has_all_permissions(
        &self,
        session: Option<&UserPermissions>,
        permissions: &[Permission],
        context: Option<&PermissionContext>,
    ) -> bool {
        session.is_some_and(|s| s.has_all_permissions(permissions, context))
    }

    /// Role membership test. An absent session denies.
    pub fn has_role(&self, session: Option<&UserPermissions>, role: &str) -> bool {
        session.is_some_and(|s| s.has_role(role))
    }

    /// Whether the session holds any of the roles. An absent session denies.
    pub fn has_any_role<S: AsRef<str>>(
        &self,
        session: Option<&UserPermissions>,
        roles: &[S],
    ) -> bool {
        session.is_some_and(|s| s.has_any_role(roles))
    }

    /// Whether the session holds one of the configured administrative roles.
    /// An absent session denies.
    pub fn is_admin(&self, session: Option<&UserPermissions>) -> bool {
        session.is_some_and(|s| s.has_any_role(&self.config.authz.admin_roles))
    }

    /// Resolved grant set for a role
    pub fn get_role_permissions(&self, role: &str) -> Option<&[Grant]> {
        self.registry.resolve(role)
    }

    /// Filter a collection down to the items the session may access
    pub fn filter_permitted<T: ScopedResource>(
        &self,
        session: Option<&UserPermissions>,
        items: Vec<T>,
        permission: &Permission,
    ) -> Vec<T> {
        filter::filter_permitted(session, items, permission)
    }

    /// Validate access to an endpoint and record the outcome.
    ///
    /// Exactly one audit event is written per call, allowed or denied: a
    /// denial is recorded as an unauthorized-access event carrying the
    /// denial reason, an allowed action under the policy's own event type.
    pub async fn validate_access(
        &self,
        session: Option<&UserPermissions>,
        policy: &EndpointPolicy,
        context: &PermissionContext,
        meta: &RequestMeta,
    ) -> AccessVerdict {
        let verdict = self.guard.validate_access(session, policy, context).await;

        let mut record = if verdict.allowed {
            AuditRecord::new(
                policy.event_type,
                policy.name.clone(),
                format!("access granted to '{}'", policy.name),
            )
        } else {
            AuditRecord::new(
                AuditEventType::UnauthorizedAccess,
                policy.name.clone(),
                format!("access denied to '{}'", policy.name),
            )
            .failed(
                verdict
                    .reason
                    .clone()
                    .unwrap_or_else(|| "denied".to_string()),
            )
        };
        if let (Some(resource_type), Some(resource_id)) = (
            context.resource.resource_type.as_deref(),
            context.resource.id.as_deref(),
        ) {
            record = record.with_resource(resource_type, resource_id);
        }
        self.audit.log_event(session, record, meta);

        verdict
    }

    /// Whether a vendor commission percentage requires an approved action
    pub fn commission_requires_approval(&self, commission_percent: f64) -> bool {
        self.guard.commission_requires_approval(commission_percent)
    }

    /// Record a security-relevant action in the audit trail
    pub fn log_event(
        &self,
        session: Option<&UserPermissions>,
        record: AuditRecord,
        meta: &RequestMeta,
    ) -> AuditEvent {
        self.audit.log_event(session, record, meta)
    }

    /// Read the audit trail back (requires `audit:view`)
    pub fn get_audit_events(
        &self,
        session: Option<&UserPermissions>,
        query: &AuditQuery,
    ) -> Result<Vec<AuditEvent>> {
        self.audit.get_audit_events(session, query)
    }

    /// Core configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The role registry
    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }
}
