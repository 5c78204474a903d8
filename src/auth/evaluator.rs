//! Permission evaluation
//!
//! Synchronous, pure, fail-closed. Every function takes the session value
//! explicitly; the facade maps an absent session to a denial before these
//! methods are reached.

use crate::auth::session::UserPermissions;
use crate::auth::types::{Condition, Permission, PermissionContext, PermissionDecision};
use tracing::debug;

impl Condition {
    /// Evaluate this condition against the session's restrictions and the
    /// decision context. `Err` names the missing fact; callers treat it as
    /// an unsatisfied condition (fail closed).
    fn satisfied(
        &self,
        session: &UserPermissions,
        context: Option<&PermissionContext>,
    ) -> std::result::Result<bool, &'static str> {
        let resource = &context.ok_or("context")?.resource;

        match self {
            Condition::OwnOnly => {
                let owner = resource.owner_id.as_deref().ok_or("resource.owner_id")?;
                Ok(owner == session.user_id)
            }
            Condition::OwnAccounts => {
                let account = resource.account_id.as_deref().ok_or("resource.account_id")?;
                let allowed = session
                    .restrictions
                    .account_ids
                    .as_ref()
                    .ok_or("restrictions.account_ids")?;
                Ok(allowed.contains(account))
            }
            Condition::VendorIn => {
                let vendor = resource.vendor_id.as_deref().ok_or("resource.vendor_id")?;
                let allowed = session
                    .restrictions
                    .vendor_ids
                    .as_ref()
                    .ok_or("restrictions.vendor_ids")?;
                Ok(allowed.contains(vendor))
            }
            Condition::VendorTypeIn => {
                let vendor_type = resource
                    .vendor_type
                    .as_deref()
                    .ok_or("resource.vendor_type")?;
                let allowed = session
                    .restrictions
                    .vendor_types
                    .as_ref()
                    .ok_or("restrictions.vendor_types")?;
                Ok(allowed.contains(vendor_type))
            }
            Condition::PocRoleIn => {
                let poc_role = resource.poc_role.as_deref().ok_or("resource.poc_role")?;
                let allowed = session
                    .restrictions
                    .poc_roles
                    .as_ref()
                    .ok_or("restrictions.poc_roles")?;
                Ok(allowed.contains(poc_role))
            }
        }
    }
}

impl UserPermissions {
    /// Check whether the session holds a permission, honoring wildcards and
    /// contextual conditions.
    ///
    /// An unconditional matching grant allows immediately. A conditional
    /// grant allows only if its condition holds against the context; a
    /// missing context or missing fact fails that grant closed and the
    /// remaining grants are still considered.
    pub fn has_permission(
        &self,
        permission: &Permission,
        context: Option<&PermissionContext>,
    ) -> bool {
        for grant in &self.grants {
            if !grant.permission.matches(permission) {
                continue;
            }
            match &grant.condition {
                None => return true,
                Some(condition) => match condition.satisfied(self, context) {
                    Ok(true) => return true,
                    Ok(false) => {}
                    Err(missing) => {
                        debug!(
                            user_id = %self.user_id,
                            permission = %permission,
                            missing,
                            "conditional grant failed closed"
                        );
                    }
                },
            }
        }
        false
    }

    /// Whether the session holds any of the given permissions.
    /// Short-circuits on the first success.
    pub fn has_any_permission(
        &self,
        permissions: &[Permission],
        context: Option<&PermissionContext>,
    ) -> bool {
        permissions
            .iter()
            .any(|permission| self.has_permission(permission, context))
    }

    /// Whether the session holds all of the given permissions.
    /// Short-circuits on the first failure.
    pub fn has_all_permissions(
        &self,
        permissions: &[Permission],
        context: Option<&PermissionContext>,
    ) -> bool {
        permissions
            .iter()
            .all(|permission| self.has_permission(permission, context))
    }

    /// Detailed permission check retaining the matched grant and the denial
    /// reason, for diagnostics and audit detail.
    pub fn explain_permission(
        &self,
        permission: &Permission,
        context: Option<&PermissionContext>,
    ) -> PermissionDecision {
        let mut matched_any = false;
        let mut last_reason: Option<String> = None;

        for grant in &self.grants {
            if !grant.permission.matches(permission) {
                continue;
            }
            matched_any = true;
            match &grant.condition {
                None => {
                    return PermissionDecision {
                        granted: true,
                        matched_grant: Some(grant.clone()),
                        denial_reason: None,
                    };
                }
                Some(condition) => match condition.satisfied(self, context) {
                    Ok(true) => {
                        return PermissionDecision {
                            granted: true,
                            matched_grant: Some(grant.clone()),
                            denial_reason: None,
                        };
                    }
                    Ok(false) => {
                        last_reason = Some(format!("condition {:?} not satisfied", condition));
                    }
                    Err(missing) => {
                        last_reason = Some(format!(
                            "condition {:?} missing required fact '{}'",
                            condition, missing
                        ));
                    }
                },
            }
        }

        let denial_reason = if matched_any {
            last_reason
        } else {
            Some(format!("no grant matches '{}'", permission))
        };

        PermissionDecision {
            granted: false,
            matched_grant: None,
            denial_reason,
        }
    }
}
