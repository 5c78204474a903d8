//! Session-scoped authorization state
//!
//! A [`UserPermissions`] value is resolved once per authenticated session and
//! passed explicitly into every decision call. There is no hidden
//! current-user state; absence of a session fails every check closed.

use crate::auth::types::{Grant, Restrictions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils::error::Result;

/// Raw session facts supplied by the identity provider.
/// Trusted as ground truth for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// User identifier
    pub user_id: String,
    /// Role names held by the user
    pub roles: Vec<String>,
    /// Per-user scoping limits
    #[serde(default)]
    pub restrictions: Restrictions,
}

/// Identity/session provider collaborator.
///
/// Supplies the role set and restrictions for an authenticated user. The
/// core never authenticates; it resolves whatever the provider reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the session facts for a user
    async fn profile(&self, user_id: &str) -> Result<IdentityProfile>;
}

/// Resolved authorization context for one authenticated session.
///
/// Read-only after construction; cleared by whole-value removal on logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPermissions {
    /// User identifier
    pub user_id: String,
    /// Roles held by the user
    pub roles: HashSet<String>,
    /// Flattened, deduplicated grants resolved from the roles
    pub grants: Vec<Grant>,
    /// Per-user scoping limits
    pub restrictions: Restrictions,
}

impl UserPermissions {
    /// Direct role membership test, independent of grant resolution
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether the user holds any of the given roles
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.roles.contains(role.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_roles(roles: &[&str]) -> UserPermissions {
        UserPermissions {
            user_id: "u-1".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            grants: Vec::new(),
            restrictions: Restrictions::default(),
        }
    }

    #[test]
    fn test_has_role() {
        let session = session_with_roles(&["employee", "bench_sales"]);
        assert!(session.has_role("employee"));
        assert!(session.has_role("bench_sales"));
        assert!(!session.has_role("admin"));
    }

    #[test]
    fn test_has_any_role() {
        let session = session_with_roles(&["employee"]);
        assert!(session.has_any_role(&["admin", "employee"]));
        assert!(!session.has_any_role(&["admin", "auditor"]));
        assert!(!session.has_any_role::<&str>(&[]));
    }
}
