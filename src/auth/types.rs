//! Authorization type definitions

use crate::utils::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Wildcard marker accepted on either side of a permission
pub const WILDCARD: &str = "*";

/// An atomic `resource:action` capability, possibly wildcarded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Resource this permission applies to (`*` matches any resource)
    pub resource: String,
    /// Action this permission allows (`*` matches any action)
    pub action: String,
}

impl Permission {
    /// Create a permission from a resource and an action
    pub fn new<R: Into<String>, A: Into<String>>(resource: R, action: A) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// Parse a `resource:action` string
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((resource, action)) if !resource.is_empty() && !action.is_empty() => {
                Ok(Self::new(resource, action))
            }
            _ => Err(AuthzError::config(format!(
                "malformed permission '{}', expected 'resource:action'",
                s
            ))),
        }
    }

    /// Check whether this (possibly wildcarded) permission covers a request.
    /// Wildcards are only honored on the grant side, never on the request.
    pub fn matches(&self, requested: &Permission) -> bool {
        (self.resource == WILDCARD || self.resource == requested.resource)
            && (self.action == WILDCARD || self.action == requested.action)
    }

    /// Whether this permission grants universal access
    pub fn is_universal(&self) -> bool {
        self.resource == WILDCARD && self.action == WILDCARD
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Contextual condition attached to a grant.
///
/// Each variant names the kind of restriction; the allow-lists themselves
/// live in the session's [`Restrictions`] and are read at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Resource owner must be the caller
    OwnOnly,
    /// Resource account must be in the caller's allowed accounts
    OwnAccounts,
    /// Resource vendor must be in the caller's allowed vendors
    VendorIn,
    /// Resource vendor type must be in the caller's allowed vendor types
    VendorTypeIn,
    /// Resource point-of-contact role must be in the caller's allowed PoC roles
    PocRoleIn,
}

/// A permission grant, optionally narrowed by a contextual condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    /// The granted permission
    pub permission: Permission,
    /// Condition narrowing the grant, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Grant {
    /// Create an unconditional grant
    pub fn unconditional(permission: Permission) -> Self {
        Self {
            permission,
            condition: None,
        }
    }

    /// Create a conditional grant
    pub fn conditional(permission: Permission, condition: Condition) -> Self {
        Self {
            permission,
            condition: Some(condition),
        }
    }
}

/// Per-user scoping limits narrowing otherwise-granted permissions.
///
/// `None` means the identity provider supplied no data for that dimension;
/// conditional checks against an absent set fail closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    /// Vendor ids the user may access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_ids: Option<HashSet<String>>,
    /// Vendor types the user may access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_types: Option<HashSet<String>>,
    /// Point-of-contact roles the user may access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poc_roles: Option<HashSet<String>>,
    /// Account ids the user may access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<HashSet<String>>,
}

/// Facts about the specific target resource of a decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFacts {
    /// Resource identifier
    pub id: Option<String>,
    /// Resource type (e.g. `vendor`, `bench_resource`)
    pub resource_type: Option<String>,
    /// Identifier of the resource owner
    pub owner_id: Option<String>,
    /// Account the resource belongs to
    pub account_id: Option<String>,
    /// Vendor the resource belongs to
    pub vendor_id: Option<String>,
    /// Vendor type classification
    pub vendor_type: Option<String>,
    /// Point-of-contact role on the resource
    pub poc_role: Option<String>,
}

impl ResourceFacts {
    /// Create empty resource facts
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resource id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the resource type
    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Set the owner id
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Set the account id
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Set the vendor id
    pub fn with_vendor(mut self, vendor_id: impl Into<String>) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    /// Set the vendor type
    pub fn with_vendor_type(mut self, vendor_type: impl Into<String>) -> Self {
        self.vendor_type = Some(vendor_type.into());
        self
    }

    /// Set the point-of-contact role
    pub fn with_poc_role(mut self, poc_role: impl Into<String>) -> Self {
        self.poc_role = Some(poc_role.into());
        self
    }
}

/// Per-decision facts used to evaluate conditional permissions.
/// Constructed per call, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionContext {
    /// Facts about the target resource
    pub resource: ResourceFacts,
}

impl PermissionContext {
    /// Create a context for the given resource facts
    pub fn for_resource(resource: ResourceFacts) -> Self {
        Self { resource }
    }
}

/// Items that expose scoping facts so collections can be filtered with the
/// same evaluator used for single-item checks
pub trait ScopedResource {
    /// Resource type of the item
    fn resource_type(&self) -> &str;

    /// Resource identifier
    fn resource_id(&self) -> Option<&str> {
        None
    }

    /// Owner identifier
    fn owner_id(&self) -> Option<&str> {
        None
    }

    /// Account identifier
    fn account_id(&self) -> Option<&str> {
        None
    }

    /// Vendor identifier
    fn vendor_id(&self) -> Option<&str> {
        None
    }

    /// Vendor type classification
    fn vendor_type(&self) -> Option<&str> {
        None
    }

    /// Point-of-contact role
    fn poc_role(&self) -> Option<&str> {
        None
    }

    /// Derive the decision context for this item
    fn permission_context(&self) -> PermissionContext {
        PermissionContext {
            resource: ResourceFacts {
                id: self.resource_id().map(str::to_string),
                resource_type: Some(self.resource_type().to_string()),
                owner_id: self.owner_id().map(str::to_string),
                account_id: self.account_id().map(str::to_string),
                vendor_id: self.vendor_id().map(str::to_string),
                vendor_type: self.vendor_type().map(str::to_string),
                poc_role: self.poc_role().map(str::to_string),
            },
        }
    }
}

/// Verdict of an endpoint access validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessVerdict {
    /// Whether access is allowed
    pub allowed: bool,
    /// Reason for denial (if not allowed)
    pub reason: Option<String>,
}

impl AccessVerdict {
    /// An allowing verdict
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// A denying verdict with a reason
    pub fn deny<S: Into<String>>(reason: S) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of a detailed permission check
#[derive(Debug, Clone)]
pub struct PermissionDecision {
    /// Whether permission is granted
    pub granted: bool,
    /// The grant that satisfied the check (if granted)
    pub matched_grant: Option<Grant>,
    /// Reason for denial (if not granted)
    pub denial_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parse() {
        let perm = Permission::parse("vendors:view").unwrap();
        assert_eq!(perm.resource, "vendors");
        assert_eq!(perm.action, "view");
        assert_eq!(perm.to_string(), "vendors:view");
    }

    #[test]
    fn test_permission_parse_rejects_malformed() {
        assert!(Permission::parse("vendors").is_err());
        assert!(Permission::parse(":view").is_err());
        assert!(Permission::parse("vendors:").is_err());
        assert!(Permission::parse("").is_err());
    }

    #[test]
    fn test_wildcard_matching() {
        let universal = Permission::new("*", "*");
        let resource_wild = Permission::new("vendors", "*");
        let action_wild = Permission::new("*", "view");
        let exact = Permission::new("vendors", "view");

        let requested = Permission::new("vendors", "view");
        assert!(universal.matches(&requested));
        assert!(resource_wild.matches(&requested));
        assert!(action_wild.matches(&requested));
        assert!(exact.matches(&requested));

        let other = Permission::new("hotlists", "create");
        assert!(universal.matches(&other));
        assert!(!resource_wild.matches(&other));
        assert!(!action_wild.matches(&other));
        assert!(!exact.matches(&other));
    }

    #[test]
    fn test_wildcard_only_honored_on_grant_side() {
        let exact = Permission::new("vendors", "view");
        let requested_wild = Permission::new("*", "*");
        assert!(!exact.matches(&requested_wild));
    }

    #[test]
    fn test_is_universal() {
        assert!(Permission::new("*", "*").is_universal());
        assert!(!Permission::new("vendors", "*").is_universal());
    }

    #[test]
    fn test_access_verdict_constructors() {
        let allow = AccessVerdict::allow();
        assert!(allow.allowed);
        assert!(allow.reason.is_none());

        let deny = AccessVerdict::deny("insufficient permissions");
        assert!(!deny.allowed);
        assert_eq!(deny.reason.as_deref(), Some("insufficient permissions"));
    }

    #[test]
    fn test_resource_facts_builder() {
        let facts = ResourceFacts::new()
            .with_id("br-1")
            .with_type("bench_resource")
            .with_owner("emp-7")
            .with_account("acc1");

        assert_eq!(facts.id.as_deref(), Some("br-1"));
        assert_eq!(facts.resource_type.as_deref(), Some("bench_resource"));
        assert_eq!(facts.owner_id.as_deref(), Some("emp-7"));
        assert_eq!(facts.account_id.as_deref(), Some("acc1"));
        assert!(facts.vendor_id.is_none());
    }
}
