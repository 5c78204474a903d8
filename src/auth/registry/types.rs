//! Role definition types

use crate::auth::types::{Condition, Grant, Permission};
use serde::{Deserialize, Serialize};

/// A role's direct grants and inheritance edges, defined at build time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Role name
    pub name: String,
    /// Role description
    #[serde(default)]
    pub description: String,
    /// Permissions granted directly by this role
    #[serde(default)]
    pub grants: Vec<Grant>,
    /// Roles this role inherits from
    #[serde(default)]
    pub inherits: Vec<String>,
}

impl RoleDefinition {
    /// Create an empty role definition
    pub fn new<S: Into<String>>(name: S, description: S) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            grants: Vec::new(),
            inherits: Vec::new(),
        }
    }

    /// Add an unconditional grant
    pub fn grant(mut self, permission: Permission) -> Self {
        self.grants.push(Grant::unconditional(permission));
        self
    }

    /// Add a conditional grant
    pub fn grant_if(mut self, permission: Permission, condition: Condition) -> Self {
        self.grants.push(Grant::conditional(permission, condition));
        self
    }

    /// Add an inheritance edge
    pub fn inherits_from<S: Into<String>>(mut self, role: S) -> Self {
        self.inherits.push(role.into());
        self
    }
}
