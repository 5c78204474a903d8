//! Role registry with build-time inheritance resolution

use crate::auth::types::Grant;
use crate::utils::error::{AuthzError, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::types::RoleDefinition;

/// Static table of roles with their transitively resolved permission sets.
///
/// Inheritance is validated and flattened once at construction; after that
/// the registry is immutable and safe for unsynchronized concurrent reads.
#[derive(Debug)]
pub struct PermissionRegistry {
    /// Role definitions as supplied
    roles: HashMap<String, RoleDefinition>,
    /// Fully resolved, deduplicated grant set per role
    resolved: HashMap<String, Vec<Grant>>,
}

impl PermissionRegistry {
    /// Build a registry from role definitions.
    ///
    /// Fails with a configuration error on duplicate role names, references
    /// to unknown roles, or cyclic inheritance. These are startup errors;
    /// no decision call is reachable on a registry that failed to build.
    pub fn build(definitions: Vec<RoleDefinition>) -> Result<Self> {
        info!("Building permission registry with {} roles", definitions.len());

        let mut roles: HashMap<String, RoleDefinition> = HashMap::new();
        for definition in definitions {
            if roles.contains_key(&definition.name) {
                return Err(AuthzError::config(format!(
                    "duplicate role '{}'",
                    definition.name
                )));
            }
            roles.insert(definition.name.clone(), definition);
        }

        for role in roles.values() {
            for parent in &role.inherits {
                if !roles.contains_key(parent) {
                    return Err(AuthzError::config(format!(
                        "role '{}' inherits unknown role '{}'",
                        role.name, parent
                    )));
                }
            }
        }

        let mut resolved = HashMap::new();
        let mut settled: HashSet<String> = HashSet::new();
        for name in roles.keys() {
            let mut visiting = Vec::new();
            Self::resolve_role(name, &roles, &mut resolved, &mut settled, &mut visiting)?;
        }

        debug!("Resolved permission sets for {} roles", resolved.len());
        Ok(Self { roles, resolved })
    }

    /// Depth-first resolution with an explicit visiting stack for cycle
    /// detection. Grants are unioned and deduplicated; order of first
    /// appearance is kept so resolution is deterministic.
    fn resolve_role(
        name: &str,
        roles: &HashMap<String, RoleDefinition>,
        resolved: &mut HashMap<String, Vec<Grant>>,
        settled: &mut HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        if settled.contains(name) {
            return Ok(());
        }
        if visiting.iter().any(|v| v == name) {
            visiting.push(name.to_string());
            return Err(AuthzError::config(format!(
                "cyclic role inheritance: {}",
                visiting.join(" -> ")
            )));
        }

        visiting.push(name.to_string());

        // Presence was validated up front
        let role = roles
            .get(name)
            .ok_or_else(|| AuthzError::config(format!("unknown role '{}'", name)))?;

        let mut grants: Vec<Grant> = Vec::new();
        let mut seen: HashSet<Grant> = HashSet::new();
        for grant in &role.grants {
            if seen.insert(grant.clone()) {
                grants.push(grant.clone());
            }
        }

        for parent in &role.inherits {
            Self::resolve_role(parent, roles, resolved, settled, visiting)?;
            for grant in &resolved[parent] {
                if seen.insert(grant.clone()) {
                    grants.push(grant.clone());
                }
            }
        }

        visiting.pop();
        settled.insert(name.to_string());
        resolved.insert(name.to_string(), grants);
        Ok(())
    }

    /// Resolved grant set for a role. Pure and idempotent.
    pub fn resolve(&self, role: &str) -> Option<&[Grant]> {
        self.resolved.get(role).map(Vec::as_slice)
    }

    /// Get a role definition by name
    pub fn get_role(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.get(name)
    }

    /// Whether a role is defined
    pub fn contains_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Names of all defined roles
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.keys().map(String::as_str).collect()
    }
}
