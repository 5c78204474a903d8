//! Authorization configuration models

use serde::{Deserialize, Serialize};

/// Authorization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Default role assigned when the identity provider supplies none
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Roles treated as administrative
    #[serde(default = "default_admin_roles")]
    pub admin_roles: Vec<String>,
    /// Approval policy configuration
    #[serde(default)]
    pub approval: ApprovalConfig,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            admin_roles: default_admin_roles(),
            approval: ApprovalConfig::default(),
        }
    }
}

/// Approval policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    /// Vendor commission percentage that is accepted without approval.
    /// Any deviation from this value requires an approved action.
    #[serde(default = "default_commission_threshold")]
    pub commission_threshold_percent: f64,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            commission_threshold_percent: default_commission_threshold(),
        }
    }
}

fn default_role() -> String {
    "employee".to_string()
}

fn default_admin_roles() -> Vec<String> {
    vec!["admin".to_string()]
}

fn default_commission_threshold() -> f64 {
    3.0
}
