//! Built-in role catalog for the staffing platform

use crate::auth::types::{Condition, Permission};

use super::types::RoleDefinition;

/// Default role definitions for the staffing platform.
///
/// Embedders can replace or extend this catalog; it is validated like any
/// other definition set when the registry is built.
pub fn staffing_catalog() -> Vec<RoleDefinition> {
    vec![
        // Platform administrator - universal access
        RoleDefinition::new("admin", "Platform administrator with universal access")
            .grant(Permission::new("*", "*")),
        // Employee - baseline role, own resources only
        RoleDefinition::new("employee", "Staff member with access to own resources")
            .grant_if(Permission::new("bench_resources", "read"), Condition::OwnOnly)
            .grant_if(Permission::new("documents", "view"), Condition::OwnOnly)
            .grant_if(Permission::new("employees", "update"), Condition::OwnOnly),
        // HR manager - employee lifecycle and document handling
        RoleDefinition::new("hr_manager", "HR manager handling the employee lifecycle")
            .inherits_from("employee")
            .grant(Permission::new("employees", "view"))
            .grant(Permission::new("employees", "create"))
            .grant(Permission::new("employees", "update"))
            .grant(Permission::new("employees", "delete"))
            .grant(Permission::new("documents", "manage"))
            .grant(Permission::new("consents", "collect")),
        // Account manager - scoped to assigned accounts
        RoleDefinition::new("account_manager", "Account manager scoped to assigned accounts")
            .inherits_from("employee")
            .grant_if(Permission::new("hotlists", "create"), Condition::OwnAccounts)
            .grant_if(Permission::new("hotlists", "update"), Condition::OwnAccounts)
            .grant_if(Permission::new("requirements", "create"), Condition::OwnAccounts)
            .grant_if(Permission::new("requirements", "view"), Condition::OwnAccounts)
            .grant_if(Permission::new("accounts", "view"), Condition::OwnAccounts)
            .grant_if(Permission::new("submissions", "view"), Condition::OwnAccounts),
        // Bench sales - marketing the bench
        RoleDefinition::new("bench_sales", "Bench sales representative")
            .inherits_from("employee")
            .grant(Permission::new("bench_resources", "view"))
            .grant(Permission::new("hotlists", "view"))
            .grant(Permission::new("submissions", "create")),
        // Vendor manager - scoped to assigned vendors, vendor types, and PoC roles
        RoleDefinition::new("vendor_manager", "Vendor relationship manager")
            .inherits_from("employee")
            .grant_if(Permission::new("vendors", "view"), Condition::VendorIn)
            .grant_if(Permission::new("vendors", "view"), Condition::VendorTypeIn)
            .grant_if(Permission::new("vendors", "update"), Condition::VendorTypeIn)
            .grant_if(Permission::new("vendors", "contact"), Condition::PocRoleIn),
        // Auditor - read-only access to the audit trail and reports
        RoleDefinition::new("auditor", "Read-only access to the audit trail")
            .grant(Permission::new("audit", "view"))
            .grant(Permission::new("reports", "view")),
    ]
}
