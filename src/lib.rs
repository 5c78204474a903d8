//! # staffguard
//!
//! Authorization and audit core for an HR/staffing admin platform.
//!
//! ## Features
//!
//! - **Role-based access control**: roles with inheritance, resolved once at
//!   startup into flat permission sets, with cycle detection at build time
//! - **Contextual conditions**: ownership, account scoping, vendor-type and
//!   PoC-role restrictions, all fail-closed on missing facts
//! - **Consistent bulk filtering**: collection views filtered by the exact
//!   evaluator used for single-item checks
//! - **Endpoint guarding**: declarative per-endpoint policies composing
//!   permission, ownership, vendor-access, and approval rules
//! - **Classified audit trail**: every guarded action recorded regardless of
//!   verdict, classified by sensitivity, delivered out-of-band
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use staffguard::{AccessControl, Config, Permission};
//! # use staffguard::{IdentityProvider, OwnershipLookup, ApprovalService, AuditBackend};
//! # async fn demo(
//! #     identity: std::sync::Arc<dyn IdentityProvider>,
//! #     ownership: std::sync::Arc<dyn OwnershipLookup>,
//! #     approval: std::sync::Arc<dyn ApprovalService>,
//! #     backend: std::sync::Arc<dyn AuditBackend>,
//! # ) -> staffguard::Result<()> {
//! let core = AccessControl::new(Config::default(), identity, ownership, approval, backend)?;
//!
//! let session = core.initialize_permissions("emp-1").await?;
//! if core.has_permission(Some(&session), &Permission::new("hotlists", "view"), None) {
//!     // serve the hotlist
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{AuthzError, Result};

pub use auth::{
    AccessControl, AccessVerdict, AdditionalValidation, ApprovalService, Condition, EndpointGuard,
    EndpointPolicy, Grant, IdentityProfile, IdentityProvider, OwnershipLookup, Permission,
    PermissionContext, PermissionDecision, PermissionRegistry, ResourceFacts, Restrictions,
    RoleDefinition, ScopedResource, UserPermissions, staffing_catalog,
};

pub use audit::{
    AuditBackend, AuditEvent, AuditEventType, AuditLogger, AuditQuery, AuditRecord, AuditStore,
    InMemoryAuditStore, RequestMeta, SecurityLevel,
};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
