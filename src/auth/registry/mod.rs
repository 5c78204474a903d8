//! Role registry with build-time inheritance resolution
//!
//! Roles are defined once at startup; the registry flattens inheritance into
//! per-role grant sets and rejects cyclic or dangling definitions before any
//! decision can be evaluated.

mod catalog;
#[allow(clippy::module_inception)]
mod registry;
mod types;


pub use catalog::staffing_catalog;
pub use registry::PermissionRegistry;
pub use types::RoleDefinition;
