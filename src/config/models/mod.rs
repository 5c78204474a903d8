//! Configuration model definitions

pub mod audit;
pub mod authz;

pub use audit::AuditConfig;
pub use authz::{ApprovalConfig, AuthzConfig};
