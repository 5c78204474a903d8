//! Error types for the authorization core

use thiserror::Error;

/// Result type alias for the authorization core
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Main error type for the authorization core
#[derive(Error, Debug)]
pub enum AuthzError {
    /// Configuration errors (cyclic inheritance, unknown role reference,
    /// malformed permission string). Raised at build/startup time only.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Permission denied errors. Only raised by gated read APIs; the
    /// decision path reports denials as values, never as errors.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Audit delivery errors. Consumed by the audit writer's retry loop;
    /// never propagated to the caller of a guarded action.
    #[error("Audit write error: {0}")]
    AuditWrite(String),

    /// Identity provider errors
    #[error("Identity error: {0}")]
    Identity(String),

    /// External collaborator errors (ownership lookup, approval service)
    #[error("External service error: {0}")]
    External(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Helper functions for creating specific errors
impl AuthzError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn permission_denied<S: Into<String>>(message: S) -> Self {
        Self::PermissionDenied(message.into())
    }

    pub fn audit_write<S: Into<String>>(message: S) -> Self {
        Self::AuditWrite(message.into())
    }

    pub fn identity<S: Into<String>>(message: S) -> Self {
        Self::Identity(message.into())
    }

    pub fn external<S: Into<String>>(message: S) -> Self {
        Self::External(message.into())
    }
}
