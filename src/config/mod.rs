//! Configuration management
//!
//! Serde-backed configuration with YAML file loading. Every field carries a
//! default so an empty document yields a working configuration.

pub mod models;

pub use models::{ApprovalConfig, AuditConfig, AuthzConfig};

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration for the authorization core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Authorization configuration
    #[serde(default)]
    pub authz: AuthzConfig,
    /// Audit trail configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());

        let contents = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }
}
