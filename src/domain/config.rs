//! Global configuration schema and completeness validation.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Default SSH client configuration file, relative to the home directory.
pub const DEFAULT_SSH_CONFIG: &str = "~/.ssh/config";

/// Global configuration stored in `~/.outpost/config.json`.
///
/// The first four fields must be non-empty before `outpost init` may run;
/// `ssh_config_path` carries a usable default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Machine image to launch, e.g. `"ami-0abcdef1234567890"`.
    pub image_id: String,
    /// Security group applied to every instance, e.g. `"sg-0123456789abcdef0"`.
    pub security_group_id: String,
    /// Login user for the SSH session, e.g. `"ubuntu"`.
    pub ssh_user: String,
    /// Instance size, e.g. `"t3.medium"`.
    pub instance_type: String,
    /// SSH client config file that receives managed host entries.
    pub ssh_config_path: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            image_id: String::new(),
            security_group_id: String::new(),
            ssh_user: String::new(),
            instance_type: String::new(),
            ssh_config_path: DEFAULT_SSH_CONFIG.to_string(),
        }
    }
}

impl GlobalConfig {
    /// Names of required fields that are currently empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.image_id.trim().is_empty() {
            missing.push("image id");
        }
        if self.security_group_id.trim().is_empty() {
            missing.push("security group id");
        }
        if self.ssh_user.trim().is_empty() {
            missing.push("ssh user");
        }
        if self.instance_type.trim().is_empty() {
            missing.push("instance type");
        }
        missing
    }

    /// Validates that every required field is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Incomplete`] naming the empty fields.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::Incomplete {
                missing: missing.join(", "),
            }
            .into());
        }
        Ok(())
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
