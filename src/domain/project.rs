//! Project record: one per named project, bound to a single instance.

use std::sync::LazyLock;

use anyhow::Result;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ProjectError;

#[allow(clippy::expect_used)] // pattern is a compile-time constant
static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex")
});

/// Durable per-project record, stored as one JSON file per project.
///
/// Created by `init`, never mutated, removed by `delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project name, doubling as the record key and the SSH host alias.
    pub name: String,
    /// Instance backing this project. Assigned once at creation.
    pub instance_id: String,
    /// Login user resolved from the global configuration at creation.
    pub ssh_user: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Validates a project name.
///
/// Names double as SSH host aliases and file names, so they are restricted
/// to lowercase alphanumerics and interior dashes, max 63 characters.
///
/// # Errors
///
/// Returns [`ProjectError::InvalidName`] if the name does not match.
pub fn validate_name(name: &str) -> Result<()> {
    if !PROJECT_NAME.is_match(name) {
        return Err(ProjectError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
