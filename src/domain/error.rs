//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`. All error
//! types implement `thiserror::Error` and convert to `anyhow::Error` via
//! the `?` operator.

use thiserror::Error;

// ── Project errors ────────────────────────────────────────────────────────────

/// Errors related to project records and identity.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project '{0}' already exists. Remove it first: outpost delete {0}")]
    AlreadyExists(String),

    #[error("Project '{0}' not found. Create it with: outpost init {0}")]
    NotFound(String),

    #[error("Invalid project name '{0}': must match ^[a-z0-9]([a-z0-9-]{{0,61}}[a-z0-9])?$")]
    InvalidName(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the global configuration record.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration incomplete: {missing} not set.\n\nRun 'outpost config' to fill in the required values.")]
    Incomplete { missing: String },
}

// ── SSH config errors ─────────────────────────────────────────────────────────

/// Errors raised while parsing the SSH host-list file.
///
/// Raised before any mutation; a malformed file is never rewritten.
#[derive(Debug, Error)]
pub enum SshConfigError {
    #[error("Malformed SSH config block: expected 'Host <alias>', got '{line}'")]
    Malformed { line: String },
}

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Errors raised by the lifecycle orchestrator itself.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(
        "Instance did not pass reachability checks after {attempts} attempts.\n\
         The instance is still running and its SSH host entry is still registered.\n\
         Retry with 'outpost start {project}', or stop the instance manually."
    )]
    Unreachable { project: String, attempts: u32 },
}
