//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::time::Duration;

use anyhow::Result;

use crate::domain::project::Project;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Launch parameters for creating a new instance. Struct-based to avoid
/// breaking test doubles on future parameter additions.
pub struct InstanceSpec<'a> {
    /// Machine image, e.g. `"ami-0abcdef1234567890"`.
    pub image_id: &'a str,
    /// Instance size, e.g. `"t3.medium"`.
    pub instance_type: &'a str,
    /// Name of the provider key pair used for SSH access.
    pub key_name: &'a str,
    /// Security group applied to the instance.
    pub security_group_id: &'a str,
}

// ── Cloud Provider Port ───────────────────────────────────────────────────────

/// Capability surface of the cloud compute provider.
///
/// Exactly the operations the orchestrator uses, nothing more. The
/// production implementation shells out to the provider CLI; tests supply
/// scripted doubles.
#[allow(async_fn_in_trait)]
pub trait CloudProvider {
    /// Create a key pair and return its private key material.
    async fn create_key_pair(&self, name: &str) -> Result<String>;

    /// Launch exactly one instance and return its id.
    async fn create_instance(&self, spec: &InstanceSpec<'_>) -> Result<String>;

    /// Start the instance. Safe to call when it is already running.
    async fn start_instance(&self, id: &str) -> Result<()>;

    /// Stop the instance.
    async fn stop_instance(&self, id: &str) -> Result<()>;

    /// Terminate the instance. Terminated is a sink state.
    async fn terminate_instance(&self, id: &str) -> Result<()>;

    /// Resolve the instance's current public address.
    ///
    /// Only meaningful while the instance is running; the address is
    /// assigned fresh on every stop/start cycle.
    async fn public_address(&self, id: &str) -> Result<String>;

    /// Whether both instance and system reachability checks pass.
    ///
    /// A single status probe, not a wait: returns `false` when the
    /// provider reports no passing status yet.
    async fn reachability_passed(&self, id: &str) -> Result<bool>;

    /// Block until the provider reports the instance running.
    async fn wait_running(&self, id: &str) -> Result<()>;

    /// Block until the provider reports the instance stopped.
    async fn wait_stopped(&self, id: &str) -> Result<()>;

    /// Block until the provider reports the instance terminated.
    async fn wait_terminated(&self, id: &str) -> Result<()>;
}

// ── Project Store Port ────────────────────────────────────────────────────────

/// Durable project-name to record mapping. Create/read/delete only;
/// records
/// are never updated in place.
pub trait ProjectStore {
    /// Load the record for `name`, returning `None` if absent.
    fn load(&self, name: &str) -> Result<Option<Project>>;

    /// Persist a freshly created record.
    fn create(&self, project: &Project) -> Result<()>;

    /// Remove the record for `name`. Not an error if absent.
    fn remove(&self, name: &str) -> Result<()>;
}

// ── SSH Host Registry Port ────────────────────────────────────────────────────

/// Managed host-entry registration in the SSH client configuration.
pub trait HostRegistry {
    /// Append a managed entry for `alias` pointing at `hostname`.
    ///
    /// Does not check for a pre-existing entry with the same alias;
    /// `delete_host`'s remove-all semantics self-heal duplicates.
    fn add_host(&self, alias: &str, user: &str, hostname: &str) -> Result<()>;

    /// Remove every entry whose alias equals `alias`.
    fn delete_host(&self, alias: &str) -> Result<()>;
}

// ── Managed Key Port ──────────────────────────────────────────────────────────

/// The managed private key, provisioned once and reused by every project.
pub trait KeyStore {
    /// Provider-side name of the managed key pair.
    fn key_name(&self) -> &str;

    /// Whether the private key file already exists locally.
    fn exists(&self) -> bool;

    /// Write freshly created key material, restricted to owner-read-only.
    fn write_material(&self, material: &str) -> Result<()>;
}

// ── Session Port ──────────────────────────────────────────────────────────────

/// Interactive secure-shell session handoff.
#[allow(async_fn_in_trait)]
pub trait SessionRunner {
    /// Transfer the terminal to a session against `alias` and block until
    /// it ends, returning the session's exit status.
    async fn open(&self, alias: &str) -> Result<std::process::ExitStatus>;
}

// ── Clock Port ────────────────────────────────────────────────────────────────

/// Abstracts delay so polling loops can be tested without real time.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    /// Sleep for `duration`.
    async fn sleep(&self, duration: Duration);
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
