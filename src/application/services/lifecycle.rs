//! Lifecycle orchestrator — the init / start / delete use-cases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits; commands wire in the
//! production implementations, tests wire in doubles.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::application::ports::{
    CloudProvider, HostRegistry, InstanceSpec, KeyStore, ProgressReporter, ProjectStore,
    SessionRunner, Sleeper,
};
use crate::application::services::reachability::{self, PollOutcome, RetryPolicy};
use crate::domain::config::GlobalConfig;
use crate::domain::error::{LifecycleError, ProjectError};
use crate::domain::project::{self, Project};

/// Upper bounds on provider state waits.
///
/// The provider's own waiters poll server-side; these limits cap how long
/// the orchestrator lets any one of them run before giving up.
#[derive(Debug, Clone, Copy)]
pub struct WaitLimits {
    /// Limit on the wait for `running`.
    pub running: Duration,
    /// Limit on the wait for `stopped`.
    pub stopped: Duration,
    /// Limit on the wait for `terminated`.
    pub terminated: Duration,
}

impl Default for WaitLimits {
    fn default() -> Self {
        let ten_minutes = Duration::from_secs(600);
        Self {
            running: ten_minutes,
            stopped: ten_minutes,
            terminated: ten_minutes,
        }
    }
}

/// Create a project and its instance, then delegate to [`start_project`].
///
/// # Errors
///
/// Fails with `AlreadyExists` if a record is present, `ConfigIncomplete`
/// if a required configuration field is empty (checked before any provider
/// call), or any provider/start error.
#[allow(clippy::too_many_arguments)] // one parameter per injected port, as the ports are independent
pub async fn init_project(
    provider: &impl CloudProvider,
    store: &impl ProjectStore,
    keys: &impl KeyStore,
    hosts: &impl HostRegistry,
    session: &impl SessionRunner,
    sleeper: &impl Sleeper,
    reporter: &impl ProgressReporter,
    config: &GlobalConfig,
    policy: RetryPolicy,
    limits: WaitLimits,
    name: &str,
) -> Result<()> {
    project::validate_name(name)?;
    if store.load(name)?.is_some() {
        return Err(ProjectError::AlreadyExists(name.to_string()).into());
    }
    config.ensure_complete()?;

    if !keys.exists() {
        reporter.step("provisioning key pair...");
        let material = provider
            .create_key_pair(keys.key_name())
            .await
            .context("creating key pair")?;
        keys.write_material(&material)
            .context("writing private key")?;
    }

    reporter.step("creating instance...");
    let spec = InstanceSpec {
        image_id: &config.image_id,
        instance_type: &config.instance_type,
        key_name: keys.key_name(),
        security_group_id: &config.security_group_id,
    };
    let instance_id = provider
        .create_instance(&spec)
        .await
        .context("creating instance")?;

    store.create(&Project {
        name: name.to_string(),
        instance_id: instance_id.clone(),
        ssh_user: config.ssh_user.clone(),
        created_at: Utc::now(),
    })?;
    reporter.success(&format!("project '{name}' created (instance {instance_id})"));

    start_project(
        provider, store, hosts, session, sleeper, reporter, policy, limits, name,
    )
    .await
}

/// Start the project's instance, wait for reachability, hand off an
/// interactive session, then stop the instance on session exit.
///
/// # Errors
///
/// Fails with `NotFound` if no record exists, `Unreachable` if the
/// reachability poll exhausts (the instance stays running and the host
/// entry stays registered), or any provider error.
#[allow(clippy::too_many_arguments)] // one parameter per injected port, as the ports are independent
pub async fn start_project(
    provider: &impl CloudProvider,
    store: &impl ProjectStore,
    hosts: &impl HostRegistry,
    session: &impl SessionRunner,
    sleeper: &impl Sleeper,
    reporter: &impl ProgressReporter,
    policy: RetryPolicy,
    limits: WaitLimits,
    name: &str,
) -> Result<()> {
    let record = store
        .load(name)?
        .ok_or_else(|| ProjectError::NotFound(name.to_string()))?;
    let id = &record.instance_id;

    reporter.step("starting instance...");
    provider
        .start_instance(id)
        .await
        .context("starting instance")?;
    bounded_wait("running", limits.running, provider.wait_running(id)).await?;

    let address = provider
        .public_address(id)
        .await
        .context("resolving public address")?;
    hosts.add_host(name, &record.ssh_user, &address)?;
    reporter.step(&format!("registered host entry '{name}' -> {address}"));

    reporter.step("waiting for reachability checks...");
    let outcome = reachability::poll(policy, sleeper, || provider.reachability_passed(id)).await?;
    match outcome {
        PollOutcome::Exhausted => {
            // No stop and no deregistration on timeout: the instance
            // stays running and the host entry stays registered.
            return Err(LifecycleError::Unreachable {
                project: name.to_string(),
                attempts: policy.max_attempts,
            }
            .into());
        }
        PollOutcome::Passed { attempts } => {
            reporter.success(&format!("instance reachable (attempt {attempts})"));
        }
    }

    // Suspension point: the terminal belongs to the remote session until
    // it ends. No reporter step here, a live spinner would fight the
    // session for the terminal.
    let status = session.open(name).await.context("opening session")?;
    if !status.success() {
        // Non-fatal: the lifecycle proceeds to cleanup however the
        // session ended.
        reporter.warn(&format!("session ended with {status}"));
    }

    hosts.delete_host(name)?;
    reporter.step("stopping instance...");
    provider.stop_instance(id).await.context("stopping instance")?;
    bounded_wait("stopped", limits.stopped, provider.wait_stopped(id)).await?;
    reporter.success("instance stopped");
    Ok(())
}

/// Terminate the project's instance and remove its record.
///
/// Performs no SSH config cleanup; delete is not expected to run while a
/// session is active.
///
/// # Errors
///
/// Fails with `NotFound` if no record exists, or any provider error.
pub async fn delete_project(
    provider: &impl CloudProvider,
    store: &impl ProjectStore,
    reporter: &impl ProgressReporter,
    limits: WaitLimits,
    name: &str,
) -> Result<()> {
    let record = store
        .load(name)?
        .ok_or_else(|| ProjectError::NotFound(name.to_string()))?;

    reporter.step("terminating instance...");
    provider
        .terminate_instance(&record.instance_id)
        .await
        .context("terminating instance")?;
    bounded_wait(
        "terminated",
        limits.terminated,
        provider.wait_terminated(&record.instance_id),
    )
    .await?;

    store.remove(name)?;
    reporter.success(&format!("project '{name}' removed"));
    Ok(())
}

/// Run a provider wait under a hard time limit and Ctrl-C cancellation.
async fn bounded_wait<T>(
    what: &str,
    limit: Duration,
    wait: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        res = tokio::time::timeout(limit, wait) => match res {
            Ok(inner) => inner.with_context(|| format!("waiting for instance to become {what}")),
            Err(_) => anyhow::bail!(
                "timed out after {}s waiting for instance to become {what}",
                limit.as_secs()
            ),
        },
        _ = tokio::signal::ctrl_c() => {
            anyhow::bail!("interrupted while waiting for instance to become {what}")
        }
    }
}
