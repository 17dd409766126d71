//! `outpost start <project>`: resume the instance and open a session.

use anyhow::Result;

use crate::application::services::lifecycle::{self, WaitLimits};
use crate::application::services::reachability::RetryPolicy;
use crate::infra::config_store::JsonConfigStore;
use crate::infra::ec2::AwsCliProvider;
use crate::infra::keys::ManagedKey;
use crate::infra::project_store::JsonProjectStore;
use crate::infra::session::SshSession;
use crate::infra::ssh_config::SshConfigManager;
use crate::infra::TokioSleeper;
use crate::output::{OutputContext, TerminalReporter};

/// Run `outpost start <project>`.
///
/// # Errors
///
/// Returns an error if the project does not exist, the instance never
/// passes reachability checks, or any provider call fails.
pub async fn run(ctx: &OutputContext, project: &str) -> Result<()> {
    let config = JsonConfigStore::new()?.load()?;
    let store = JsonProjectStore::new()?;
    let keys = ManagedKey::new()?;
    let ssh_config_path = crate::infra::expand_tilde(&config.ssh_config_path)?;
    let hosts = SshConfigManager::new(ssh_config_path.clone(), keys.path().to_path_buf());
    let session = SshSession::new(ssh_config_path);
    let reporter = TerminalReporter::new(ctx);

    lifecycle::start_project(
        &AwsCliProvider,
        &store,
        &hosts,
        &session,
        &TokioSleeper,
        &reporter,
        RetryPolicy::reachability(),
        WaitLimits::default(),
        project,
    )
    .await
}
