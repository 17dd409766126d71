//! `outpost delete <project>`: terminate the instance and remove the
//! project record.

use anyhow::Result;

use crate::application::services::lifecycle::{self, WaitLimits};
use crate::infra::ec2::AwsCliProvider;
use crate::infra::project_store::JsonProjectStore;
use crate::output::{OutputContext, TerminalReporter};

/// Run `outpost delete <project>`.
///
/// # Errors
///
/// Returns an error if the project does not exist or termination fails.
pub async fn run(ctx: &OutputContext, project: &str) -> Result<()> {
    let store = JsonProjectStore::new()?;
    let reporter = TerminalReporter::new(ctx);

    lifecycle::delete_project(
        &AwsCliProvider,
        &store,
        &reporter,
        WaitLimits::default(),
        project,
    )
    .await
}
