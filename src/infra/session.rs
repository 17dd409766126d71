//! Interactive SSH session handoff.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::SessionRunner;

/// Opens `ssh` against a managed host alias with inherited stdio.
///
/// Passes `-F <config>` explicitly so the session resolves the alias from
/// the same file the host entry was just written to, wherever the user
/// pointed `ssh_config_path`.
pub struct SshSession {
    config_path: PathBuf,
}

impl SshSession {
    /// Create a runner resolving aliases from `config_path`.
    #[must_use]
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }
}

impl SessionRunner for SshSession {
    /// Transfers the terminal to the remote session and blocks until it
    /// ends. Nothing else runs during this suspension; the exit status is
    /// returned for the caller to interpret.
    async fn open(&self, alias: &str) -> Result<std::process::ExitStatus> {
        tokio::process::Command::new("ssh")
            .arg("-F")
            .arg(&self.config_path)
            .arg(alias)
            .stdin(std::process::Stdio::inherit())
            .stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::inherit())
            .status()
            .await
            .context("failed to run ssh")
    }
}
