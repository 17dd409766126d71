//! Infrastructure: production implementations of the application ports.

pub mod config_store;
pub mod ec2;
pub mod keys;
pub mod project_store;
pub mod session;
pub mod ssh_config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::Sleeper;

/// Base directory for all Outpost state (`~/.outpost`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn outpost_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".outpost"))
}

/// Expands a leading `~/` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path starts with `~/` and the home directory
/// cannot be determined.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(path))
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(unix)]
pub(crate) fn set_permissions(path: &std::path::Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    use anyhow::Context as _;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("set permissions on {}", path.display()))
}

#[cfg(not(unix))]
pub(crate) fn set_permissions(_path: &std::path::Path, _mode: u32) -> Result<()> {
    Ok(())
}
