//! Project record persistence: one JSON file per project.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ProjectStore;
use crate::domain::project::Project;

/// Stores project records under `~/.outpost/projects/<name>.json`.
pub struct JsonProjectStore {
    dir: PathBuf,
}

impl JsonProjectStore {
    /// Create a store using the default directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_dir(crate::infra::outpost_dir()?.join("projects")))
    }

    /// Create a store with an explicit directory (used in tests).
    #[must_use]
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ProjectStore for JsonProjectStore {
    fn load(&self, name: &str) -> Result<Option<Project>> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading project record {}", path.display()))?;
        let project: Project = serde_json::from_str(&content)
            .with_context(|| format!("parsing project record {}", path.display()))?;
        Ok(Some(project))
    }

    fn create(&self, project: &Project) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating directory {}", self.dir.display()))?;
        let path = self.record_path(&project.name);
        let content = serde_json::to_string_pretty(project).context("serializing project")?;
        std::fs::write(&path, &content)
            .with_context(|| format!("writing project record {}", path.display()))?;
        crate::infra::set_permissions(&path, 0o600)?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.record_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("removing project record {}", path.display()))?;
        }
        Ok(())
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
