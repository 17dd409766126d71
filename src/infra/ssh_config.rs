//! SSH config transaction manager.
//!
//! Parses, mutates, and rewrites the host-alias configuration file
//! consumed by SSH clients. The file is shared with the user and editable
//! outside this tool, so unmanaged entries and their relative order must
//! survive every edit. Rewrites go through a temp file plus rename so a
//! crash mid-write cannot truncate the file.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::HostRegistry;
use crate::domain::error::SshConfigError;

/// One `Host` block: alias plus attribute pairs in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    /// Host alias; the project name for managed entries.
    pub alias: String,
    /// `<key> <value>` attribute pairs, order preserved.
    pub options: Vec<(String, String)>,
}

/// Manages host entries in an SSH client configuration file.
pub struct SshConfigManager {
    path: PathBuf,
    identity_file: PathBuf,
}

impl SshConfigManager {
    /// Creates a manager over `path`, registering entries that point at
    /// the managed private key at `identity_file`.
    #[must_use]
    pub fn new(path: PathBuf, identity_file: PathBuf) -> Self {
        Self {
            path,
            identity_file,
        }
    }

    /// Parses raw config text into ordered host entries.
    ///
    /// Blocks are split on blank lines. The first line of each block must
    /// be `Host <alias>`; each subsequent non-blank line is a
    /// `<key> <value>` pair.
    ///
    /// # Errors
    ///
    /// Returns [`SshConfigError::Malformed`] if a block does not start
    /// with a `Host` line. No mutation happens after a parse failure.
    pub fn parse(text: &str) -> Result<Vec<HostEntry>> {
        let mut entries = Vec::new();
        for block in text.split("\n\n") {
            let mut lines = block.lines().filter(|l| !l.trim().is_empty());
            let Some(first) = lines.next() else {
                continue;
            };
            let alias = match first.trim().split_once(char::is_whitespace) {
                Some(("Host", alias)) => alias.trim().to_string(),
                _ => {
                    return Err(SshConfigError::Malformed {
                        line: first.trim().to_string(),
                    }
                    .into());
                }
            };
            let mut options = Vec::new();
            for line in lines {
                let trimmed = line.trim();
                match trimmed.split_once(char::is_whitespace) {
                    Some((key, value)) => {
                        options.push((key.to_string(), value.trim().to_string()));
                    }
                    None => {
                        // A bare word inside a block carries no value;
                        // keep it so the round-trip stays lossless.
                        options.push((trimmed.to_string(), String::new()));
                    }
                }
            }
            entries.push(HostEntry { alias, options });
        }
        Ok(entries)
    }

    /// Serializes entries back to config text, the exact reverse of
    /// [`Self::parse`]: `Host <alias>` then two-space-indented
    /// `key value` lines, blocks blank-line separated, no trailing blank
    /// line after the last entry.
    #[must_use]
    pub fn render(entries: &[HostEntry]) -> String {
        let blocks: Vec<String> = entries
            .iter()
            .map(|e| {
                let mut out = format!("Host {}", e.alias);
                for (key, value) in &e.options {
                    out.push('\n');
                    if value.is_empty() {
                        out.push_str(&format!("  {key}"));
                    } else {
                        out.push_str(&format!("  {key} {value}"));
                    }
                }
                out
            })
            .collect();
        let mut text = blocks.join("\n\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    /// Reads and parses the config file. A missing file is an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn load(&self) -> Result<Vec<HostEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        Self::parse(&text)
    }

    /// Atomically replaces the config file with the rendered entries.
    ///
    /// Writes to a temp file in the target directory, then renames over
    /// the original.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the write
    /// or rename fails.
    fn write(&self, entries: &[HostEntry]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("{} has no parent directory", self.path.display()))?;
        std::fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        tmp.write_all(Self::render(entries).as_bytes())
            .context("writing ssh config")?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

impl HostRegistry for SshConfigManager {
    /// Appends a managed entry. No duplicate-alias check: a skipped
    /// cleanup can leave a stale entry behind, and `delete_host`'s
    /// remove-all semantics heal it on the next deregistration.
    fn add_host(&self, alias: &str, user: &str, hostname: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.push(HostEntry {
            alias: alias.to_string(),
            options: vec![
                ("HostName".to_string(), hostname.to_string()),
                (
                    "IdentityFile".to_string(),
                    self.identity_file.display().to_string(),
                ),
                ("User".to_string(), user.to_string()),
            ],
        });
        self.write(&entries)
    }

    /// Removes every entry aliased `alias`, leaving all other entries and
    /// their order untouched.
    fn delete_host(&self, alias: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.retain(|e| e.alias != alias);
        self.write(&entries)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
