//! `outpost config`: interactively set the global configuration.

use anyhow::{Context, Result};

use crate::domain::config::GlobalConfig;
use crate::infra::config_store::JsonConfigStore;
use crate::output::OutputContext;

/// Run `outpost config`.
///
/// Prompts for each field in turn; blank input keeps the existing value.
///
/// # Errors
///
/// Returns an error if a prompt cannot be read or the file cannot be
/// written.
pub fn run(ctx: &OutputContext) -> Result<()> {
    let store = JsonConfigStore::new()?;
    let mut config = store.load()?;

    config.image_id = prompt_field("Image id", &config.image_id)?;
    config.security_group_id = prompt_field("Security group id", &config.security_group_id)?;
    config.ssh_user = prompt_field("SSH user", &config.ssh_user)?;
    config.instance_type = prompt_field("Instance type", &config.instance_type)?;
    config.ssh_config_path = prompt_field("SSH config path", &config.ssh_config_path)?;

    store.save(&config)?;
    ctx.success("Configuration saved.");
    report_completeness(ctx, &config);
    Ok(())
}

/// Prompt for one field, showing the current value; blank keeps it.
fn prompt_field(label: &str, current: &str) -> Result<String> {
    let prompt = if current.is_empty() {
        label.to_string()
    } else {
        format!("{label} [{current}]")
    };
    let input: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .context("reading input")?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn report_completeness(ctx: &OutputContext, config: &GlobalConfig) {
    let missing = config.missing_fields();
    if missing.is_empty() {
        ctx.kv("Next", "outpost init <project>");
    } else {
        ctx.warn(&format!(
            "Still unset: {}. 'outpost init' needs them all.",
            missing.join(", ")
        ));
    }
}
