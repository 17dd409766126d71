//! Cloud provider implementation over the `aws` CLI.
//!
//! Shells out to `aws ec2 …` with `--output json` and walks the response
//! with `serde_json`. Every operation the orchestrator needs is one CLI
//! verb; waiters map onto `aws ec2 wait …`, which polls server-side.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CloudProvider, InstanceSpec};
use crate::domain::instance::InstanceState;

/// Production provider, delegating to the `aws` binary.
pub struct AwsCliProvider;

impl AwsCliProvider {
    async fn run(&self, args: &[&str]) -> Result<Output> {
        tokio::process::Command::new("aws")
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to run aws {}", args.first().unwrap_or(&"")))
    }

    /// Run a command and parse its stdout as JSON, surfacing stderr on
    /// failure.
    async fn run_json(&self, args: &[&str]) -> Result<serde_json::Value> {
        let output = self.run(args).await?;
        ensure_success(&output, args)?;
        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("invalid JSON from aws {}", args.join(" ")))
    }

    /// Run a command for its side effect only.
    async fn run_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args).await?;
        ensure_success(&output, args)
    }
}

fn ensure_success(output: &Output, args: &[&str]) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "aws {} failed.\n{}",
            args.join(" "),
            stderr.trim()
        );
    }
    Ok(())
}

/// Extracts `KeyMaterial` from a `create-key-pair` response.
fn parse_key_material(response: &serde_json::Value) -> Result<String> {
    response
        .get("KeyMaterial")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("no KeyMaterial in create-key-pair response"))
}

/// Extracts the single instance id from a `run-instances` response.
fn parse_instance_id(response: &serde_json::Value) -> Result<String> {
    response
        .get("Instances")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|i| i.get("InstanceId"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("no InstanceId in run-instances response"))
}

/// Extracts the public address from a `describe-instances` response.
///
/// Prefers the public DNS name; falls back to the public IP. The address
/// is assigned fresh each time the instance enters running, so callers
/// must re-resolve after every start.
fn parse_public_address(response: &serde_json::Value) -> Result<String> {
    let instance = response
        .get("Reservations")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|r| r.get("Instances"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| anyhow::anyhow!("no instance in describe-instances response"))?;

    for field in ["PublicDnsName", "PublicIpAddress"] {
        if let Some(addr) = instance.get(field).and_then(|v| v.as_str())
            && !addr.is_empty()
        {
            return Ok(addr.to_string());
        }
    }

    let state = instance
        .get("State")
        .and_then(|s| s.get("Name"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    if InstanceState::parse(state).is_some_and(InstanceState::is_terminal) {
        anyhow::bail!("instance is terminated and can no longer be used");
    }
    anyhow::bail!("instance has no public address (state: {state})")
}

/// Whether a filtered `describe-instance-status` response is non-empty.
fn has_passing_status(response: &serde_json::Value) -> bool {
    response
        .get("InstanceStatuses")
        .and_then(|v| v.as_array())
        .is_some_and(|arr| !arr.is_empty())
}

impl CloudProvider for AwsCliProvider {
    async fn create_key_pair(&self, name: &str) -> Result<String> {
        let response = self
            .run_json(&["ec2", "create-key-pair", "--key-name", name, "--output", "json"])
            .await?;
        parse_key_material(&response)
    }

    async fn create_instance(&self, spec: &InstanceSpec<'_>) -> Result<String> {
        let response = self
            .run_json(&[
                "ec2",
                "run-instances",
                "--image-id",
                spec.image_id,
                "--count",
                "1",
                "--instance-type",
                spec.instance_type,
                "--key-name",
                spec.key_name,
                "--security-group-ids",
                spec.security_group_id,
                "--output",
                "json",
            ])
            .await?;
        parse_instance_id(&response)
    }

    async fn start_instance(&self, id: &str) -> Result<()> {
        self.run_checked(&["ec2", "start-instances", "--instance-ids", id])
            .await
    }

    async fn stop_instance(&self, id: &str) -> Result<()> {
        self.run_checked(&["ec2", "stop-instances", "--instance-ids", id])
            .await
    }

    async fn terminate_instance(&self, id: &str) -> Result<()> {
        self.run_checked(&["ec2", "terminate-instances", "--instance-ids", id])
            .await
    }

    async fn public_address(&self, id: &str) -> Result<String> {
        let response = self
            .run_json(&[
                "ec2",
                "describe-instances",
                "--instance-ids",
                id,
                "--output",
                "json",
            ])
            .await?;
        parse_public_address(&response)
    }

    async fn reachability_passed(&self, id: &str) -> Result<bool> {
        let response = self
            .run_json(&[
                "ec2",
                "describe-instance-status",
                "--instance-ids",
                id,
                "--filters",
                "Name=instance-status.reachability,Values=passed",
                "Name=system-status.reachability,Values=passed",
                "--output",
                "json",
            ])
            .await?;
        Ok(has_passing_status(&response))
    }

    async fn wait_running(&self, id: &str) -> Result<()> {
        self.run_checked(&["ec2", "wait", "instance-running", "--instance-ids", id])
            .await
    }

    async fn wait_stopped(&self, id: &str) -> Result<()> {
        self.run_checked(&["ec2", "wait", "instance-stopped", "--instance-ids", id])
            .await
    }

    async fn wait_terminated(&self, id: &str) -> Result<()> {
        self.run_checked(&["ec2", "wait", "instance-terminated", "--instance-ids", id])
            .await
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
