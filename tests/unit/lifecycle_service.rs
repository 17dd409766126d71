//! Unit tests for the lifecycle orchestrator services.
//!
//! Provider, session, sleeper, and reporter are doubles from
//! `crate::mocks`; the file-backed ports run for real against temp dirs.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use chrono::Utc;
use outpost_cli::application::ports::{HostRegistry, KeyStore, ProjectStore};
use outpost_cli::application::services::lifecycle::{self, WaitLimits};
use outpost_cli::application::services::reachability::RetryPolicy;
use outpost_cli::domain::config::GlobalConfig;
use outpost_cli::domain::project::Project;
use outpost_cli::infra::keys::ManagedKey;
use outpost_cli::infra::project_store::JsonProjectStore;
use outpost_cli::infra::ssh_config::SshConfigManager;
use tempfile::TempDir;

use crate::mocks::{FakeProvider, FakeSession, InstantSleeper, RecordingReporter};

// ── Fixture ───────────────────────────────────────────────────────────────────

struct Fixture {
    _dir: TempDir,
    store: JsonProjectStore,
    keys: ManagedKey,
    hosts: SshConfigManager,
    ssh_config_path: PathBuf,
    config: GlobalConfig,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("tempdir");
    let ssh_config_path = dir.path().join("ssh_config");
    let key_path = dir.path().join("keys").join("outpost.pem");
    let config = GlobalConfig {
        image_id: "img-1".to_string(),
        security_group_id: "sg-1".to_string(),
        ssh_user: "ubuntu".to_string(),
        instance_type: "small".to_string(),
        ssh_config_path: ssh_config_path.display().to_string(),
    };
    Fixture {
        store: JsonProjectStore::with_dir(dir.path().join("projects")),
        keys: ManagedKey::with_path(key_path.clone()),
        hosts: SshConfigManager::new(ssh_config_path.clone(), key_path),
        ssh_config_path,
        config,
        _dir: dir,
    }
}

fn seed_record(fx: &Fixture, name: &str, ssh_user: &str) {
    fx.store
        .create(&Project {
            name: name.to_string(),
            instance_id: "i-test0001".to_string(),
            ssh_user: ssh_user.to_string(),
            created_at: Utc::now(),
        })
        .expect("seed record");
}

fn aliases(fx: &Fixture) -> Vec<String> {
    fx.hosts
        .load()
        .expect("load ssh config")
        .into_iter()
        .map(|e| e.alias)
        .collect()
}

async fn run_init(fx: &Fixture, provider: &FakeProvider, session: &FakeSession) -> anyhow::Result<()> {
    lifecycle::init_project(
        provider,
        &fx.store,
        &fx.keys,
        &fx.hosts,
        session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        &fx.config,
        RetryPolicy::reachability(),
        WaitLimits::default(),
        "demo",
    )
    .await
}

async fn run_start(
    fx: &Fixture,
    provider: &FakeProvider,
    session: &FakeSession,
    sleeper: &InstantSleeper,
    reporter: &RecordingReporter,
    name: &str,
) -> anyhow::Result<()> {
    lifecycle::start_project(
        provider,
        &fx.store,
        &fx.hosts,
        session,
        sleeper,
        reporter,
        RetryPolicy::reachability(),
        WaitLimits::default(),
        name,
    )
    .await
}

// ── init ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_init_provisions_key_creates_instance_and_persists_record() {
    let fx = fixture();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    run_init(&fx, &provider, &session).await.expect("init");

    assert!(fx.keys.exists(), "key file must be written");
    let record = fx
        .store
        .load("demo")
        .expect("load")
        .expect("record must exist");
    assert_eq!(record.instance_id, "i-test0001");
    assert_eq!(record.ssh_user, "ubuntu");
    assert!(
        provider
            .calls()
            .contains(&"create-key-pair outpost".to_string()),
        "calls: {:?}",
        provider.calls()
    );
}

#[tokio::test]
async fn test_init_passes_configured_values_to_provider() {
    let fx = fixture();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    run_init(&fx, &provider, &session).await.expect("init");

    assert!(
        provider
            .calls()
            .contains(&"run-instances img-1 small outpost sg-1".to_string()),
        "calls: {:?}",
        provider.calls()
    );
}

#[tokio::test]
async fn test_init_delegates_to_start_and_ends_stopped() {
    let fx = fixture();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    run_init(&fx, &provider, &session).await.expect("init");

    assert_eq!(session.opened.borrow().as_slice(), ["demo".to_string()]);
    assert_eq!(provider.instance_state().as_deref(), Some("stopped"));
    assert!(aliases(&fx).is_empty(), "host entry must be deregistered");
}

#[tokio::test]
async fn test_init_fails_when_project_already_exists() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    let err = run_init(&fx, &provider, &session)
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("already exists"), "got: {err}");
    assert!(provider.calls().is_empty(), "no provider call may happen");
}

#[tokio::test]
async fn test_init_fails_when_config_incomplete_before_any_provider_call() {
    let mut fx = fixture();
    fx.config.image_id = String::new();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    let err = run_init(&fx, &provider, &session)
        .await
        .expect_err("must fail");
    assert!(
        err.to_string().contains("Configuration incomplete"),
        "got: {err}"
    );
    assert!(err.to_string().contains("outpost config"), "got: {err}");
    assert!(provider.calls().is_empty());
    assert!(fx.store.load("demo").expect("load").is_none());
}

#[tokio::test]
async fn test_init_reuses_existing_key_file() {
    let fx = fixture();
    fx.keys
        .write_material("existing key material")
        .expect("seed key");
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    run_init(&fx, &provider, &session).await.expect("init");

    assert!(
        !provider.calls().iter().any(|c| c.starts_with("create-key-pair")),
        "key pair must not be recreated: {:?}",
        provider.calls()
    );
}

#[tokio::test]
async fn test_init_rejects_invalid_project_name() {
    let fx = fixture();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    let err = lifecycle::init_project(
        &provider,
        &fx.store,
        &fx.keys,
        &fx.hosts,
        &session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        &fx.config,
        RetryPolicy::reachability(),
        WaitLimits::default(),
        "Bad/Name",
    )
    .await
    .expect_err("must fail");
    assert!(err.to_string().contains("Invalid project name"), "got: {err}");
    assert!(provider.calls().is_empty());
}

// ── start ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_fails_when_project_not_found() {
    let fx = fixture();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    let err = run_start(
        &fx,
        &provider,
        &session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        "ghost",
    )
    .await
    .expect_err("must fail");
    assert!(err.to_string().contains("not found"), "got: {err}");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_start_registers_entry_for_session_then_cleans_up() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::with_existing_instance("stopped");
    let session = FakeSession::observing(fx.ssh_config_path.clone());

    run_start(
        &fx,
        &provider,
        &session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        "demo",
    )
    .await
    .expect("start");

    let during = session.observed.borrow().clone().expect("snapshot taken");
    assert!(during.contains("Host demo"), "during session: {during}");
    assert!(
        during.contains("HostName host-i-test0001"),
        "during session: {during}"
    );
    assert!(during.contains("User ubuntu"), "during session: {during}");
    assert!(during.contains("IdentityFile"), "during session: {during}");

    assert!(aliases(&fx).is_empty(), "entry must be removed after session");
    assert_eq!(provider.instance_state().as_deref(), Some("stopped"));
}

#[tokio::test]
async fn test_start_orders_provider_calls() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::with_existing_instance("stopped");
    let session = FakeSession::succeeding();

    run_start(
        &fx,
        &provider,
        &session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        "demo",
    )
    .await
    .expect("start");

    assert_eq!(
        provider.calls(),
        vec![
            "start-instances i-test0001".to_string(),
            "wait running i-test0001".to_string(),
            "describe-instances i-test0001".to_string(),
            "stop-instances i-test0001".to_string(),
            "wait stopped i-test0001".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_start_uses_stored_ssh_user_not_current_config() {
    // The record's user was resolved at init time; later config edits
    // must not leak into existing projects.
    let fx = fixture();
    seed_record(&fx, "demo", "ec2-user");
    let provider = FakeProvider::new();
    let session = FakeSession::observing(fx.ssh_config_path.clone());

    run_start(
        &fx,
        &provider,
        &session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        "demo",
    )
    .await
    .expect("start");

    let during = session.observed.borrow().clone().expect("snapshot taken");
    assert!(during.contains("User ec2-user"), "during session: {during}");
}

#[tokio::test]
async fn test_start_polls_until_reachable_sleeping_between_probes() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::passing_after(5);
    let session = FakeSession::succeeding();
    let sleeper = InstantSleeper::default();

    run_start(
        &fx,
        &provider,
        &session,
        &sleeper,
        &RecordingReporter::default(),
        "demo",
    )
    .await
    .expect("start");

    assert_eq!(provider.probes_made(), 6, "5 failing probes + 1 passing");
    assert_eq!(sleeper.count.get(), 5, "one sleep per failing probe");
}

#[tokio::test]
async fn test_start_unreachable_leaves_instance_running_and_entry_registered() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::unreachable();
    let session = FakeSession::succeeding();
    let sleeper = InstantSleeper::default();

    let err = run_start(
        &fx,
        &provider,
        &session,
        &sleeper,
        &RecordingReporter::default(),
        "demo",
    )
    .await
    .expect_err("must fail");

    assert!(err.to_string().contains("40 attempts"), "got: {err}");
    assert_eq!(provider.probes_made(), 40);
    assert_eq!(sleeper.count.get(), 39, "no sleep after the final probe");
    // Documented gap, not auto-remediated: the instance keeps running and
    // the host entry stays registered.
    assert_eq!(provider.instance_state().as_deref(), Some("running"));
    assert_eq!(aliases(&fx), vec!["demo".to_string()]);
    assert!(session.opened.borrow().is_empty(), "no session on timeout");
    assert!(
        !provider
            .calls()
            .iter()
            .any(|c| c.starts_with("stop-instances")),
        "stop must not be called"
    );
}

#[tokio::test]
async fn test_start_session_failure_is_nonfatal_and_cleanup_runs() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::new();
    let session = FakeSession::with_exit_code(255);
    let reporter = RecordingReporter::default();

    run_start(
        &fx,
        &provider,
        &session,
        &InstantSleeper::default(),
        &reporter,
        "demo",
    )
    .await
    .expect("session failure must not fail the lifecycle");

    assert!(
        reporter
            .warnings
            .borrow()
            .iter()
            .any(|w| w.contains("session ended")),
        "warnings: {:?}",
        reporter.warnings.borrow()
    );
    assert!(aliases(&fx).is_empty(), "cleanup must still deregister");
    assert_eq!(provider.instance_state().as_deref(), Some("stopped"));
}

#[tokio::test]
async fn test_start_preserves_unmanaged_entries() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    std::fs::write(
        &fx.ssh_config_path,
        "Host bastion\n  HostName bastion.example.com\n  Port 2222\n  User admin\n",
    )
    .expect("seed ssh config");
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    run_start(
        &fx,
        &provider,
        &session,
        &InstantSleeper::default(),
        &RecordingReporter::default(),
        "demo",
    )
    .await
    .expect("start");

    let entries = fx.hosts.load().expect("load");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].alias, "bastion");
    assert_eq!(
        entries[0].options,
        vec![
            ("HostName".to_string(), "bastion.example.com".to_string()),
            ("Port".to_string(), "2222".to_string()),
            ("User".to_string(), "admin".to_string()),
        ]
    );
}

// ── delete ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_terminates_instance_and_removes_record() {
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    let provider = FakeProvider::with_existing_instance("stopped");

    lifecycle::delete_project(
        &provider,
        &fx.store,
        &RecordingReporter::default(),
        WaitLimits::default(),
        "demo",
    )
    .await
    .expect("delete");

    assert_eq!(provider.instance_state().as_deref(), Some("terminated"));
    assert!(
        provider
            .calls()
            .contains(&"wait terminated i-test0001".to_string())
    );
    assert!(fx.store.load("demo").expect("load").is_none());
}

#[tokio::test]
async fn test_delete_fails_when_project_not_found() {
    let fx = fixture();
    let provider = FakeProvider::new();

    let err = lifecycle::delete_project(
        &provider,
        &fx.store,
        &RecordingReporter::default(),
        WaitLimits::default(),
        "ghost",
    )
    .await
    .expect_err("must fail");
    assert!(err.to_string().contains("not found"), "got: {err}");
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_delete_performs_no_ssh_config_cleanup() {
    // By contract delete is not expected to run while a session is
    // active, so a leftover entry is left exactly as found.
    let fx = fixture();
    seed_record(&fx, "demo", "ubuntu");
    fx.hosts
        .add_host("demo", "ubuntu", "host-stale")
        .expect("seed entry");
    let provider = FakeProvider::with_existing_instance("running");

    lifecycle::delete_project(
        &provider,
        &fx.store,
        &RecordingReporter::default(),
        WaitLimits::default(),
        "demo",
    )
    .await
    .expect("delete");

    assert_eq!(aliases(&fx), vec!["demo".to_string()]);
}

// ── end-to-end property ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_init_then_delete_leaves_no_record_and_no_host_entry() {
    let fx = fixture();
    let provider = FakeProvider::new();
    let session = FakeSession::succeeding();

    run_init(&fx, &provider, &session).await.expect("init");
    lifecycle::delete_project(
        &provider,
        &fx.store,
        &RecordingReporter::default(),
        WaitLimits::default(),
        "demo",
    )
    .await
    .expect("delete");

    assert!(fx.store.load("demo").expect("load").is_none());
    assert!(aliases(&fx).is_empty());
    assert_eq!(provider.instance_state().as_deref(), Some("terminated"));
}
