//! End-to-end CLI tests covering spec.md §8's testable scenarios.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vaultenv() -> Command {
    Command::cargo_bin("vaultenv").unwrap()
}

#[test]
fn init_creates_key_and_manifest() {
    let dir = TempDir::new().unwrap();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project initialised"));

    assert!(dir.path().join(".vaultenv/key").exists());
    assert!(dir.path().join(".vaultenv/manifest.enc").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dir.path().join(".vaultenv/key"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn double_init_fails() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().failure();
}

#[test]
fn set_get_round_trip() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("set")
        .arg("API_KEY")
        .arg("sk-test-123")
        .assert()
        .success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("get")
        .arg("API_KEY")
        .arg("--reveal")
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-test-123"));

    // Without --reveal the value is masked.
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("get")
        .arg("API_KEY")
        .assert()
        .success()
        .stdout(predicate::str::contains("********"));
}

#[test]
fn get_missing_key_fails() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("get")
        .arg("NOPE")
        .assert()
        .failure();
}

#[test]
fn scope_isolation_via_cli() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("set")
        .arg("DB_URL")
        .arg("dev-db")
        .arg("--scope")
        .arg("development")
        .assert()
        .success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("set")
        .arg("DB_URL")
        .arg("prod-db")
        .arg("--scope")
        .arg("production")
        .assert()
        .success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("get")
        .arg("DB_URL")
        .arg("--scope")
        .arg("development")
        .arg("--reveal")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev-db"));

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("get")
        .arg("DB_URL")
        .arg("--scope")
        .arg("production")
        .arg("--reveal")
        .assert()
        .success()
        .stdout(predicate::str::contains("prod-db"));
}

#[test]
fn rm_reports_when_key_was_not_set() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("rm")
        .arg("NEVER_SET")
        .assert()
        .success()
        .stdout(predicate::str::contains("was not set"));
}

#[test]
fn rotate_changes_key_fingerprint() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("set")
        .arg("K")
        .arg("V")
        .assert()
        .success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("rotate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Key rotated"));

    // The manifest is still readable after rotation.
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("get")
        .arg("K")
        .arg("--reveal")
        .assert()
        .success()
        .stdout(predicate::str::contains("V"));
}

#[test]
fn run_injects_resolved_variables_and_propagates_exit_code() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("set")
        .arg("GREETING")
        .arg("hello-from-vaultenv")
        .assert()
        .success();

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("run")
        .arg("sh")
        .arg("-c")
        .arg("echo $GREETING")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-from-vaultenv"));

    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("run")
        .arg("sh")
        .arg("-c")
        .arg("exit 7")
        .assert()
        .code(7);
}

#[test]
fn doctor_reports_missing_project_as_an_issue() {
    let dir = TempDir::new().unwrap();
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs attention"));
}

#[test]
fn doctor_is_healthy_after_init() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Excellent"));
}

#[test]
fn push_without_cloud_link_fails_clearly() {
    let dir = TempDir::new().unwrap();
    vaultenv().arg("--path").arg(dir.path()).arg("init").assert().success();
    vaultenv()
        .arg("--path")
        .arg(dir.path())
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not cloud-linked"));
}
