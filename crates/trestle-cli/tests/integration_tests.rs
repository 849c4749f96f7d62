//! Integration tests for trestle-cli.
//!
//! Every test runs inside its own temp directory with `HOME` and
//! `XDG_CONFIG_HOME` pointing there, so no user config leaks in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn trestle(dir: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("trestle");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TRESTLE_TEMPLATES_DIR")
        .env_remove("TRESTLE_DEFAULTS__DATABASE")
        .env_remove("TRESTLE_LOG_FILE");
    cmd
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rails"))
        .stdout(predicate::str::contains("new"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--skip-deploy"))
        .stdout(predicate::str::contains("--css-framework"));
}

#[test]
fn test_no_arguments_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path()).assert().failure().code(2);
}

// ── new ───────────────────────────────────────────────────────────────────────

#[test]
fn test_new_dry_run_prints_plan_without_side_effects() {
    let temp = TempDir::new().unwrap();

    trestle(temp.path())
        .args(["new", "shop", "--dry-run", "--skip-git", "--skip-deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("customize_gemfile"))
        .stdout(predicate::str::contains("create_deploy_apps"));

    assert!(!temp.path().join("shop").exists());
}

#[test]
fn test_new_dry_run_json() {
    let temp = TempDir::new().unwrap();

    let assert = trestle(temp.path())
        .args([
            "--output-format",
            "json",
            "new",
            "shop",
            "--dry-run",
            "-C",
            "bootstrap",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let steps = doc["steps"].as_array().unwrap();
    assert!(steps.iter().any(|s| s["name"] == "setup_css_framework"));
    assert!(doc["missing_tools"].is_array());
    assert!(!temp.path().join("shop").exists());
}

#[test]
fn test_new_rejects_invalid_app_name() {
    let temp = TempDir::new().unwrap();

    trestle(temp.path())
        .args(["new", "9lives", "--dry-run"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("9lives"));
}

#[test]
fn test_new_project_already_exists() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("shop")).unwrap();

    trestle(temp.path())
        .args(["new", "shop", "--yes", "--skip-git", "--skip-deploy"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_new_skip_base_needs_existing_project() {
    let temp = TempDir::new().unwrap();

    trestle(temp.path())
        .args([
            "new",
            "shop",
            "--skip-base",
            "--yes",
            "--skip-git",
            "--skip-deploy",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--skip-base"));

    assert!(!temp.path().join("shop").exists());
}

#[test]
fn test_new_uses_config_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".trestle.toml"),
        "[defaults]\ndatabase = \"mysql\"\n",
    )
    .unwrap();

    // mysql has no database.yml template arm, so the plan lists no render.
    trestle(temp.path())
        .args(["new", "shop", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postgresql.yml").not());
}

// ── setup ─────────────────────────────────────────────────────────────────────

#[test]
fn test_setup_requires_directory() {
    let temp = TempDir::new().unwrap();

    trestle(temp.path())
        .args(["setup", "missing"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Not a project directory"));
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn test_list_steps() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["list", "steps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Steps in the 'scaffold' pipeline"))
        .stdout(predicate::str::contains("initial_commit"));
}

#[test]
fn test_list_setup_steps_as_list() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["list", "steps", "--pipeline", "setup", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customize_gemfile").not());
}

#[test]
fn test_list_templates_csv() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["list", "templates", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,lines,parameterized"))
        .stdout(predicate::str::contains("gitignore"));
}

// ── smtp ──────────────────────────────────────────────────────────────────────

#[test]
fn test_smtp_masks_password() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["smtp"])
        .env_remove("SMTP_PROVIDER")
        .env("SMTP_USERNAME", "mailer")
        .env("SMTP_PASSWORD", "hunter2")
        .env("SMTP_ADDRESS", "smtp.example.com")
        .env("SMTP_DOMAIN", "example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("smtp.example.com"))
        .stdout(predicate::str::contains("587"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_smtp_reveal_json() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["--output-format", "json", "smtp", "--reveal"])
        .env("SMTP_PROVIDER", "sendgrid")
        .env("SENDGRID_USERNAME", "apikey")
        .env("SENDGRID_PASSWORD", "sg-secret")
        .env("SMTP_ADDRESS", "smtp.sendgrid.net")
        .env("SMTP_DOMAIN", "example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"password\": \"sg-secret\""))
        .stdout(predicate::str::contains("\"user_name\": \"apikey\""));
}

#[test]
fn test_smtp_missing_variable_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["smtp"])
        .env_remove("SMTP_PROVIDER")
        .env_remove("SMTP_USERNAME")
        .env_remove("SMTP_PASSWORD")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("SMTP_USERNAME"));
}

// ── completions / init / config ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    trestle(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trestle"));
}

#[test]
fn test_init_then_config_round_trip() {
    let temp = TempDir::new().unwrap();

    trestle(temp.path())
        .args(["init", "--local"])
        .assert()
        .success();
    assert!(temp.path().join(".trestle.toml").is_file());

    trestle(temp.path())
        .args(["config", "set", "defaults.database", "mysql"])
        .assert()
        .success();

    trestle(temp.path())
        .args(["config", "get", "defaults.database"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults.database = mysql"));

    trestle(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".trestle.toml"));
}

#[test]
fn test_init_does_not_overwrite_without_force() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".trestle.toml");
    fs::write(&path, "[defaults]\ndatabase = \"sqlite3\"\n").unwrap();

    trestle(temp.path())
        .args(["init", "--local"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    assert!(fs::read_to_string(&path).unwrap().contains("sqlite3"));
}
