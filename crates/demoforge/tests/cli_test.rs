//! Integration tests for the `demoforge` CLI binary.
//!
//! These tests exercise argument parsing, deployment end to end against
//! temporary directories, and error handling — publishing is covered
//! through the best-effort and strict policies without a git remote.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATE: &str = "<h1>{{company_name}} - {{industry}}</h1>\n<p>{{tagline}}</p>\n";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `demoforge` binary with env isolation.
///
/// Clears all `DEMOFORGE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn demoforge_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("demoforge");
    cmd.env("HOME", "/tmp/demoforge-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/demoforge-cli-test-nonexistent")
        .env_remove("DEMOFORGE_PROFILE")
        .env_remove("DEMOFORGE_SITES_ROOT")
        .env_remove("DEMOFORGE_BASE_URL")
        .env_remove("DEMOFORGE_OUTPUT")
        .env_remove("DEMOFORGE_COLOR")
        .env_remove("DEMOFORGE_TEMPLATE");
    cmd
}

/// Command set up to deploy inside `dir`: template written, cwd set,
/// and git kept from discovering any repository above the directory.
fn deploy_cmd(dir: &TempDir) -> assert_cmd::Command {
    fs::write(dir.path().join("template.html"), TEMPLATE).unwrap();
    let mut cmd = demoforge_cmd();
    cmd.current_dir(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path());
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn read_record(dir: &Path, site: &str) -> serde_json::Value {
    let raw = fs::read_to_string(dir.join("sites").join(site).join("deployed.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn page_path(dir: &Path, site: &str) -> PathBuf {
    dir.join("sites").join(site).join("index.html")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = demoforge_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    demoforge_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("demo sites")
            .and(predicate::str::contains("deploy"))
            .and(predicate::str::contains("sites"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    demoforge_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("demoforge"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    demoforge_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    demoforge_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = demoforge_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_deploy_requires_lead_name() {
    let output = demoforge_cmd().arg("deploy").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("required") || text.contains("LEAD_NAME"),
        "Expected missing-argument error:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = demoforge_cmd()
        .args(["--output", "sparkles", "sites", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_deploy_missing_template_exits_3() {
    let tmp = TempDir::new().unwrap();
    let output = demoforge_cmd()
        .current_dir(tmp.path())
        .args(["deploy", "Acme Corp", "--no-publish"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected template exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("template.html"),
        "Expected the template path in the error:\n{text}"
    );
}

// ── Deploy ──────────────────────────────────────────────────────────

#[test]
fn test_deploy_writes_page_and_record() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "retail", "--no-publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://demos.example.com/demo-acme-corp",
        ));

    let page = fs::read_to_string(page_path(tmp.path(), "demo-acme-corp")).unwrap();
    assert_eq!(page, "<h1>Acme Corp - retail</h1>\n<p>{{tagline}}</p>\n");

    let record = read_record(tmp.path(), "demo-acme-corp");
    assert_eq!(record["subdomain"], "demo-acme-corp");
    assert_eq!(record["lead"], "Acme Corp");
    assert_eq!(record["customizations"]["company_name"], "Acme Corp");
    assert_eq!(record["customizations"]["industry"], "retail");
    let deployed = record["deployed"].as_str().unwrap();
    assert!(deployed.ends_with('Z'), "timestamp was {deployed}");
}

#[test]
fn test_deploy_industry_defaults_to_placeholder() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish"])
        .assert()
        .success();

    let page = fs::read_to_string(page_path(tmp.path(), "demo-acme-corp")).unwrap();
    assert!(page.contains("Acme Corp - your industry"), "page was {page}");
}

#[test]
fn test_deploy_set_pairs_override_builtins() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args([
            "deploy",
            "Acme Corp",
            "retail",
            "--no-publish",
            "--set",
            "industry=SaaS",
            "--set",
            "tagline=Ship faster",
        ])
        .assert()
        .success();

    let page = fs::read_to_string(page_path(tmp.path(), "demo-acme-corp")).unwrap();
    assert!(page.contains("Acme Corp - SaaS"), "page was {page}");
    assert!(page.contains("Ship faster"), "page was {page}");
}

#[test]
fn test_deploy_malformed_set_pair_exits_2() {
    let tmp = TempDir::new().unwrap();
    let output = deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish", "--set", "tagline"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

#[test]
fn test_deploy_punctuation_only_lead_succeeds() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "!!!", "--no-publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-"));

    assert!(page_path(tmp.path(), "demo-").exists());
}

#[test]
fn test_deploy_json_output() {
    let tmp = TempDir::new().unwrap();
    let output = deploy_cmd(&tmp)
        .args(["--output", "json", "deploy", "Acme Corp", "--no-publish"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let receipt: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(receipt["site_id"], "demo-acme-corp");
    assert_eq!(receipt["url"], "https://demos.example.com/demo-acme-corp");
    assert_eq!(receipt["publish"]["state"], "skipped");
    assert_eq!(receipt["metadata"]["lead"], "Acme Corp");
}

#[test]
fn test_redeploy_overwrites_with_later_timestamp() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish"])
        .assert()
        .success();
    let first = read_record(tmp.path(), "demo-acme-corp");

    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "consulting", "--no-publish"])
        .assert()
        .success();
    let second = read_record(tmp.path(), "demo-acme-corp");

    let first_ts = chrono::DateTime::parse_from_rfc3339(first["deployed"].as_str().unwrap());
    let second_ts = chrono::DateTime::parse_from_rfc3339(second["deployed"].as_str().unwrap());
    assert!(second_ts.unwrap() > first_ts.unwrap());
    assert_eq!(second["customizations"]["industry"], "consulting");
}

#[test]
fn test_deploy_sites_root_flag() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("var/demos");
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish", "--sites-root"])
        .arg(&root)
        .assert()
        .success();

    assert!(root.join("demo-acme-corp/index.html").exists());
}

#[test]
fn test_deploy_base_url_flag() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args([
            "deploy",
            "Acme Corp",
            "--no-publish",
            "--base-url",
            "https://preview.acme.dev",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://preview.acme.dev/demo-acme-corp",
        ));
}

#[test]
fn test_deploy_quiet_suppresses_stdout() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ── Publishing policies ─────────────────────────────────────────────

#[test]
fn test_best_effort_publish_failure_keeps_deployment() {
    // The temp dir is not a git repository, so publishing fails; the
    // default best-effort policy still exits successfully.
    let tmp = TempDir::new().unwrap();
    let output = deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    assert!(page_path(tmp.path(), "demo-acme-corp").exists());
}

#[test]
fn test_strict_publish_failure_exits_5() {
    let tmp = TempDir::new().unwrap();
    let output = deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--strict-publish"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
    // The site files are written before publishing is attempted.
    assert!(page_path(tmp.path(), "demo-acme-corp").exists());
}

#[test]
fn test_no_publish_conflicts_with_strict_publish() {
    let tmp = TempDir::new().unwrap();
    let output = deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish", "--strict-publish"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

// ── Sites ───────────────────────────────────────────────────────────

#[test]
fn test_sites_list_empty_plain() {
    let tmp = TempDir::new().unwrap();
    demoforge_cmd()
        .current_dir(tmp.path())
        .args(["--output", "plain", "sites", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_sites_list_after_deploys() {
    let tmp = TempDir::new().unwrap();
    for lead in ["Zeta Corp", "Acme Corp"] {
        deploy_cmd(&tmp)
            .args(["deploy", lead, "--no-publish"])
            .assert()
            .success();
    }

    let output = demoforge_cmd()
        .current_dir(tmp.path())
        .args(["--output", "plain", "sites", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["demo-acme-corp", "demo-zeta-corp"]);
}

#[test]
fn test_sites_show_accepts_lead_name() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish"])
        .assert()
        .success();

    demoforge_cmd()
        .current_dir(tmp.path())
        .args(["sites", "show", "Acme Corp"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("demo-acme-corp")
                .and(predicate::str::contains("Acme Corp"))
                .and(predicate::str::contains(
                    "https://demos.example.com/demo-acme-corp",
                )),
        );
}

#[test]
fn test_sites_show_accepts_identifier() {
    let tmp = TempDir::new().unwrap();
    deploy_cmd(&tmp)
        .args(["deploy", "Acme Corp", "--no-publish"])
        .assert()
        .success();

    demoforge_cmd()
        .current_dir(tmp.path())
        .args(["sites", "show", "demo-acme-corp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Corp"));
}

#[test]
fn test_sites_show_unknown_exits_4() {
    let tmp = TempDir::new().unwrap();
    let output = demoforge_cmd()
        .current_dir(tmp.path())
        .args(["sites", "show", "demo-nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "Expected not-found exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("deployment record"),
        "Expected not-found message:\n{text}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_config_file() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the defaults.
    demoforge_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_then_show() {
    let tmp = TempDir::new().unwrap();

    demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "set", "publish", "strict"])
        .assert()
        .success()
        .stderr(predicate::str::contains("✓ Set publish"));

    demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.default]")
                .and(predicate::str::contains("publish = \"strict\"")),
        );
}

#[test]
fn test_config_set_rejects_bad_publish_value() {
    let tmp = TempDir::new().unwrap();
    let output = demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "set", "publish", "sometimes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let tmp = TempDir::new().unwrap();
    let output = demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "set", "frobnicate", "yes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("frobnicate"), "Expected the bad key:\n{text}");
}

#[test]
fn test_config_use_unknown_profile_fails() {
    let tmp = TempDir::new().unwrap();
    demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_config_profiles_marks_default() {
    let tmp = TempDir::new().unwrap();
    demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "set", "publish", "disabled"])
        .assert()
        .success();

    demoforge_cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

#[test]
fn test_config_path_prints_path() {
    demoforge_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_explicit_missing_profile_fails() {
    let tmp = TempDir::new().unwrap();
    let output = deploy_cmd(&tmp)
        .args(["--profile", "staging", "deploy", "Acme Corp", "--no-publish"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("staging"),
        "Expected the missing profile name:\n{text}"
    );
}
