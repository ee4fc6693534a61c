#![allow(deprecated)] // TODO: migrate cargo_bin to cargo_bin_cmd!

mod common;

use assert_cmd::Command;
use common::TestProject;
use predicates::prelude::*;

const ENV_VARS: [&str; 7] = [
    "FEATUREFLOW_CONFIG_PATH",
    "FEATUREFLOW_REGISTRY",
    "FEATUREFLOW_NORDIC_TAG",
    "FEATUREFLOW_WORKER_TAG",
    "FEATUREFLOW_PR",
    "FEATUREFLOW_WAF_POLICY",
    "FEATUREFLOW_DNS_ZONE",
];

/// Command running inside `project` with no inherited overrides
fn featureflow(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("featureflow").unwrap();
    cmd.current_dir(project.path())
        .env("HOME", project.path())
        .env("XDG_CONFIG_HOME", project.path().join(".config"))
        .env("NO_COLOR", "1");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("featureflow").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("outputs"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("featureflow").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("featureflow"));
}

#[test]
fn test_plan_help_lists_overrides() {
    let mut cmd = Command::cargo_bin("featureflow").unwrap();
    cmd.args(["plan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<FEATURE>"))
        .stdout(predicate::str::contains("--nordic-tag"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_invalid_command() {
    let mut cmd = Command::cargo_bin("featureflow").unwrap();
    cmd.arg("invalid-command").assert().failure();
}

#[test]
fn test_validate_without_config() {
    let project = TestProject::new();
    featureflow(&project)
        .args(["validate", "feature-1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_validate_success() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .args(["validate", "feature-1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan is valid"))
        .stdout(predicate::str::contains(
            "https://feature-1234.cust.nisportal.com",
        ));
}

#[test]
fn test_validate_invalid_name() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .args(["validate", "feature_1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid-name"));
}

#[test]
fn test_validate_missing_reference() {
    let project = TestProject::new();
    let without_identity: String = common::FEATURE_KDL
        .lines()
        .filter(|line| !line.trim_start().starts_with("identity "))
        .collect::<Vec<_>>()
        .join("\n");
    project.write_feature_kdl(&without_identity);

    featureflow(&project)
        .args(["validate", "feature-1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing-reference"));
}

#[test]
fn test_dns_zone_override_must_match_reference() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .args(["validate", "feature-1234", "--dns-zone", "other.example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid-config"))
        .stderr(predicate::str::contains("other.example.com"));

    featureflow(&project)
        .env("FEATUREFLOW_DNS_ZONE", "other.example.com")
        .args(["plan", "feature-1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid-config"));
}

#[test]
fn test_plan_json_is_deterministic() {
    let project = TestProject::with_default_config();

    let first = featureflow(&project)
        .args(["plan", "feature-1234", "--format", "json"])
        .output()
        .unwrap();
    let second = featureflow(&project)
        .args(["plan", "feature-1234", "--format", "json"])
        .output()
        .unwrap();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let plan: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(plan["feature"], "feature-1234");
    assert_eq!(plan["resources"].as_array().unwrap().len(), 13);
}

#[test]
fn test_plan_text_lists_waves() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .args(["plan", "feature-1234"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wave 1"))
        .stdout(predicate::str::contains("feature1234storage"))
        .stdout(predicate::str::contains("13 resources"));
}

#[test]
fn test_plan_out_file() {
    let project = TestProject::with_default_config();
    let out = project.path().join("plan.json");

    featureflow(&project)
        .args(["plan", "feature-1234", "--format", "json", "--out"])
        .arg(&out)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    let plan: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(plan["feature"], "feature-1234");
}

#[test]
fn test_outputs_json() {
    let project = TestProject::with_default_config();
    let output = featureflow(&project)
        .args(["outputs", "feature-42"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outputs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outputs["featureUrl"], "https://feature-42.cust.nisportal.com");
    assert_eq!(outputs["dnsRecordName"], "feature-42");
    assert_eq!(outputs["compute"][0]["internalUrl"], "http://feature-42-nordic");
}

#[test]
fn test_flag_overrides_config_file() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .args(["plan", "feature-1234", "--nordic-tag", "pr-1234-abc"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nordic/api:pr-1234-abc"));
}

#[test]
fn test_env_overrides_config_file() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .env("FEATUREFLOW_WORKER_TAG", "pr-1234-env")
        .args(["plan", "feature-1234", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nordic/worker:pr-1234-env"));
}

#[test]
fn test_debug_log_names_config_source() {
    let project = TestProject::with_default_config();
    featureflow(&project)
        .env("RUST_LOG", "debug")
        .args(["plan", "feature-1234", "--format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Using configuration"))
        .stderr(predicate::str::contains("feature.kdl"));
}

#[test]
fn test_explicit_config_path() {
    let project = TestProject::new();
    let path = project.path().join("elsewhere.kdl");
    std::fs::write(&path, common::FEATURE_KDL).unwrap();

    featureflow(&project)
        .arg("--config")
        .arg(&path)
        .args(["validate", "feature-7"])
        .assert()
        .success();
}
