use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Helper to create a Command for the rulecheck binary
#[allow(deprecated)]
fn rulecheck() -> Command {
    Command::cargo_bin("rulecheck").expect("Failed to find rulecheck binary")
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_valid_profile() {
    rulecheck()
        .arg("check")
        .arg(fixture_path("users.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("Profile is valid"))
        .stdout(predicate::str::contains("Uniques:     email"));
}

#[test]
fn test_check_lists_operations() {
    rulecheck()
        .arg("check")
        .arg(fixture_path("users.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Operations:"))
        .stdout(predicate::str::contains("updateEmail"))
        .stdout(predicate::str::contains("uniques: username"));
}

#[test]
fn test_check_toml_profile() {
    rulecheck()
        .arg("check")
        .arg(fixture_path("users.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("users_toml"));
}

#[test]
fn test_check_json_output() {
    let output = rulecheck()
        .arg("check")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("users.yml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let profile: serde_json::Value =
        serde_json::from_slice(&output).expect("Output should be valid JSON");
    assert_eq!(profile["name"], "users");
    assert_eq!(profile["rules"]["email"], "required|email");
    assert_eq!(profile["operations"]["updateEmail"]["uniques"][0], "email");
}

#[test]
fn test_check_invalid_profile() {
    rulecheck()
        .arg("check")
        .arg(fixture_path("invalid_profile.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("no table is set"));
}

#[test]
fn test_check_missing_file() {
    rulecheck()
        .arg("check")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("profile.json");
    fs::write(&path, "{\"name\": \"users\"}").unwrap();

    rulecheck()
        .arg("check")
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_passing_payload() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("valid_user.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn test_validate_failing_payload() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("invalid_user.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains(
            "The email must be a valid email address.",
        ))
        .stdout(predicate::str::contains(
            "The username must be between 3 and 16 characters.",
        ))
        .stdout(predicate::str::contains("The age must be at least 13."));
}

#[test]
fn test_validate_json_output() {
    let output = rulecheck()
        .arg("validate")
        .arg("--format")
        .arg("json")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("invalid_user.json"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value =
        serde_json::from_slice(&output).expect("Output should be valid JSON");
    assert_eq!(report["passed"], false);
    assert_eq!(report["summary"]["field_count"], 3);
    assert_eq!(
        report["errors"]["email"][0],
        "The email must be a valid email address."
    );
}

#[test]
fn test_validate_update_keeps_own_email() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("existing_email.json"))
        .arg("--operation")
        .arg("update_email")
        .arg("--existing")
        .arg("42")
        .arg("--store")
        .arg(fixture_path("store.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn test_validate_update_rejects_other_records_email() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("existing_email.json"))
        .arg("--operation")
        .arg("update_email")
        .arg("--existing")
        .arg("7")
        .arg("--store")
        .arg(fixture_path("store.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "That email address is already registered.",
        ));
}

#[test]
fn test_validate_conventional_call() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("existing_email.json"))
        .arg("--call")
        .arg("validateUpdateEmailForExisting")
        .arg("--existing")
        .arg("42")
        .arg("--store")
        .arg(fixture_path("store.json"))
        .assert()
        .success();
}

#[test]
fn test_validate_unsupported_call() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("valid_user.json"))
        .arg("--call")
        .arg("saveUser")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported operation: saveUser"));
}

#[test]
fn test_validate_existing_without_store() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("valid_user.json"))
        .arg("--existing")
        .arg("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a record store"));
}

#[test]
fn test_validate_custom_key_name() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    fs::write(
        &store_path,
        r#"{ "users": [ { "uuid": "u-1", "email": "a@b.com", "username": "alice" } ] }"#,
    )
    .unwrap();

    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("existing_email.json"))
        .arg("--operation")
        .arg("updateEmail")
        .arg("--existing")
        .arg("u-1")
        .arg("--key-name")
        .arg("uuid")
        .arg("--store")
        .arg(store_path.to_str().unwrap())
        .assert()
        .success();
}

#[test]
fn test_validate_zero_padded_key() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store.json");
    fs::write(
        &store_path,
        r#"{ "users": [ { "code": "007", "email": "a@b.com", "username": "james" } ] }"#,
    )
    .unwrap();

    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("existing_email.json"))
        .arg("--operation")
        .arg("updateEmail")
        .arg("--existing")
        .arg("007")
        .arg("--key-name")
        .arg("code")
        .arg("--store")
        .arg(store_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"));
}

#[test]
fn test_validate_malformed_payload() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = temp_dir.path().join("data.json");
    fs::write(&data_path, "[1, 2, 3]").unwrap();

    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(data_path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid data payload"));
}

#[test]
fn test_validate_operation_conflicts_with_call() {
    rulecheck()
        .arg("validate")
        .arg(fixture_path("users.yml"))
        .arg(fixture_path("valid_user.json"))
        .arg("--operation")
        .arg("rename")
        .arg("--call")
        .arg("validateRename")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_validate_help() {
    rulecheck()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--existing"))
        .stdout(predicate::str::contains("--store"))
        .stdout(predicate::str::contains("--call"));
}
