use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn audit_trail(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("audit-trail").unwrap();
    cmd.env("AUDIT_TRAIL_CONFIG_DIR", config.path());
    cmd.env_remove("AUDIT_TRAIL_LOG");
    cmd
}

#[test]
fn create_prints_new_json_log() {
    let config = TempDir::new().unwrap();
    audit_trail(&config)
        .args(["create", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "{\"auditLog\":[{\"action\":\"Created\",\"user\":\"alice\"",
        ));
}

#[test]
fn format_flag_selects_xml_for_new_logs() {
    let config = TempDir::new().unwrap();
    audit_trail(&config)
        .args(["--format", "xml", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "<AuditLog><Entry action=\"Deleted\" user=\"Anonymous\"",
        ));
}

#[test]
fn write_back_keeps_history_and_format() {
    let config = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let log = data.path().join("product-1.log");
    let log_arg = log.to_str().unwrap();

    audit_trail(&config)
        .args(["--format", "xml", "create", "--user", "a", "--log", log_arg, "--write"])
        .assert()
        .success();

    audit_trail(&config)
        .args([
            "--format", "json", "update", "--user", "b", "--log", log_arg, "--write",
            "--change", "Price=10->20",
        ])
        .assert()
        .success();

    audit_trail(&config)
        .args([
            "related", "--user", "c", "--log", log_arg, "--write", "--action", "added",
            "--related", "Tag", "--field", "Tag=Gaming",
        ])
        .assert()
        .success();

    let stored = std::fs::read_to_string(&log).unwrap();
    assert!(stored.starts_with("<AuditLog>"));

    audit_trail(&config)
        .args(["detect", log_arg])
        .assert()
        .success()
        .stdout("xml\n");

    audit_trail(&config)
        .args(["parse", log_arg])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Created")
                .and(predicate::str::contains("Price: 10 -> 20"))
                .and(predicate::str::contains("Tag = Gaming")),
        );
}

#[test]
fn parse_reads_stdin_as_json() {
    let config = TempDir::new().unwrap();
    let log = r#"{"auditLog":[{"action":"Updated","user":"bob","timestamp":"2024-05-01T10:00:00Z","fields":[{"name":"Qty","before":"1","after":"2"}]}]}"#;

    audit_trail(&config)
        .args(["parse", "--json"])
        .write_stdin(log)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"action\": \"Updated\"")
                .and(predicate::str::contains("\"before\": \"1\"")),
        );
}

#[test]
fn parse_of_corrupt_log_is_empty() {
    let config = TempDir::new().unwrap();
    audit_trail(&config)
        .arg("parse")
        .write_stdin("not a valid document")
        .assert()
        .success()
        .stdout("No audit entries.\n");
}

#[test]
fn settings_file_sets_default_format() {
    let config = TempDir::new().unwrap();
    std::fs::write(
        config.path().join("config.json"),
        r#"{"default_format":"xml","anonymous_user":"system"}"#,
    )
    .unwrap();

    audit_trail(&config)
        .arg("create")
        .assert()
        .success()
        .stdout(predicate::str::contains("user=\"system\""));

    audit_trail(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default format: xml"));
}

#[test]
fn invalid_change_syntax_fails() {
    let config = TempDir::new().unwrap();
    audit_trail(&config)
        .args(["update", "--change", "Price"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected NAME=BEFORE->AFTER"));
}

#[test]
fn write_requires_log() {
    let config = TempDir::new().unwrap();
    audit_trail(&config)
        .args(["create", "--write"])
        .assert()
        .failure();
}
