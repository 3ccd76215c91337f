mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::write_banks_config;
use predicates::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn hoptrack(banks: &Path, data: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("hoptrack"));
    cmd.arg("--banks").arg(banks).arg("--data").arg(data);
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("failed to execute command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}

/// Amounts serialize as decimal strings with their computed scale, so compare
/// them numerically.
fn dec(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("amount field is a string")
        .parse()
        .expect("amount field is a decimal")
}

#[test]
fn test_plan_quotes_routes() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    let quotes = stdout_json(hoptrack(&banks, &data).args(["plan", "USD", "8000", "1", "3"]));
    let quotes = quotes.as_array().unwrap();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0]["path"], serde_json::json!([1, 3]));
    assert_eq!(quotes[1]["path"], serde_json::json!([1, 2, 3]));
    assert_eq!(dec(&quotes[1]["total_fees"]), Decimal::from(71));
}

#[test]
fn test_full_transfer_lifecycle() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    let task = stdout_json(hoptrack(&banks, &data).args(["create", "USD", "5000", "1", "2"]));
    assert_eq!(task["status"], "pending");
    assert_eq!(dec(&task["total_fees"]), "22.5".parse().unwrap());
    let id = task["id"].as_str().unwrap().to_string();

    let task = stdout_json(hoptrack(&banks, &data).args(["start", &id]));
    assert_eq!(task["status"], "processing");
    assert_eq!(task["steps"][0]["status"], "sent");

    let task = stdout_json(hoptrack(&banks, &data).args(["confirm", &id, "4977.5"]));
    assert_eq!(task["status"], "completed");
    assert_eq!(
        dec(&task["steps"][0]["actual_amount"]),
        "4977.5".parse().unwrap()
    );

    // A completed task is no longer open.
    let open = stdout_json(hoptrack(&banks, &data).args(["list", "--open"]));
    assert_eq!(open.as_array().unwrap().len(), 0);
    let all = stdout_json(hoptrack(&banks, &data).args(["list"]));
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[test]
fn test_multi_hop_lifecycle_with_explicit_route() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    let task = stdout_json(hoptrack(&banks, &data).args([
        "create", "USD", "8000", "1", "3", "--route", "1,2,3",
    ]));
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["route"], serde_json::json!([1, 2, 3]));

    stdout_json(hoptrack(&banks, &data).args(["start", &id]));
    let task = stdout_json(hoptrack(&banks, &data).args([
        "confirm", &id, "7950", "--reason", "intermediary levy",
    ]));
    assert_eq!(task["status"], "processing");
    assert_eq!(task["steps"][0]["amount_mismatch_reason"], "intermediary levy");

    let task = stdout_json(hoptrack(&banks, &data).args(["next", &id]));
    assert_eq!(task["current_step"], 1);
    // 7950 confirmed minus the second hop's 44 fee.
    assert_eq!(dec(&task["steps"][1]["expected_amount"]), Decimal::from(7906));

    let task = stdout_json(hoptrack(&banks, &data).args(["confirm", &id, "7906"]));
    assert_eq!(task["status"], "completed");
}

#[test]
fn test_cancel_then_cancel_again_fails() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    let task = stdout_json(hoptrack(&banks, &data).args(["create", "USD", "1000", "1", "2"]));
    let id = task["id"].as_str().unwrap().to_string();

    let task = stdout_json(hoptrack(&banks, &data).args(["cancel", &id, "operator abort"]));
    assert_eq!(task["status"], "cancelled");
    assert_eq!(task["cancellation_reason"], "operator abort");

    hoptrack(&banks, &data)
        .args(["cancel", &id, "again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid state transition"));
}

#[test]
fn test_unknown_task_fails_with_not_found() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    hoptrack(&banks, &data)
        .args(["start", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn test_invalid_request_is_rejected() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    hoptrack(&banks, &data)
        .args(["create", "USD", "100", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));

    hoptrack(&banks, &data)
        .args(["create", "EUR", "100", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not support currency"));
}

#[test]
fn test_delete_task() {
    let dir = tempdir().unwrap();
    let banks = write_banks_config(dir.path());
    let data = dir.path().join("tasks.json");

    let task = stdout_json(hoptrack(&banks, &data).args(["create", "USD", "1000", "1", "2"]));
    let id = task["id"].as_str().unwrap().to_string();

    let removed = stdout_json(hoptrack(&banks, &data).args(["delete", &id]));
    assert_eq!(removed, Value::Bool(true));
    let removed = stdout_json(hoptrack(&banks, &data).args(["delete", &id]));
    assert_eq!(removed, Value::Bool(false));
}
