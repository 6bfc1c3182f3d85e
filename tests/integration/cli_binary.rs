//! Tests that drive the compiled `empledger` binary

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn run(workspace: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_empledger"))
        .env_remove("EMPLEDGER_LOG")
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not an envelope ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_init_invoke_and_exit_status() {
    let temp_dir = TempDir::new().unwrap();
    let ws = temp_dir.path();

    let init = run(ws, &["init", "E0", "Dummy", "Dummy", "0", "Dummy"]);
    assert!(init.status.success(), "stderr={}", String::from_utf8_lossy(&init.stderr));

    let create = run(ws, &["invoke", "create", "E1", "Ann", "Eng", "50000", "NY"]);
    assert!(create.status.success());
    assert_eq!(stdout_json(&create)["OK"], true);

    let query = run(ws, &["invoke", "readBySalaryFloor", "-1"]);
    assert!(query.status.success());
    assert_eq!(
        stdout_json(&query)["message"].as_array().unwrap().len(),
        2
    );

    let missing = run(ws, &["invoke", "readByKey", "E9"]);
    assert!(!missing.status.success());
    assert_eq!(stdout_json(&missing)["code"], "NOT_FOUND");

    let unknown = run(ws, &["invoke", "doesNotExist"]);
    assert!(!unknown.status.success());
    assert_eq!(stdout_json(&unknown)["OK"], false);
}

#[test]
fn test_operations_listing() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["operations"]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    let names: Vec<&str> = text.lines().map(|l| l.split('\t').next().unwrap()).collect();
    assert_eq!(
        names,
        vec!["create", "readByFilter", "readByKey", "readBySalaryFloor"]
    );
}

#[test]
fn test_memory_backend_from_workspace_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[system.storage]\nbackend = \"memory\"\n",
    )
    .unwrap();

    let output = run(temp_dir.path(), &["config"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("backend = \"memory\""));
    assert!(!temp_dir.path().join(".empledger").exists());
}
