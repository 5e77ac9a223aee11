//! Shared helpers for CLI tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};

/// Storage file used inside a test home directory.
pub fn storage_path(home: &Path) -> PathBuf {
    home.join("storage.json")
}

/// Run the CLI with an isolated home, storage file and API URL.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_strove"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("STROVE_STORAGE", storage_path(home));
    cmd.env("STROVE_API_BASE_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("STROVE_PASSWORD");
    for var in [
        "STROVE_PREFER_DARK",
        "STROVE_AI_API_KEY",
        "STROVE_AI_PROVIDER",
        "STROVE_AI_MODEL",
        "STROVE_AI_URL",
    ] {
        cmd.env_remove(var);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_with_env_failure(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Read the storage file as a JSON object.
pub fn read_storage(home: &Path) -> Value {
    match std::fs::read_to_string(storage_path(home)) {
        Ok(json) => serde_json::from_str(&json).expect("storage file is JSON"),
        Err(_) => json!({}),
    }
}

/// A successful login or registration envelope.
pub fn auth_ok(token: &str, username: &str, email: &str) -> Value {
    json!({
        "success": true,
        "message": "ok",
        "data": {"token": token, "username": username, "email": email}
    })
}
