//! Black-box tests that drive the compiled binary over stdin/stdout, the
//! only interface a host program actually exposes.

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn run(base_path: &std::path::Path, script: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cli"))
        .env("SPRUCE_BASE_PATH", base_path)
        .env("SPRUCE_LOG_LEVEL", "ERROR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cli binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(format!("{script}\nEXIT\n").as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn put_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), "PUT name alice\nGET name");
    assert!(output.contains("OK"));
    assert!(output.contains("alice"));
}

#[test]
fn get_missing_key_prints_nil() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), "GET nope");
    assert!(output.contains("(nil)"));
}

#[test]
fn del_then_get_prints_nil() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), "PUT k v\nDEL k\nGET k");
    assert!(output.contains("(nil)"));
}

#[test]
fn unknown_command_is_reported() {
    let dir = tempdir().unwrap();
    let output = run(dir.path(), "BOGUS");
    assert!(output.contains("unknown command"));
}
