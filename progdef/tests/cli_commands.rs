//! CLI tests for progdef commands.
//!
//! Spawns the progdef binary in a fixture workspace and verifies exit codes
//! and the program file left on disk.

use std::process::{Command, Output};

use progdef::exit_codes;
use progdef::test_support::{TestWorkspace, stored_block_ids};

fn progdef(ws: &TestWorkspace, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_progdef"))
        .current_dir(ws.path())
        .args(args)
        .output()
        .expect("run progdef")
}

#[test]
fn validate_fixture_exits_ok() {
    let ws = TestWorkspace::new().expect("workspace");
    let output = progdef(&ws, &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("program 1: 7 blocks, canonical order"));
}

#[test]
fn validate_broken_program_exits_invalid() {
    let ws = TestWorkspace::new().expect("workspace");
    ws.write_raw("program.json", r#"{"id": 1, "adminName": "x", "blockDefinitions": []}"#)
        .expect("write program");
    let output = progdef(&ws, &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must have at least one block"));
}

#[test]
fn move_writes_new_order() {
    let ws = TestWorkspace::new().expect("workspace");
    let output = progdef(&ws, &["move", "6", "up"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stored_block_ids(&ws.read_program_json().expect("json")),
        vec![1, 6, 2, 3, 4, 5, 7]
    );
}

#[test]
fn move_unknown_block_exits_block_not_found() {
    let ws = TestWorkspace::new().expect("workspace");
    let output = progdef(&ws, &["move", "99", "down"]);
    assert_eq!(output.status.code(), Some(exit_codes::BLOCK_NOT_FOUND));
}

#[test]
fn illegal_move_exits_with_ordering_code() {
    let ws = TestWorkspace::new().expect("workspace");
    let before = ws.read_program_json().expect("json");
    let output = progdef(&ws, &["move", "7", "up"]);
    assert_eq!(
        output.status.code(),
        Some(exit_codes::ILLEGAL_PREDICATE_ORDERING)
    );
    assert_eq!(ws.read_program_json().expect("json"), before);
}

#[test]
fn slice_and_available_print_results() {
    let ws = TestWorkspace::new().expect("workspace");
    let output = progdef(&ws, &["slice", "2"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1..5 [2, 3, 4, 5]");

    let output = progdef(&ws, &["available", "5", "--eligibility"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "50\tquestion 50");
}

#[test]
fn program_override_points_at_another_file() {
    let ws = TestWorkspace::new().expect("workspace");
    let output = progdef(&ws, &["validate", "--program", "missing.json"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));
}
