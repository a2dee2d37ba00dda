//! Tests for the `live-app` command-line surface.
//!
//! Covers:
//!   - help      — public flags listed, hidden flags absent, nothing written
//!   - parsing   — positional arguments and a missing subcommand are rejected
//!   - failures  — no terminal for the prompts exits non-zero with `Error:` on stderr

use assert_cmd::Command;

fn live_app() -> Command {
    Command::cargo_bin("live-app").unwrap()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn init_help_lists_public_flags() {
    let help = stdout_of(live_app().args(["init", "--help"]));
    assert!(help.contains("--no-create"), "{help}");
    assert!(help.contains("Only create a local app"), "{help}");
    assert!(!help.contains("--dry-run"), "dry run is hidden: {help}");
    assert!(!help.contains("--templates-dir"), "{help}");
}

#[test]
fn short_help_flag_works() {
    let help = stdout_of(live_app().args(["init", "-h"]));
    assert!(help.contains("Usage"), "{help}");
}

#[test]
fn help_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    live_app()
        .current_dir(tmp.path())
        .args(["init", "--help"])
        .assert()
        .success();
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn positional_arguments_are_rejected() {
    live_app().args(["init", "my-app"]).assert().failure();
}

#[test]
fn missing_subcommand_fails() {
    live_app().assert().failure();
}

#[test]
fn init_without_terminal_fails_with_error_message() {
    let tmp = tempfile::tempdir().unwrap();
    let output = live_app()
        .current_dir(tmp.path())
        .arg("init")
        .output()
        .unwrap();

    assert!(!output.status.success(), "{output:?}");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error:"), "{stderr}");
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}
