//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and that the
//! offline `detect` subcommand classifies URLs correctly end to end.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `richlink` binary.
fn richlink() -> Command {
    Command::cargo_bin("richlink").expect("binary 'richlink' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    richlink()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: richlink"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn version_flag_shows_semver() {
    richlink()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^richlink \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_help_and_fails() {
    richlink()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn preview_help_describes_url_argument() {
    richlink()
        .args(["preview", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("URL to preview"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn batch_help_describes_file_argument() {
    richlink()
        .args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File containing URLs"));
}

// ─── Detection (offline end to end) ──────────────────────────────────────────

#[test]
fn detect_classifies_github_repo() {
    richlink()
        .args(["detect", "https://github.com/rust-lang/rust"])
        .assert()
        .success()
        .stdout("github\n");
}

#[test]
fn detect_classifies_devto() {
    richlink()
        .args(["detect", "https://dev.to/alice/my-post-123"])
        .assert()
        .success()
        .stdout("dev.to\n");
}

#[test]
fn detect_classifies_hashnode_and_medium_and_substack() {
    richlink()
        .args(["detect", "https://alice.hashnode.dev/post"])
        .assert()
        .success()
        .stdout("hashnode\n");

    richlink()
        .args(["detect", "https://medium.com/@alice/post"])
        .assert()
        .success()
        .stdout("medium\n");

    richlink()
        .args(["detect", "https://alice.substack.com/p/issue"])
        .assert()
        .success()
        .stdout("substack\n");
}

#[test]
fn detect_falls_back_to_webpage() {
    richlink()
        .args(["detect", "https://example.org/anything"])
        .assert()
        .success()
        .stdout("webpage\n");
}

#[test]
fn detect_tolerates_malformed_input() {
    richlink()
        .args(["detect", "not a url"])
        .assert()
        .success()
        .stdout("webpage\n");
}
