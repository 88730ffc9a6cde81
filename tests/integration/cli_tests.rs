//! Integration tests for the CLI binary.
//!
//! Verifies that the `idtx` binary responds to basic flags, computes
//! Fibonacci values, and drives a wallet through identity creation.
//!
//! This test is registered as a [[test]] in the identity-transition-cli
//! crate so that CARGO_BIN_EXE_idtx is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `idtx` binary.
fn idtx_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_idtx"))
}

/// Run `idtx` against an isolated home with a fixed passphrase.
fn idtx_in(home: &Path, args: &[&str]) -> Output {
    idtx_binary()
        .env("IDTX_HOME", home)
        .env("IDTX_PASSPHRASE", "cli-test-pass")
        .env_remove("IDTX_NETWORK")
        .env_remove("IDTX_PROTOCOL_VERSION")
        .env_remove("IDTX_VALIDATE_BASIC")
        .args(args)
        .output()
        .expect("failed to execute idtx")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_responds_to_help() {
    let output = idtx_binary()
        .arg("--help")
        .output()
        .expect("failed to execute idtx --help");

    assert!(
        output.status.success(),
        "idtx --help should exit with success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = stdout(&output);
    assert!(
        stdout.contains("idtx") || stdout.contains("Usage"),
        "idtx --help output should contain usage information, got: {stdout}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = idtx_binary()
        .arg("--version")
        .output()
        .expect("failed to execute idtx --version");

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(
        stdout.contains("0.1") || stdout.contains("idtx"),
        "idtx --version should contain version info, got: {stdout}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = idtx_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute idtx");

    assert!(
        !output.status.success(),
        "idtx with unknown flag should exit with error"
    );
}

#[test]
fn cli_fibonacci_commands() {
    let output = idtx_binary().args(["fib", "10"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "55");

    let output = idtx_binary().args(["nearest-fib", "10"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "13");

    let output = idtx_binary().args(["nearest-fib", "1"]).output().unwrap();
    assert_eq!(stdout(&output).trim(), "1");

    let output = idtx_binary()
        .args(["nearest-fib", "12200160415121876739"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "past F(93) has no u64 answer");
}

#[test]
fn cli_wallet_init_show_create_verify() {
    let home = tempfile::tempdir().unwrap();

    let init = idtx_in(home.path(), &["wallet", "init", "--network", "testnet"]);
    assert!(
        init.status.success(),
        "wallet init failed: {}",
        String::from_utf8_lossy(&init.stderr)
    );
    assert!(home.path().join("default.wallet").exists());

    let again = idtx_in(home.path(), &["wallet", "init"]);
    assert!(!again.status.success(), "init must refuse to overwrite");

    let show = idtx_in(home.path(), &["wallet", "show"]);
    assert!(show.status.success());
    assert!(stdout(&show).contains("Next index:    0"));

    let proof_path = home.path().join("proof.json");
    std::fs::write(
        &proof_path,
        r#"{"instant":{"instantLock":"AQIDBA==","transaction":"BQYHCAkKCwwNDg8Q","outputIndex":0}}"#,
    )
    .unwrap();
    let result_path = home.path().join("result.json");

    let create = idtx_in(
        home.path(),
        &[
            "create",
            "--proof",
            proof_path.to_str().unwrap(),
            "--funding-index",
            "0",
            "--output",
            result_path.to_str().unwrap(),
        ],
    );
    assert!(
        create.status.success(),
        "create failed: {}",
        String::from_utf8_lossy(&create.stderr)
    );

    let result: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&result_path).unwrap()).unwrap();
    assert_eq!(result["identityIndex"], 0);
    assert_eq!(
        result["identityCreateTransition"]["publicKeys"]
            .as_array()
            .unwrap()
            .len(),
        4
    );

    let show = idtx_in(home.path(), &["wallet", "show"]);
    assert!(stdout(&show).contains("Next index:    1"));

    let verify = idtx_in(
        home.path(),
        &["verify", "--transition", result_path.to_str().unwrap()],
    );
    assert!(
        verify.status.success(),
        "verify failed: {}",
        String::from_utf8_lossy(&verify.stderr)
    );
    assert!(stdout(&verify).contains("Basic check: valid"));
}

#[test]
fn cli_create_requires_funding_key() {
    let home = tempfile::tempdir().unwrap();
    assert!(idtx_in(home.path(), &["wallet", "init"]).status.success());

    let proof_path = home.path().join("proof.json");
    std::fs::write(
        &proof_path,
        r#"{"instant":{"instantLock":"AQ==","transaction":"Ag==","outputIndex":0}}"#,
    )
    .unwrap();

    let create = idtx_in(
        home.path(),
        &["create", "--proof", proof_path.to_str().unwrap()],
    );
    assert!(!create.status.success());
}
