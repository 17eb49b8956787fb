//! Integration tests for the wizard CLI
//!
//! These tests invoke the actual wizard-cli binary and verify:
//! - Exit codes (0 = success, 1 = invalid options, 2 = I/O error)
//! - stdout/stderr output
//! - JSON output format

use std::fs;
use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn wizard_bin() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_BIN_EXE_wizard-cli"));
    if !path.exists() {
        path = PathBuf::from("target/debug/wizard-cli");
    }
    path
}

fn run_wizard(args: &[&str]) -> std::process::Output {
    Command::new(wizard_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute wizard-cli")
}

/// Options file unique to the calling test, removed when dropped
struct OptionsFile(PathBuf);

impl OptionsFile {
    fn new(test: &str, json: &str) -> Self {
        let dir = std::env::temp_dir().join("wizard-cli-tests");
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(format!("{}-{}.json", test, std::process::id()));
        fs::write(&path, json).expect("write options file");
        OptionsFile(path)
    }

    fn path(&self) -> &str {
        self.0.to_str().expect("temp path is UTF-8")
    }
}

impl Drop for OptionsFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_wizard(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let out = stdout(&output);
    assert!(out.contains("wizard"));
    assert!(out.contains(&format!("(wizard-core {})", env!("CARGO_PKG_VERSION"))));
    assert!(out.contains(env!("CARGO_PKG_VERSION")), "should contain version");
}

#[test]
fn test_version_flag() {
    let output = run_wizard(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

// ── Erc20 ─────────────────────────────────────────────────

#[test]
fn test_erc20_defaults() {
    let output = run_wizard(&["erc20"]);
    assert!(output.status.success(), "default erc20 should exit 0");
    let out = stdout(&output);
    assert!(out.starts_with("# SPDX-License-Identifier: MIT\n\n%lang starknet\n"));
    assert!(out.contains("ERC20_initializer('MyToken', 'MTK', 18, initial_supply, recipient)"));
    assert!(out.ends_with("end\n"));
}

#[test]
fn test_erc20_roles_mintable() {
    let output = run_wizard(&[
        "erc20",
        "--name",
        "Coin",
        "--symbol",
        "COIN",
        "--mintable",
        "--access",
        "roles",
    ]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert_eq!(out.matches("const MINTER_ROLE").count(), 1);
    assert!(out.contains("AccessControl_grant_role(DEFAULT_ADMIN_ROLE, owner)"));
    assert!(out.contains("AccessControl_grant_role(MINTER_ROLE, owner)"));
    assert!(out.contains("AccessControl_only_role(MINTER_ROLE)"));
}

#[test]
fn test_erc20_security_contact_and_license() {
    let output = run_wizard(&[
        "erc20",
        "--security-contact",
        "sec@example.com",
        "--license",
        "Apache-2.0",
    ]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("# SPDX-License-Identifier: Apache-2.0\n"));
    assert!(out.contains("# @custom:security-contact sec@example.com\n"));
}

#[test]
fn test_erc20_upgradeable() {
    let output = run_wizard(&["erc20", "--upgradeable"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("# @custom:oz-upgrades-unsafe-allow constructor"));
    assert!(out.contains("func initializer{"));
    assert!(out.contains("func upgrade{"));
}

#[test]
fn test_erc20_votes_without_permit_exits_1() {
    let output = run_wizard(&["erc20", "--votes"]);
    assert_eq!(output.status.code(), Some(1), "invalid options should exit 1");
    let err = stderr(&output);
    assert!(err.contains("error"));
    assert!(err.contains("votes: Requires permit"));
    assert!(stdout(&output).is_empty(), "nothing printed on failure");
}

#[test]
fn test_erc20_empty_symbol_exits_1() {
    let output = run_wizard(&["erc20", "--symbol", ""]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("symbol: Required"));
}

#[test]
fn test_erc20_quote_in_name_exits_1() {
    let output = run_wizard(&["erc20", "--name", "Bob's Coin"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("name: Must be ASCII without single quotes"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_erc20_unknown_access_rejected() {
    let output = run_wizard(&["erc20", "--access", "admin"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown access mode"));
}

#[test]
fn test_erc20_json_output() {
    let output = run_wizard(&["erc20", "--name", "Coin", "--pausable", "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["name"], "Coin");
    assert_eq!(json["upgradeable"], false);
    let parents: Vec<&str> = json["parents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["contract"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(parents, vec!["ERC20", "Pausable", "Ownable"]);
}

// ── Generate ──────────────────────────────────────────────

#[test]
fn test_generate_from_file() {
    let file = OptionsFile::new(
        "generate",
        r#"{"kind": "ERC20", "name": "Coin", "symbol": "COIN", "burnable": true}"#,
    );
    let output = run_wizard(&["generate", file.path()]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("ERC20_initializer('Coin', 'COIN', 18, initial_supply, recipient)"));
    assert!(out.contains("ERC20Burnable_burn(amount)"));
}

#[test]
fn test_generate_matches_flags() {
    let file = OptionsFile::new(
        "generate-matches",
        r#"{"kind": "ERC20", "name": "Coin", "symbol": "COIN", "mintable": true, "access": "roles"}"#,
    );
    let from_file = run_wizard(&["generate", file.path()]);
    let from_flags = run_wizard(&[
        "erc20", "--name", "Coin", "--symbol", "COIN", "--mintable", "--access", "roles",
    ]);
    assert!(from_file.status.success());
    assert_eq!(stdout(&from_file), stdout(&from_flags));
}

#[test]
fn test_generate_json_output() {
    let file = OptionsFile::new("generate-json", r#"{"kind": "ERC20"}"#);
    let output = run_wizard(&["generate", "--json", file.path()]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("should be valid JSON");
    assert_eq!(json["name"], "MyToken");
    assert_eq!(json["license"], "MIT");
}

#[test]
fn test_generate_nonexistent_file() {
    let output = run_wizard(&["generate", "nonexistent.json"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
    assert!(stderr(&output).contains("cannot read"));
}

#[test]
fn test_generate_malformed_json_exits_1() {
    let file = OptionsFile::new("generate-malformed", "{not json");
    let output = run_wizard(&["generate", file.path()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_generate_unknown_kind_exits_1() {
    let file = OptionsFile::new("generate-unknown-kind", r#"{"kind": "ERC721"}"#);
    let output = run_wizard(&["generate", file.path()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_generate_invalid_options_exits_1() {
    let file = OptionsFile::new(
        "generate-invalid",
        r#"{"kind": "ERC20", "votes": true, "symbol": ""}"#,
    );
    let output = run_wizard(&["generate", file.path()]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("symbol: Required"));
    assert!(err.contains("votes: Requires permit"));
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_is_sha256_hex() {
    let file = OptionsFile::new("hash", r#"{"kind": "ERC20"}"#);
    let output = run_wizard(&["hash", file.path()]);
    assert!(output.status.success());
    let out = stdout(&output);
    let hash = out.trim();
    assert_eq!(hash.len(), 64, "SHA-256 hex is 64 chars");
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_hash_deterministic() {
    let file = OptionsFile::new("hash-det", r#"{"kind": "ERC20", "pausable": true}"#);
    let a = run_wizard(&["hash", file.path()]);
    let b = run_wizard(&["hash", file.path()]);
    assert_eq!(stdout(&a), stdout(&b));
}

#[test]
fn test_hash_differs_with_options() {
    let plain = OptionsFile::new("hash-plain", r#"{"kind": "ERC20"}"#);
    let minted = OptionsFile::new("hash-minted", r#"{"kind": "ERC20", "mintable": true}"#);
    let a = run_wizard(&["hash", plain.path()]);
    let b = run_wizard(&["hash", minted.path()]);
    assert_ne!(stdout(&a), stdout(&b));
}

#[test]
fn test_hash_nonexistent_file() {
    let output = run_wizard(&["hash", "nonexistent.json"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_options_file_removed_on_drop() {
    let file = OptionsFile::new("cleanup", r#"{"kind": "ERC20"}"#);
    let path = PathBuf::from(file.path());
    assert!(path.exists());
    drop(file);
    assert!(!path.exists(), "temp options file should be removed");
}

// ── Misc ──────────────────────────────────────────────────

#[test]
fn test_no_args_shows_usage() {
    let output = run_wizard(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage"));
}
