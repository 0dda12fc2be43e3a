//! CLI integration tests
//!
//! Tests the rpc-health-checker binary end-to-end against local mock providers

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn checker() -> Command {
    let mut cmd = Command::cargo_bin("rpc-health-checker").unwrap();
    cmd.env_remove("PORT").env_remove("RUST_LOG");
    cmd
}

/// Write chain, reference, method and checker config files into `dir`
fn write_fixture(dir: &Path, base_url: &str) {
    let chains = format!(
        r#"{{"chains":[
            {{"name":"Ethereum","network":"mainnet","chainId":1,"providers":[
                {{"name":"alpha","url":"{base}/alpha"}},
                {{"name":"beta","url":"{base}/beta"}},
                {{"name":"gamma","url":"{base}/gamma","enabled":false}}
            ]}},
            {{"name":"polygon","network":"mainnet","chainId":137,"providers":[
                {{"name":"alpha","url":"{base}/alpha"}}
            ]}}
        ]}}"#,
        base = base_url
    );
    let references = format!(
        r#"{{"chains":[
            {{"name":"ethereum","network":"mainnet","chainId":1,
              "provider":{{"name":"reference","url":"{base}/reference","authType":"basic-auth","authLogin":"user","authPassword":"pw"}}}}
        ]}}"#,
        base = base_url
    );
    let methods = r#"[{"method":"eth_blockNumber","params":[],"maxDifference":"2"}]"#;
    let config = serde_json::json!({
        "default_providers_path": dir.join("default_providers.json"),
        "reference_providers_path": dir.join("reference_providers.json"),
        "output_providers_path": dir.join("out").join("providers.json"),
        "tests_config_path": dir.join("test_methods.json"),
        "request_timeout_seconds": 5,
        "listen_addr": "127.0.0.1:8080",
    });

    std::fs::write(dir.join("default_providers.json"), chains).unwrap();
    std::fs::write(dir.join("reference_providers.json"), references).unwrap();
    std::fs::write(dir.join("test_methods.json"), methods).unwrap();
    std::fs::write(dir.join("checker_config.json"), config.to_string()).unwrap();
}

fn fixture(base_url: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), base_url);
    dir
}

fn mock_block(server: &mut mockito::ServerGuard, path: &str, hex: &str) -> mockito::Mock {
    server
        .mock("POST", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"jsonrpc":"2.0","id":1,"result":"{}"}}"#, hex))
        .create()
}

// ==================== Basic CLI tests ====================

#[test]
fn test_version() {
    checker()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rpc-health-checker"));
}

#[test]
fn test_help() {
    checker()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("trusted reference"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_check_requires_chain_id() {
    checker()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--chain-id"));
}

// ==================== Config tests ====================

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();

    checker()
        .current_dir(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"interval_seconds\": 60"))
        .stdout(predicate::str::contains("default_providers.json"))
        .stdout(predicate::str::contains("0.0.0.0:8080"));
}

#[test]
fn test_config_show_overrides() {
    let dir = tempfile::tempdir().unwrap();

    checker()
        .current_dir(dir.path())
        .env("PORT", "9545")
        .args([
            "config",
            "show",
            "--default-providers",
            "custom_chains.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:9545"))
        .stdout(predicate::str::contains("custom_chains.json"));
}

#[test]
fn test_config_show_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checker_config.json");
    std::fs::write(&path, "{ not json").unwrap();

    checker()
        .args(["config", "show", "--checker-config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

// ==================== Provider listing ====================

#[test]
fn test_providers_list() {
    let dir = fixture("https://rpc.example.com");

    checker()
        .current_dir(dir.path())
        .args(["providers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONFIGURED CHAINS (2)"))
        .stdout(predicate::str::contains("ethereum [mainnet] chainId 1"))
        .stdout(predicate::str::contains("reference https://rpc.example.com/reference [basic-auth]"))
        .stdout(predicate::str::contains("gamma https://rpc.example.com/gamma (disabled)"))
        .stdout(predicate::str::contains("reference: (none, chain will be skipped)"))
        .stdout(predicate::str::contains("pw").not());
}

#[test]
fn test_providers_list_unknown_chain() {
    let dir = fixture("https://rpc.example.com");

    checker()
        .current_dir(dir.path())
        .args(["providers", "list", "--chain-id", "56"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chain config not found for chainId: 56"));
}

#[test]
fn test_basic_auth_requires_credentials() {
    let dir = fixture("https://rpc.example.com");
    let references = r#"{"chains":[{"name":"ethereum","network":"mainnet","chainId":1,
        "provider":{"name":"reference","url":"https://rpc.example.com/reference","authType":"basic-auth","login":"user","password":"pw"}}]}"#;
    std::fs::write(dir.path().join("reference_providers.json"), references).unwrap();

    checker()
        .current_dir(dir.path())
        .args(["providers", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("authLogin/authPassword"));
}

// ==================== Validation ====================

#[test]
fn test_run_writes_valid_providers() {
    let mut server = mockito::Server::new();
    let reference = server
        .mock("POST", "/reference")
        .match_header("authorization", "Basic dXNlcjpwdw==")
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x64"}"#)
        .create();
    let alpha = mock_block(&mut server, "/alpha", "0x65");
    let beta = mock_block(&mut server, "/beta", "0x6e");
    let gamma = mock_block(&mut server, "/gamma", "0x64").expect(0);

    let dir = fixture(&server.url());

    checker()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2 valid"));

    reference.assert();
    alpha.assert();
    beta.assert();
    gamma.assert();

    let output = dir.path().join("out").join("providers.json");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();

    // Chain 137 has no reference, so only chain 1 is written
    let chains = written["chains"].as_array().unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0]["chainId"], 1);
    assert_eq!(chains[0]["name"], "ethereum");

    let providers = chains[0]["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0]["name"], "alpha");
}

#[test]
fn test_run_reference_down_writes_empty_chain() {
    let mut server = mockito::Server::new();
    let _reference = server.mock("POST", "/reference").with_status(503).create();
    let _alpha = mock_block(&mut server, "/alpha", "0x64");
    let _beta = mock_block(&mut server, "/beta", "0x64");

    let dir = fixture(&server.url());

    checker()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("0/2 valid"));

    let output = dir.path().join("out").join("providers.json");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(written["chains"][0]["chainId"], 1);
    assert_eq!(written["chains"][0]["providers"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_single_chain() {
    let mut server = mockito::Server::new();
    let _reference = mock_block(&mut server, "/reference", "0x64");
    let _alpha = mock_block(&mut server, "/alpha", "0x64");
    let _beta = mock_block(&mut server, "/beta", "0x6e");

    let dir = fixture(&server.url());

    checker()
        .current_dir(dir.path())
        .args(["check", "--chain-id", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ alpha"))
        .stdout(predicate::str::contains("✗ beta"))
        .stdout(predicate::str::contains("eth_blockNumber: out of tolerance"));

    // check never writes the output file
    assert!(!dir.path().join("out").join("providers.json").exists());
}

#[test]
fn test_check_json_output() {
    let mut server = mockito::Server::new();
    let _reference = mock_block(&mut server, "/reference", "0x64");
    let _alpha = mock_block(&mut server, "/alpha", "0x64");
    let _beta = server.mock("POST", "/beta").with_status(200).with_body("not json").create();

    let dir = fixture(&server.url());

    let output = checker()
        .current_dir(dir.path())
        .args(["check", "--chain-id", "1", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["alpha"]["valid"], true);
    assert_eq!(json["beta"]["valid"], false);
    assert!(json["beta"]["failedMethods"]["eth_blockNumber"]["error"]
        .as_str()
        .unwrap()
        .contains("Invalid response"));
}

#[test]
fn test_check_unknown_chain_fails() {
    let dir = fixture("https://rpc.example.com");

    checker()
        .current_dir(dir.path())
        .args(["check", "--chain-id", "56"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chain config not found for chainId: 56"));
}

#[test]
fn test_check_chain_without_reference_fails() {
    let dir = fixture("https://rpc.example.com");

    checker()
        .current_dir(dir.path())
        .args(["check", "--chain-id", "137"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("137"));
}

#[test]
fn test_run_missing_methods_file() {
    let dir = fixture("https://rpc.example.com");
    std::fs::remove_file(dir.path().join("test_methods.json")).unwrap();

    checker()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("test_methods.json"));
}
