// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # End-to-End CLI Tests
//!
//! Drives the real compiled `cube` binary as a subprocess through the
//! create → absorb → export → genkey → import → stats → delete lifecycle,
//! each invocation against a throwaway sqlite file and storage root.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

use crate::common::get_cube_bin;

struct CliHarness {
    _storage: TempDir,
    database_url: String,
}

impl CliHarness {
    fn new(temp_dir: &TempDir) -> Self {
        let db_path = temp_dir.path().join("cube.db");
        let storage = TempDir::new().expect("storage root");
        Self {
            _storage: storage,
            database_url: format!("sqlite://{}", db_path.display()),
        }
    }

    fn storage_root(&self) -> &Path {
        self._storage.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(get_cube_bin())
            .args(["--database-url", &self.database_url])
            .args(args)
            .env("CUBE_STORAGE_ROOT", self.storage_root())
            .output()
            .expect("failed to execute cube binary")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn extract_cube_id(message: &str) -> String {
    message
        .split_whitespace()
        .skip_while(|w| *w != "cube")
        .nth(1)
        .expect("message should contain 'cube <id>'")
        .to_string()
}

#[test]
fn test_create_absorb_export_genkey_import_via_cli() {
    let root = TempDir::new().expect("root temp dir");
    let harness = CliHarness::new(&root);

    let create_output = harness.run(&["create", "vault", "--description", "e2e test cube"]);
    assert!(create_output.status.success(), "create failed: {}", stderr(&create_output));
    let create_message = stdout(&create_output);
    assert!(create_message.contains("created cube"));
    let cube_id = extract_cube_id(&create_message);

    let content_path = root.path().join("content.txt");
    std::fs::write(&content_path, b"hello from the e2e suite").expect("write content file");

    let absorb_output = harness.run(&["absorb", &cube_id, "--input", content_path.to_str().unwrap()]);
    assert!(absorb_output.status.success(), "absorb failed: {}", stderr(&absorb_output));
    assert!(stdout(&absorb_output).contains("absorbed into cube"));

    let envelope_path = root.path().join("vault.cube");
    let export_output = harness.run(&["export", &cube_id, "--output", envelope_path.to_str().unwrap()]);
    assert!(export_output.status.success(), "export failed: {}", stderr(&export_output));
    assert!(envelope_path.exists());

    let token_path = root.path().join("vault.token");
    let genkey_output = harness.run(&[
        "genkey",
        "--envelope",
        envelope_path.to_str().unwrap(),
        "--absorb-limit",
        "5",
        "--allow-stats",
        "--output",
        token_path.to_str().unwrap(),
    ]);
    assert!(genkey_output.status.success(), "genkey failed: {}", stderr(&genkey_output));
    assert!(token_path.exists());

    let import_output = harness.run(&["import", "--envelope", envelope_path.to_str().unwrap(), "--token", token_path.to_str().unwrap()]);
    assert!(import_output.status.success(), "import failed: {}", stderr(&import_output));
    assert!(stdout(&import_output).contains("imported cube"));
}

#[test]
fn test_stats_then_force_delete_via_cli() {
    let root = TempDir::new().expect("root temp dir");
    let harness = CliHarness::new(&root);

    let create_output = harness.run(&["create", "throwaway"]);
    assert!(create_output.status.success());
    let cube_id = extract_cube_id(&stdout(&create_output));

    let stats_output = harness.run(&["stats", &cube_id]);
    assert!(stats_output.status.success(), "stats failed: {}", stderr(&stats_output));
    assert!(stdout(&stats_output).contains("usage rows"));

    let delete_output = harness.run(&["delete", &cube_id, "--force"]);
    assert!(delete_output.status.success(), "delete failed: {}", stderr(&delete_output));
    assert!(stdout(&delete_output).contains("deleted cube"));

    // A second stats call against a deleted cube must fail, not succeed silently.
    let stats_after_delete = harness.run(&["stats", &cube_id]);
    assert!(!stats_after_delete.status.success());
}

#[test]
fn test_genkey_rejects_permissions_exceeding_source_grant_via_cli() {
    let root = TempDir::new().expect("root temp dir");
    let harness = CliHarness::new(&root);

    let create_output = harness.run(&["create", "locked"]);
    assert!(create_output.status.success());
    let cube_id = extract_cube_id(&stdout(&create_output));

    let envelope_path = root.path().join("locked.cube");
    let export_output = harness.run(&["export", &cube_id, "--output", envelope_path.to_str().unwrap()]);
    assert!(export_output.status.success());

    // export_limit/rekey_limit/genkey_limit/memify_limit default to forbidden
    // (-1); requesting `absorb-limit 0` (unlimited) against a source whose
    // own absorb_limit is merely unlimited is fine, but requesting a
    // negative-out-of-range raw value must be rejected by CLI validation
    // before it ever reaches the use case.
    let genkey_output = harness.run(&["genkey", "--envelope", envelope_path.to_str().unwrap(), "--absorb-limit", "-99"]);
    assert!(!genkey_output.status.success());
}
