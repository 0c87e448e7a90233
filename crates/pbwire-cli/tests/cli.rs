// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! End-to-end tests for the `pbwire` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pbwire(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pbwire").expect("binary");
    cmd.env("PBWIRE_CONFIG_DIR", config.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn types_lists_bundled_schemas() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("TransactionType"))
        .stdout(predicate::str::contains("HDNodePathType"));
}

#[test]
fn describe_prints_field_table() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .args(["describe", "TransactionType"])
        .assert()
        .success()
        .stdout(predicate::str::contains("decred_expiry"))
        .stdout(predicate::str::contains("TxOutputBinType"));
}

#[test]
fn unknown_type_fails() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .args(["describe", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown message type `Nope`"));
}

#[test]
fn encode_from_stdin_writes_hex() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .args(["encode", "TransactionType"])
        .write_stdin(r#"{"version": 1, "inputs": [{"prev_hash": "aaaa"}], "inputs_cnt": 1}"#)
        .assert()
        .success()
        .stdout("080112041202aaaa3001\n");
}

#[test]
fn encode_raw_to_file_then_decode_it() {
    let config = TempDir::new().unwrap();
    let json = config.path().join("tx.json");
    let bin = config.path().join("tx.bin");
    fs::write(&json, r#"{"version": 2, "lock_time": 500000}"#).unwrap();

    pbwire(&config)
        .args(["encode", "TransactionType", "--format", "raw", "--input"])
        .arg(&json)
        .arg("--output")
        .arg(&bin)
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read(&bin).unwrap(), vec![0x08, 0x02, 0x20, 0xa0, 0xc2, 0x1e]);

    pbwire(&config)
        .args(["decode", "TransactionType", "--input"])
        .arg(&bin)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lock_time\": 500000"));
}

#[test]
fn decode_rejects_truncated_input() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .args(["decode", "TransactionType", "1205aa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("truncated stream"));
}

#[test]
fn default_type_and_format_come_from_config() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .args(["config", "set", "--default-type", "TxOutputBinType", "--max-len", "1024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"default_message\": \"TxOutputBinType\""));
    assert!(config.path().join("codec.json").is_file());

    pbwire(&config)
        .arg("encode")
        .write_stdin(r#"{"amount": 300}"#)
        .assert()
        .success()
        .stdout("08ac02\n");

    pbwire(&config)
        .args(["decode", "08ac02", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amount\": 300"))
        .stdout(predicate::str::contains("\"script_pubkey\": \"\""));

    pbwire(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_message_len\": 1024"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let config = TempDir::new().unwrap();
    pbwire(&config)
        .args(["-vv", "decode", "TransactionType", "f80601"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{}\n"))
        .stderr(predicate::str::contains("skipping unknown field"));
}
