//! Integration tests for the `mdnzr` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn mdnzr(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mdnzr").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("MDNZR_CONCURRENCY")
        .env_remove("MDNZR_TARGET");
    cmd
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn file_count(path: &Path) -> usize {
    fs::read_dir(path).unwrap().count()
}

#[test]
fn test_empty_match_is_noop() {
    let dir = TempDir::new().unwrap();
    mdnzr(&dir)
        .arg("**/*.js")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_emits_to_stdout_in_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "const fs = require('fs');\n");
    write(&dir, "b.js", "module.exports.b = 2;\n");

    mdnzr(&dir)
        .args(["*.js", "-c", "1"])
        .assert()
        .success()
        .stdout("import * as fs from 'fs';\nexport const b = 2;\n");

    assert_eq!(file_count(dir.path()), 2);
}

#[test]
fn test_write_with_extension() {
    let dir = TempDir::new().unwrap();
    write(&dir, "sub/x.cjs", "const { join } = require('path');\nmodule.exports = join;\n");

    mdnzr(&dir)
        .args(["sub/*.cjs", "-e", ".mjs", "-w"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Wrote 1 file(s)"));

    assert_eq!(
        fs::read_to_string(dir.path().join("sub/x.mjs")).unwrap(),
        "import { join } from 'path';\nexport { join };\nexport default join;\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("sub/x.cjs")).unwrap(),
        "const { join } = require('path');\nmodule.exports = join;\n"
    );
}

#[test]
fn test_write_in_place_without_extension() {
    let dir = TempDir::new().unwrap();
    write(&dir, "lib/a.js", "require('./polyfill');\n");

    mdnzr(&dir).args(["lib/*.js", "--write"]).assert().success();

    assert_eq!(
        fs::read_to_string(dir.path().join("lib/a.js")).unwrap(),
        "import './polyfill';\n"
    );
    assert_eq!(file_count(&dir.path().join("lib")), 1);
}

#[test]
fn test_ignore_patterns() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/a.js", "require('a');\n");
    write(&dir, "src/a.test.js", "require('test');\n");

    mdnzr(&dir)
        .args(["src/*.js", "-i", "**/*.test.js"])
        .assert()
        .success()
        .stdout("import 'a';\n");
}

#[test]
fn test_transform_failure_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    write(&dir, "bad.js", "const m = require(name);\n");
    write(&dir, "good.js", "require('ok');\n");

    mdnzr(&dir)
        .args(["*.js", "-c", "2", "-w", "-e", "mjs"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bad.js"))
        .stderr(predicate::str::contains("line 1"));

    assert!(!dir.path().join("bad.mjs").exists());
}

#[test]
fn test_zero_concurrency_rejected() {
    let dir = TempDir::new().unwrap();
    mdnzr(&dir).args(["*.js", "-c", "0"]).assert().failure();
}

#[test]
fn test_output_option_warns_and_is_ignored() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "require('a');\n");

    mdnzr(&dir)
        .args(["a.js", "-o", "dist"])
        .assert()
        .success()
        .stdout("import 'a';\n")
        .stderr(predicate::str::contains("has no effect"));

    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_quiet_suppresses_status() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "module.exports = 1;\n");

    mdnzr(&dir)
        .args(["a.js", "-q"])
        .assert()
        .success()
        .stdout("export default 1;\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_quiet_suppresses_option_and_pattern_warnings() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "require('a');\n");

    mdnzr(&dir)
        .args(["a.js", "[", "-q", "-o", "dist"])
        .assert()
        .success()
        .stdout("import 'a';\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_default_export_warning_names_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "module.exports = 1;\n");

    mdnzr(&dir)
        .arg("a.js")
        .assert()
        .success()
        .stderr(predicate::str::contains("a.js: line 1"));
}

#[test]
fn test_es5_target_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "require('a');\n");

    mdnzr(&dir)
        .args(["a.js", "-t", "es5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("es2015"));
}

#[test]
fn test_idempotent_writes() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.cjs", "const x = require('x').y;\nexports.z = x;\n");

    mdnzr(&dir).args(["*.cjs", "-w", "-e", "mjs"]).assert().success();
    let first = fs::read(dir.path().join("a.mjs")).unwrap();
    mdnzr(&dir).args(["*.cjs", "-w", "-e", "mjs"]).assert().success();
    assert_eq!(first, fs::read(dir.path().join("a.mjs")).unwrap());
}

#[cfg(unix)]
#[test]
fn test_external_command() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.js", "const a = require('a');\n");

    mdnzr(&dir)
        .args(["a.js", "--command", "cat"])
        .assert()
        .success()
        .stdout("const a = require('a');\n");
}
