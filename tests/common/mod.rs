//! Shared fixtures for go-move integration tests.
//!
//! Builds small Go modules in temporary directories and drives the binary
//! against them.

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const MODULE: &str = "example.com/proj";

/// Writes `content` to `root/rel`, creating parent directories.
#[allow(unused)]
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[allow(unused)]
pub fn read_file(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// A module with one package `a` and two clients.
///
/// ```text
/// go.mod      module example.com/proj
/// a/foo.go    defines Helper and Version
/// a/bar.go    calls Helper()
/// b/baz.go    imports a, calls a.Helper()
/// c/main.go   imports a, calls a.Helper() and a.Version
/// ```
#[allow(unused)]
pub fn create_test_module() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write_file(root, "go.mod", &format!("module {}\n\ngo 1.22\n", MODULE));

    write_file(
        root,
        "a/foo.go",
        r#"package a

const Version = "1.0"

func Helper() int {
	return 42
}
"#,
    );

    write_file(
        root,
        "a/bar.go",
        r#"package a

func Double() int {
	return Helper() * 2
}
"#,
    );

    write_file(
        root,
        "b/baz.go",
        r#"package b

import (
	"fmt"

	"example.com/proj/a"
)

func Show() {
	fmt.Println(a.Helper())
}
"#,
    );

    write_file(
        root,
        "c/main.go",
        r#"package main

import (
	"fmt"

	"example.com/proj/a"
)

func main() {
	fmt.Println(a.Helper(), a.Version)
}
"#,
    );

    temp
}

/// Runs `go-move move OLD NEW --yes --no-format` from `root`.
///
/// Paths are relative to `root`.
#[allow(unused)]
pub fn run_move(root: &Path, old: &str, new: &str, extra_args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("go-move");
    cmd.arg("move")
        .arg(old)
        .arg(new)
        .arg("--yes")
        .arg("--no-format")
        .args(extra_args)
        .current_dir(root);

    cmd.assert()
}
