// Binary locator tests over realistic extracted-archive layouts.
// Each test builds its tree in an isolated tempdir (RAII cleanup).

#![cfg(unix)]

use ghrun::locate::find_binary;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, b"#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    path
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[test]
fn finds_repo_named_executable_next_to_docs() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "README.md", 0o644);
    write_file(tmp.path(), "LICENSE", 0o755); // executable doc must still lose
    let widget = write_file(tmp.path(), "widget", 0o755);

    assert_eq!(find_binary(tmp.path(), "widget").unwrap(), widget);
}

#[test]
fn finds_binary_in_nested_directory() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "README.md", 0o644);
    let widget = write_file(tmp.path(), "widget_Linux_x86_64/bin/widget", 0o755);

    assert_eq!(find_binary(tmp.path(), "widget").unwrap(), widget);
}

#[test]
fn respects_depth_limit() {
    let tmp = TempDir::new().unwrap();
    // Four directory levels down is past the depth-3 scan.
    write_file(tmp.path(), "a/b/c/d/widget", 0o755);

    assert!(find_binary(tmp.path(), "widget").is_err());
}

#[test]
fn prefers_name_match_over_earlier_fallback() {
    let tmp = TempDir::new().unwrap();
    // "aaa-helper" sorts before the nested widget in listing order; the
    // scan must keep it only as fallback and still pick the name match.
    write_file(tmp.path(), "aaa-helper", 0o755);
    let widget = write_file(tmp.path(), "dist/widget", 0o755);

    assert_eq!(find_binary(tmp.path(), "widget").unwrap(), widget);
}

#[test]
fn falls_back_to_first_acceptable_executable() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "CHANGELOG.md", 0o644);
    let tool = write_file(tmp.path(), "some-tool", 0o755);

    assert_eq!(find_binary(tmp.path(), "widget").unwrap(), tool);
}

#[test]
fn skips_source_and_config_extensions() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "widget.py", 0o755);
    write_file(tmp.path(), "widget.toml", 0o755);
    let widget = write_file(tmp.path(), "widget", 0o755);

    assert_eq!(find_binary(tmp.path(), "widget").unwrap(), widget);
}

#[test]
fn loose_pass_recovers_stripped_permissions() {
    let tmp = TempDir::new().unwrap();
    // Zip extraction can lose the execute bit; the extensionless file is
    // still found and made executable.
    write_file(tmp.path(), "README.md", 0o644);
    let widget = write_file(tmp.path(), "widget", 0o644);

    let found = find_binary(tmp.path(), "widget").unwrap();
    assert_eq!(found, widget);
    assert_eq!(mode_of(&found) & 0o111, 0o111);
}

#[test]
fn loose_pass_still_excludes_docs() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "LICENSE", 0o644);
    write_file(tmp.path(), "README", 0o644);

    assert!(find_binary(tmp.path(), "widget").is_err());
}

#[test]
fn returns_error_on_empty_tree() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("sub/dir")).unwrap();

    assert!(find_binary(tmp.path(), "widget").is_err());
}

#[test]
fn chosen_binary_gains_execute_bits_for_all_classes() {
    let tmp = TempDir::new().unwrap();
    let widget = write_file(tmp.path(), "widget", 0o700);

    let found = find_binary(tmp.path(), "widget").unwrap();
    assert_eq!(mode_of(&found) & 0o111, 0o111);
    assert_eq!(found, widget);
}

#[test]
fn exe_suffix_counts_as_name_match() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "helper", 0o755);
    let widget = write_file(tmp.path(), "widget.exe", 0o755);

    assert_eq!(find_binary(tmp.path(), "widget").unwrap(), widget);
}
