//! Integration tests for the uploader-enumerator CLI

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_cmd() -> Command {
    let mut cmd = Command::cargo_bin("uploader-enumerator").unwrap();
    cmd.env_remove("UPLOADER_RULES_FILE")
        .env_remove("UPLOADER_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn create_tree(base: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn run_json(args: &[&str], root: &Path) -> serde_json::Value {
    let output = get_cmd().arg(root).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

fn files_of(value: &serde_json::Value) -> Vec<String> {
    value["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_prints_root_and_files() {
    let temp_dir = TempDir::new().unwrap();
    create_tree(
        temp_dir.path(),
        &[("README.md", "readme"), ("src/main.py", "print('hi')")],
    );

    let value = run_json(&[], temp_dir.path());

    let expected_root = fs::canonicalize(temp_dir.path()).unwrap();
    assert_eq!(value["root"], expected_root.to_str().unwrap());
    assert_eq!(files_of(&value), vec!["README.md", "src/main.py"]);
}

#[test]
fn test_include_extension_overrides_excluded_folder() {
    let temp_dir = TempDir::new().unwrap();
    create_tree(
        temp_dir.path(),
        &[
            (".uploaderignore", "[exclude_folder]\nbuild\n\n[include_extension]\nmd\n"),
            ("build/notes.md", "# notes"),
            ("build/ignored.log", "err"),
            ("src/main.py", "print()"),
        ],
    );

    let value = run_json(&[], temp_dir.path());
    assert_eq!(files_of(&value), vec!["build/notes.md", "src/main.py"]);
}

#[test]
fn test_case_insensitive_flag() {
    let temp_dir = TempDir::new().unwrap();
    create_tree(
        temp_dir.path(),
        &[
            (".uploaderignore", "[include_file]\n*.MD\n[exclude_extension]\nmd\n"),
            ("notes.md", "n"),
        ],
    );

    assert!(files_of(&run_json(&[], temp_dir.path())).is_empty());
    assert_eq!(
        files_of(&run_json(&["--case-insensitive"], temp_dir.path())),
        vec!["notes.md"]
    );
}

#[test]
fn test_custom_rules_file_from_env() {
    let temp_dir = TempDir::new().unwrap();
    create_tree(
        temp_dir.path(),
        &[("rules.ini", "[exclude_extension]\ntmp\n"), ("a.tmp", "x"), ("b.txt", "x")],
    );

    let output = get_cmd()
        .env("UPLOADER_RULES_FILE", "rules.ini")
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(files_of(&value), vec!["b.txt"]);
}

#[test]
fn test_config_file_supplies_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("register");
    create_tree(&root, &[(".env", "x"), ("visible.txt", "x")]);
    let config_path = temp_dir.path().join("uploader.toml");
    fs::write(&config_path, "dotfiles = false\n").unwrap();

    let config_arg = config_path.to_str().unwrap();
    assert_eq!(
        files_of(&run_json(&["--config", config_arg], &root)),
        vec!["visible.txt"]
    );
    assert_eq!(
        files_of(&run_json(&["--config", config_arg, "--dotfiles"], &root)),
        vec![".env", "visible.txt"]
    );
}

#[test]
fn test_rules_file_outside_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("register");
    create_tree(&root, &[("a.txt", "a")]);
    fs::write(temp_dir.path().join("rules.ini"), "[exclude_file]\n*\n").unwrap();

    get_cmd()
        .arg(&root)
        .args(["--rules-file", "../rules.ini"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("must be a plain file name"));
}

#[test]
fn test_invalid_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("uploader.toml");
    fs::write(&config_path, "dotfiles = \"maybe\"\n").unwrap();

    get_cmd()
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_missing_root_exits_with_invalid_root() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .arg(temp_dir.path().join("does-not-exist"))
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_file_root_exits_with_invalid_root() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    get_cmd()
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_conflicting_case_flags_are_rejected() {
    let temp_dir = TempDir::new().unwrap();

    get_cmd()
        .arg(temp_dir.path())
        .args(["--case-sensitive", "--case-insensitive"])
        .assert()
        .failure();
}

#[test]
fn test_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("register");
    create_tree(&root, &[("a.txt", "a")]);
    let output_path = temp_dir.path().join("files.json");

    get_cmd()
        .arg(&root)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("written to"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(files_of(&value), vec!["a.txt"]);
}

#[test]
fn test_compact_output_is_one_line() {
    let temp_dir = TempDir::new().unwrap();
    create_tree(temp_dir.path(), &[("a.txt", "a")]);

    let output = get_cmd()
        .arg(temp_dir.path())
        .arg("--compact")
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end().lines().count(), 1);
}

#[test]
fn test_output_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    create_tree(
        temp_dir.path(),
        &[
            (".uploaderignore", "[exclude_file]\n*.bak\n"),
            ("z.txt", "z"),
            ("a/b/c.txt", "c"),
            ("a/old.bak", "b"),
        ],
    );

    let first = get_cmd().arg(temp_dir.path()).output().unwrap().stdout;
    let second = get_cmd().arg(temp_dir.path()).output().unwrap().stdout;
    assert_eq!(first, second);
}

#[cfg(unix)]
#[test]
fn test_warnings_go_to_stderr() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    create_tree(root, &[("locked/secret.txt", "x"), ("open.txt", "x")]);
    fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still list the directory
    if fs::read_dir(root.join("locked")).is_ok() {
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let output = get_cmd().arg(root).output().unwrap();
    fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(files_of(&value), vec!["open.txt"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("locked"));
}
