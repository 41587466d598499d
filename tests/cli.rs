//! CLI tests for the `emu-recipe` binary
//!
//! A stand-in `cmake` script (Unix only) lets the build commands run to
//! completion without a real toolchain.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn emu_recipe() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_emu-recipe"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_profile(dir: &Path) -> PathBuf {
    let path = dir.join("profile.toml");
    fs::write(
        &path,
        r#"[settings]
os = "Linux"
compiler = "gcc"
"compiler.version" = "13"
build_type = "Release"
arch = "x86_64"
"#,
    )
    .unwrap();
    path
}

fn seed_cache(dir: &Path) -> PathBuf {
    let cache = dir.join("cache");
    fs::create_dir_all(cache.join("fmt").join("10.2.1")).unwrap();
    fs::create_dir_all(cache.join("open62541").join("1.3.9")).unwrap();
    cache
}

#[cfg(unix)]
fn fake_cmake(dir: &Path, configure_exit: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("cmake");
    let script = format!(
        r#"#!/bin/sh
case "$1" in
  --version) echo "cmake version 3.28.0" ;;
  --build) exit 0 ;;
  *) echo "configure called" >&2; exit {configure_exit} ;;
esac
"#
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn run_build(dir: &Path, cmake: &Path, extra: &[&str]) -> Output {
    let root = dir.join("emu");
    fs::create_dir_all(&root).unwrap();
    let profile = write_profile(dir);
    let cache = seed_cache(dir);

    emu_recipe()
        .arg("build")
        .arg("--profile")
        .arg(&profile)
        .arg("--cache")
        .arg(&cache)
        .arg("--root")
        .arg(&root)
        .args(extra)
        .env("CMAKE", cmake)
        .output()
        .expect("Failed to run emu-recipe")
}

#[test]
fn test_inspect_prints_metadata() {
    let tmp = tempfile::tempdir().unwrap();
    let profile = write_profile(tmp.path());
    let output = emu_recipe()
        .arg("inspect")
        .arg("--profile")
        .arg(&profile)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "emu");
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["license"], "MIT");
    assert_eq!(json["description"], "Set of utilities for C++, CUDA and python");
    assert_eq!(json["settings"]["build_type"], "Release");
    assert_eq!(json["requires"].as_array().unwrap().len(), 2);
    assert_eq!(json["package_id"].as_str().unwrap().len(), 40);
}

#[test]
fn test_requires_lists_pinned_dependencies() {
    let output = emu_recipe().arg("requires").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fmt/10.2.1"));
    assert!(stdout.contains("open62541/1.3.9"));
}

#[test]
fn test_invalid_option_fails_before_build() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("emu");
    fs::create_dir_all(&root).unwrap();

    let output = emu_recipe()
        .args(["build", "-o", "shared=maybe", "--root"])
        .arg(&root)
        .arg("--profile")
        .arg(write_profile(tmp.path()))
        .env("CMAKE", "/nonexistent/cmake")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value 'maybe' for option 'shared'"));
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn test_unknown_option_rejected() {
    let output = emu_recipe()
        .args(["inspect", "-o", "with_cuda=True"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown option 'with_cuda'"));
}

#[test]
fn test_missing_cmake_exits_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_build(tmp.path(), Path::new("/nonexistent/cmake"), &[]);
    assert!(!output.status.success());
    assert!(!tmp.path().join("emu").join("build").exists());
}

#[cfg(unix)]
#[test]
fn test_build_with_stand_in_cmake() {
    let tmp = tempfile::tempdir().unwrap();
    let cmake = fake_cmake(tmp.path(), 0);
    let output = run_build(tmp.path(), &cmake, &["-s", "build_type=Debug"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let generators = tmp
        .path()
        .join("emu")
        .join("build")
        .join("Debug")
        .join("generators");
    assert!(generators.join("emu_toolchain.cmake").is_file());
}

#[cfg(unix)]
#[test]
fn test_configure_failure_exits_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let cmake = fake_cmake(tmp.path(), 1);
    let output = run_build(tmp.path(), &cmake, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration failed"));
    assert!(stderr.contains("configure called"));
}

#[cfg(unix)]
#[test]
fn test_missing_dependency_exits_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("emu");
    fs::create_dir_all(&root).unwrap();
    let empty_cache = tmp.path().join("empty");

    let cmake = fake_cmake(tmp.path(), 0);

    let output = emu_recipe()
        .arg("build")
        .arg("--profile")
        .arg(write_profile(tmp.path()))
        .arg("--cache")
        .arg(&empty_cache)
        .arg("--root")
        .arg(&root)
        .env("CMAKE", &cmake)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fmt/10.2.1 is not available"));
}
