//! Integration tests for CLI execution using `assert_cmd`.
//!
//! These tests invoke the compiled binary against graphs written to a
//! temporary directory and verify the generated files.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use ninja_env::{ACCEL_DIR_ENV, BUILD_FILE, LAUNCHER_FILE};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;
use test_support::{GraphBuilder, args_log, fake_ninja, node};

fn mkninja() -> Result<Command> {
    let mut cmd = Command::cargo_bin("mkninja").context("locate mkninja binary")?;
    cmd.env_remove(ACCEL_DIR_ENV);
    Ok(cmd)
}

fn touch_graph() -> GraphBuilder {
    GraphBuilder::new()
        .var("SHELL", "/bin/sh")
        .var("OUT", "out")
        .export("OUT", true)
        .export("MAKEFLAGS", false)
        .with(node("all").phony().deps(&["out/stamp"]))
        .with(node("out/stamp").cmd("mkdir -p $(OUT)").cmd("touch $@"))
        .root("all")
}

#[test]
fn writes_build_file_and_launcher() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let graph = touch_graph().write_json(temp.path())?;
    let out = temp.path().join("gen");
    mkninja()?
        .arg("-C")
        .arg(&out)
        .arg(&graph)
        .assert()
        .success();

    let ninja = fs::read_to_string(out.join(BUILD_FILE)).context("read build file")?;
    ensure!(
        ninja.contains(" command = (mkdir -p out) && (touch out/stamp)\n"),
        "unexpected build file:\n{ninja}"
    );
    let launcher = fs::read_to_string(out.join(LAUNCHER_FILE)).context("read launcher")?;
    ensure!(
        launcher == "#!/bin/sh\nexport OUT=out\nunset MAKEFLAGS\nexec ninja\n",
        "unexpected launcher:\n{launcher}"
    );
    Ok(())
}

#[test]
fn accel_dir_from_environment_enables_the_pool() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let graph = touch_graph().write_json(temp.path())?;
    mkninja()?
        .current_dir(temp.path())
        .env(ACCEL_DIR_ENV, "/opt/goma")
        .arg(&graph)
        .assert()
        .success();

    let ninja = fs::read_to_string(temp.path().join(BUILD_FILE)).context("read build file")?;
    ensure!(ninja.contains("pool local_pool\n"), "pool missing:\n{ninja}");
    let launcher =
        fs::read_to_string(temp.path().join(LAUNCHER_FILE)).context("read launcher")?;
    ensure!(launcher.ends_with("exec ninja -j300\n"), "unexpected launcher:\n{launcher}");
    Ok(())
}

#[test]
fn ambiguous_depfile_fails_without_writing() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let graph = GraphBuilder::new()
        .with(node("x.o").cmd("gcc -c x.c -o x.o -MD -MF a.d -MF b.d"))
        .write_json(temp.path())?;
    mkninja()?
        .current_dir(temp.path())
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple output file candidates"));
    ensure!(!temp.path().join(BUILD_FILE).exists(), "build file written");
    ensure!(!temp.path().join(LAUNCHER_FILE).exists(), "launcher written");
    Ok(())
}

#[test]
fn unreadable_graph_is_reported() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    mkninja()?
        .current_dir(temp.path())
        .arg("missing.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading graph"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn launcher_execs_ninja_from_path() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let graph = touch_graph().write_json(temp.path())?;
    mkninja()?
        .current_dir(temp.path())
        .env(ACCEL_DIR_ENV, "/opt/goma")
        .arg(&graph)
        .assert()
        .success();

    let (ninja_dir, _ninja) = fake_ninja(0)?;
    let path = format!(
        "{}:{}",
        ninja_dir.path().display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let status = std::process::Command::new(temp.path().join(LAUNCHER_FILE))
        .current_dir(temp.path())
        .env("PATH", path)
        .status()
        .context("run launcher")?;
    ensure!(status.success(), "launcher failed: {status}");
    let args = fs::read_to_string(args_log(ninja_dir.path())).context("read ninja args")?;
    ensure!(args == "-j300\n", "unexpected ninja arguments: {args:?}");
    Ok(())
}
