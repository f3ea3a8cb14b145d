//! Test utilities shared by the integration suites.
//!
//! Provides a fluent builder for dependency graphs, helpers for writing
//! graphs to disk for the binary, and fake `ninja` executables used to
//! exercise generated launcher scripts.

pub mod graph;
pub mod ninja;

pub use graph::{GraphBuilder, NodeBuilder, node};

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Create a fake Ninja executable that records its arguments and exits with
/// `exit_code`.
///
/// The arguments of each invocation are appended, space separated, to
/// `ninja.args` inside the returned directory. Returns the temporary
/// directory and the path to the executable.
pub fn fake_ninja(exit_code: i32) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("fake_ninja: create temp dir")?;
    let path = dir.path().join(ninja_env::NINJA_PROGRAM);
    let log = args_log(dir.path());
    let mut file = File::create(&path)
        .with_context(|| format!("fake_ninja: create script {}", path.display()))?;
    writeln!(
        file,
        "#!/bin/sh\necho \"$@\" >> '{}'\nexit {exit_code}",
        log.display()
    )
    .with_context(|| format!("fake_ninja: write script {}", path.display()))?;
    make_script_executable(&path)?;
    Ok((dir, path))
}

/// Location of the argument log written by [`fake_ninja`].
pub fn args_log(dir: &Path) -> PathBuf {
    dir.join("ninja.args")
}

#[cfg(unix)]
fn make_script_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .with_context(|| format!("read metadata {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("set permissions {}", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_script_executable(_path: &Path) -> Result<()> {
    Ok(())
}
