//! Artefact writing.
//!
//! Both files are first written to `.tmp` siblings in the output directory
//! and renamed into place only once every staged file is complete.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use cap_std::{ambient_authority, fs as cap_fs};
use ninja_env::{BUILD_FILE, LAUNCHER_FILE};
use tracing::{debug, info};

use super::Artefacts;

/// File mode of the launcher script.
#[cfg(unix)]
const LAUNCHER_MODE: u32 = 0o755;

struct Staged<'a> {
    name: &'a str,
    staging: String,
}

/// Write `build.ninja` and `ninja.sh` into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be opened or any file cannot be
/// written, made executable or renamed. Staged files are removed on failure.
pub fn write_artefacts(dir: &Path, artefacts: &Artefacts) -> AnyResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let root = cap_fs::Dir::open_ambient_dir(dir, ambient_authority())
        .with_context(|| format!("opening output directory {}", dir.display()))?;

    let files = [
        (BUILD_FILE, artefacts.build_file.as_str(), false),
        (LAUNCHER_FILE, artefacts.launcher.as_str(), true),
    ];
    let mut staged = Vec::with_capacity(files.len());
    for (name, content, executable) in files {
        let staging = format!("{name}.tmp");
        if let Err(err) = stage_file(&root, &staging, content, executable) {
            discard(&root, &staged);
            discard_one(&root, &staging);
            return Err(err);
        }
        staged.push(Staged { name, staging });
    }

    for (idx, file) in staged.iter().enumerate() {
        if let Err(err) = root.rename(&file.staging, &root, file.name) {
            discard(&root, staged.get(idx..).unwrap_or_default());
            return Err(err).with_context(|| format!("renaming {} into place", file.name));
        }
        info!("Wrote {} to {}", file.name, dir.display());
    }
    Ok(())
}

fn stage_file(dir: &cap_fs::Dir, name: &str, content: &str, executable: bool) -> AnyResult<()> {
    let mut file = dir
        .create(name)
        .with_context(|| format!("creating {name}"))?
        .into_std();
    file.write_all(content.as_bytes())
        .with_context(|| format!("writing {name}"))?;
    file.flush().with_context(|| format!("flushing {name}"))?;
    if executable {
        mark_executable(&file).with_context(|| format!("making {name} executable"))?;
    }
    file.sync_all().with_context(|| format!("syncing {name}"))?;
    Ok(())
}

#[cfg(unix)]
fn mark_executable(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(LAUNCHER_MODE))
}

#[cfg(not(unix))]
fn mark_executable(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

fn discard(dir: &cap_fs::Dir, staged: &[Staged<'_>]) {
    for file in staged {
        discard_one(dir, &file.staging);
    }
}

fn discard_one(dir: &cap_fs::Dir, staging: &str) {
    if let Err(err) = dir.remove_file(staging) {
        debug!(file = staging, error = %err, "could not remove staged file");
    }
}
