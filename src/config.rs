//! Generation settings.
//!
//! A [`GenConfig`] is threaded explicitly into the chain builder, the Ninja
//! emitter and the launcher writer so a generation run depends only on its
//! inputs.

use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};

/// Commands longer than this are moved into a response file. Linux accepts
/// roughly 130kB; this leaves headroom.
pub const DEFAULT_ARG_LEN_LIMIT: usize = 100_000;

/// Parallelism requested from Ninja when compile acceleration is enabled.
pub const DEFAULT_ACCEL_JOBS: usize = 300;

/// Settings shared by every stage of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Directory holding the compile-acceleration front end, if enabled.
    pub accel_dir: Option<Utf8PathBuf>,
    /// Maximum inline command length before spilling to a response file.
    pub arg_len_limit: usize,
    /// Depth of `local_pool`, used by commands the accelerator cannot take.
    pub pool_depth: usize,
    /// `-j` value written into the launcher when acceleration is enabled.
    pub accel_jobs: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            accel_dir: None,
            arg_len_limit: DEFAULT_ARG_LEN_LIMIT,
            pool_depth: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            accel_jobs: DEFAULT_ACCEL_JOBS,
        }
    }
}

impl GenConfig {
    /// Enable acceleration through the front end in `dir`.
    ///
    /// An empty path leaves acceleration disabled.
    #[must_use]
    pub fn with_accel_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        let path: Utf8PathBuf = dir.into();
        self.accel_dir = (!path.as_str().is_empty()).then_some(path);
        self
    }

    /// Active acceleration directory, if any.
    #[must_use]
    pub fn accel_dir(&self) -> Option<&Utf8Path> {
        self.accel_dir.as_deref()
    }

    /// Return `true` when compile acceleration is enabled.
    #[must_use]
    pub const fn accelerated(&self) -> bool {
        self.accel_dir.is_some()
    }
}
