//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure for the `mkninja` binary, which
//! reads a resolved dependency graph and writes `build.ninja` plus the
//! `ninja.sh` launcher.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use clap::Parser;
use ninja_env::ACCEL_DIR_ENV;

use crate::config::{DEFAULT_ARG_LEN_LIMIT, GenConfig};

/// Compile a resolved Makefile dependency graph into Ninja artefacts.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resolved dependency graph in JSON form.
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Write the generated files into this directory.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Directory of the compile-acceleration front end; empty disables it.
    #[arg(long, value_name = "DIR", env = ACCEL_DIR_ENV)]
    pub accel_dir: Option<Utf8PathBuf>,

    /// Commands longer than this many bytes are written to response files.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_ARG_LEN_LIMIT)]
    pub arg_len_limit: usize,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the generation settings selected on the command line.
    #[must_use]
    pub fn gen_config(&self) -> GenConfig {
        let config = GenConfig {
            arg_len_limit: self.arg_len_limit,
            ..GenConfig::default()
        };
        match &self.accel_dir {
            Some(dir) => config.with_accel_dir(dir.clone()),
            None => config,
        }
    }
}
