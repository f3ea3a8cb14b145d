//! Generation driver.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the graph, renders both artefacts in memory and only then writes
//! them, so a failed run leaves previously generated files untouched.

mod file_io;

pub use file_io::write_artefacts;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::GenConfig;
use crate::error::GenError;
use crate::eval::VarEvaluator;
use crate::executor::RecipeExecutor;
use crate::graph::DepGraph;
use crate::{launcher, ninja_gen};

/// Rendered contents of the generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artefacts {
    /// Text of `build.ninja`.
    pub build_file: String,
    /// Text of the `ninja.sh` launcher.
    pub launcher: String,
}

/// Execute the parsed [`Cli`].
///
/// # Errors
///
/// Returns an error if the graph cannot be read, generation fails, or the
/// artefacts cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    let graph = load_graph(&cli.graph)?;
    let config = cli.gen_config();
    debug!(
        nodes = graph.len(),
        accelerated = config.accelerated(),
        "generating Ninja artefacts"
    );
    let artefacts = generate(&graph, &config).context("generating Ninja artefacts")?;
    write_artefacts(&cli.directory, &artefacts)?;
    info!("Generated Ninja files in {}", cli.directory.display());
    Ok(())
}

/// Read a JSON dependency graph from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid graph.
pub fn load_graph(path: &Path) -> Result<DepGraph> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading graph {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing graph {}", path.display()))
}

/// Render `build.ninja` and the launcher using the stock collaborators.
///
/// # Errors
///
/// Returns [`GenError`] when the Ninja file cannot be generated.
pub fn generate(graph: &DepGraph, config: &GenConfig) -> Result<Artefacts, GenError> {
    let evaluator = VarEvaluator::new(&graph.vars);
    let launcher = launcher::render(&evaluator, &graph.exports, config);
    let executor = RecipeExecutor::new(&graph.vars);
    let build_file = ninja_gen::generate(graph, &executor, config)?;
    Ok(Artefacts {
        build_file,
        launcher,
    })
}
