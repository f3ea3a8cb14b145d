//! Errors that abort a generation run.
//
// Module-level suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others. Since `#[expect]` fails when the lint doesn't
// fire, and `unfulfilled_lint_expectations` cannot be expected, we must use
// `#[allow]` here. FIXME: remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

/// Fatal conditions raised while translating a graph into Ninja syntax.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum GenError {
    /// A command names its output file more than once, so the depfile
    /// location cannot be inferred safely.
    #[error("multiple output file candidates in {command}")]
    #[diagnostic(
        code(mkninja::depfile::ambiguous),
        help("pass a single -MF or -o flag to the compiler")
    )]
    MultipleDepfileCandidates {
        /// The offending command text.
        command: String,
    },

    /// Dependency tracking was requested but no output flag was found.
    #[error("cannot find the depfile in {command}")]
    #[diagnostic(
        code(mkninja::depfile::not_found),
        help("add -MF <file> or -o <file> next to -MD/-MMD")
    )]
    DepfileNotFound {
        /// The offending command text.
        command: String,
    },

    /// The graph contains a dependency cycle.
    #[error("circular dependency detected: {}", .cycle.iter().join(" -> "))]
    #[diagnostic(
        code(mkninja::graph::cycle),
        help("break the cycle by removing one of the listed prerequisites")
    )]
    CircularDependency {
        /// Outputs forming the cycle, starting and ending with the same node.
        cycle: Vec<String>,
    },
}
