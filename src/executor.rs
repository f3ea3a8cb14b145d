//! Recipe expansion seam.
//!
//! The emitter asks an [`Executor`] for the final, runnable commands of each
//! node. [`RecipeExecutor`] is the stock implementation: it expands variable
//! references and Make's automatic variables, then peels the `@`, `-` and `+`
//! recipe prefixes.

use itertools::Itertools;
use tracing::debug;

use crate::expand::expand;
use crate::graph::{Command, DependencyNode, Vars};

/// Produces the ordered commands that rebuild a node.
pub trait Executor {
    /// Return the runnable commands for `node`.
    ///
    /// When `avoid_io` is set the executor must not touch the filesystem or
    /// spawn processes while expanding; generation runs ahead of the build.
    fn create_runners(&self, node: &DependencyNode, avoid_io: bool) -> Vec<Command>;
}

/// [`Executor`] that expands recipes against graph variables.
#[derive(Debug, Clone, Copy)]
pub struct RecipeExecutor<'a> {
    vars: &'a Vars,
}

impl<'a> RecipeExecutor<'a> {
    /// Create an executor resolving references through `vars`.
    #[must_use]
    pub const fn new(vars: &'a Vars) -> Self {
        Self { vars }
    }

    /// Resolve Make's automatic variables and their `D`/`F` variants.
    ///
    /// Generation never inspects timestamps, so `$?` names every normal
    /// prerequisite like `$^`.
    fn automatic(node: &DependencyNode, name: &str) -> Option<String> {
        let mut chars = name.chars();
        let value = match chars.next()? {
            '@' => node.output.clone(),
            '<' => node.inputs().next().unwrap_or_default().to_owned(),
            '^' | '?' => node.inputs().unique().join(" "),
            '|' => node.order_only_inputs().unique().join(" "),
            _ => return None,
        };
        match chars.as_str() {
            "" => Some(value),
            "D" => Some(value.split_whitespace().map(dir_part).join(" ")),
            "F" => Some(value.split_whitespace().map(file_part).join(" ")),
            _ => None,
        }
    }
}

impl Executor for RecipeExecutor<'_> {
    fn create_runners(&self, node: &DependencyNode, _avoid_io: bool) -> Vec<Command> {
        let lookup = |name: &str| {
            Self::automatic(node, name)
                .or_else(|| self.vars.get(name).cloned())
                .or_else(|| {
                    if name.starts_with(AUTOMATIC_SIGILS) {
                        debug!(
                            output = %node.output,
                            variable = name,
                            "unsupported automatic variable expands to nothing"
                        );
                    }
                    None
                })
        };
        let mut runners = Vec::new();
        for command in &node.commands {
            let expanded = expand(&command.text, &lookup);
            for line in recipe_lines(&expanded) {
                let (text, ignore_error) = peel_prefixes(line);
                if text.is_empty() {
                    continue;
                }
                runners.push(Command {
                    text: text.to_owned(),
                    ignore_error: ignore_error || command.ignore_error,
                });
            }
        }
        runners
    }
}

/// Leading characters of Make's automatic variable names.
const AUTOMATIC_SIGILS: [char; 8] = ['@', '<', '^', '?', '|', '*', '%', '+'];

/// Directory part of `path` as `$(@D)` reports it: `.` when there is none.
fn dir_part(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((dir, _)) => dir,
        None => ".",
    }
}

fn file_part(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, file)| file)
}

/// Split on newlines that are not escaped by a trailing backslash.
fn recipe_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (idx, ch) in text.char_indices() {
        if ch == '\n' && prev != Some('\\') {
            lines.push(text.get(start..idx).unwrap_or_default());
            start = idx + 1;
        }
        prev = Some(ch);
    }
    lines.push(text.get(start..).unwrap_or_default());
    lines
}

/// Strip leading whitespace and `@`, `-`, `+` markers.
///
/// Returns the remaining text and whether `-` was present.
fn peel_prefixes(line: &str) -> (&str, bool) {
    let mut ignore_error = false;
    let rest = line.trim_start_matches(|c: char| match c {
        '-' => {
            ignore_error = true;
            true
        }
        '@' | '+' | ' ' | '\t' => true,
        _ => false,
    });
    (rest, ignore_error)
}
