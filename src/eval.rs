//! Variable evaluation seam.
//!
//! Generation only needs to turn a variable name into its final text, for
//! the launcher's `SHELL` and exported variables. [`VarEvaluator`] provides
//! that over a plain [`Vars`] map; a full Makefile engine can implement
//! [`Evaluator`] directly.

use crate::expand::expand;
use crate::graph::Vars;

/// Resolves a variable name to its expanded text.
pub trait Evaluator {
    /// Expand the variable `name`. Unknown variables yield an empty string.
    fn evaluate(&self, name: &str) -> String;
}

/// [`Evaluator`] backed by a map of recursively expanded variables.
#[derive(Debug, Clone, Copy)]
pub struct VarEvaluator<'a> {
    vars: &'a Vars,
}

impl<'a> VarEvaluator<'a> {
    /// Wrap the variables of a graph.
    #[must_use]
    pub const fn new(vars: &'a Vars) -> Self {
        Self { vars }
    }

    /// Expand all references in arbitrary `text`.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        expand(text, &|name: &str| self.vars.get(name).cloned())
    }
}

impl Evaluator for VarEvaluator<'_> {
    fn evaluate(&self, name: &str) -> String {
        self.vars
            .get(name)
            .map_or_else(String::new, |raw| self.expand(raw))
    }
}
