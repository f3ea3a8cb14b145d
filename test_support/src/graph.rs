//! Fluent construction of dependency graphs for tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mkninja::graph::{Command, DepGraph, DependencyNode, Edge};

/// Start building a node that produces `output`.
pub fn node(output: &str) -> NodeBuilder {
    NodeBuilder {
        node: DependencyNode {
            output: output.to_owned(),
            commands: Vec::new(),
            deps: Vec::new(),
            phony: false,
        },
    }
}

/// Builder for a single [`DependencyNode`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: DependencyNode,
}

impl NodeBuilder {
    /// Append a recipe line.
    #[must_use]
    pub fn cmd(mut self, text: &str) -> Self {
        self.node.commands.push(Command::new(text));
        self
    }

    /// Append a recipe line whose failure is ignored.
    #[must_use]
    pub fn tolerant_cmd(mut self, text: &str) -> Self {
        self.node.commands.push(Command::ignoring_error(text));
        self
    }

    /// Add normal prerequisites.
    #[must_use]
    pub fn deps(mut self, outputs: &[&str]) -> Self {
        self.node.deps.extend(outputs.iter().map(|o| Edge::new(*o)));
        self
    }

    /// Add order-only prerequisites.
    #[must_use]
    pub fn order_only(mut self, outputs: &[&str]) -> Self {
        self.node
            .deps
            .extend(outputs.iter().map(|o| Edge::order_only(*o)));
        self
    }

    /// Mark the node as phony.
    #[must_use]
    pub fn phony(mut self) -> Self {
        self.node.phony = true;
        self
    }

    /// Finish the node.
    pub fn build(self) -> DependencyNode {
        self.node
    }
}

/// Builder for a whole [`DepGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DepGraph,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    #[must_use]
    pub fn with(mut self, node: NodeBuilder) -> Self {
        self.graph.insert(node.build());
        self
    }

    /// Declare a root target.
    #[must_use]
    pub fn root(mut self, output: &str) -> Self {
        self.graph.add_root(output);
        self
    }

    /// Set a variable visible to evaluation.
    #[must_use]
    pub fn var(mut self, name: &str, value: &str) -> Self {
        self.graph.vars.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Track a variable for the launcher.
    #[must_use]
    pub fn export(mut self, name: &str, exported: bool) -> Self {
        self.graph.exports.insert(name.to_owned(), exported);
        self
    }

    /// Finish the graph.
    pub fn build(self) -> DepGraph {
        self.graph
    }

    /// Serialise the graph as JSON into `dir/graph.json`, returning its path.
    pub fn write_json(self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("graph.json");
        let text = serde_json::to_string_pretty(&self.graph).context("serialise graph")?;
        std::fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
