//! Resolved dependency graph consumed by the Ninja emitter.
//!
//! The graph is produced by an upstream Makefile evaluator and is read-only to
//! this crate. Nodes are keyed by their output path; edges refer to other
//! nodes by that same path, so shared prerequisites (diamonds) are represented
//! once and referenced many times.
//!
//! # Examples
//!
//! ```
//! use mkninja::graph::{Command, DepGraph, DependencyNode, Edge};
//!
//! let mut graph = DepGraph::default();
//! graph.insert(DependencyNode {
//!     output: "app".into(),
//!     commands: vec![Command::new("cc -o app main.o")],
//!     deps: vec![Edge::new("main.o")],
//!     phony: false,
//! });
//! assert_eq!(graph.roots().count(), 1);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Map of variable names to their unexpanded Makefile text.
pub type Vars = IndexMap<String, String>;

/// Map of variable names to their export state.
///
/// `true` exports the variable into the build environment; `false` unsets it
/// so the child process does not inherit an ambient value.
pub type Exports = IndexMap<String, bool>;

/// A single recipe line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Raw shell text of the recipe line.
    pub text: String,
    /// Whether a non-zero exit status should be tolerated.
    #[serde(default)]
    pub ignore_error: bool,
}

impl Command {
    /// Create a command that stops the chain on failure.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ignore_error: false,
        }
    }

    /// Create a command whose failure is ignored.
    #[must_use]
    pub fn ignoring_error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ignore_error: true,
        }
    }
}

/// Reference from a node to one of its prerequisites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Output path of the prerequisite node.
    pub output: String,
    /// Prerequisite must exist first but does not trigger rebuilds.
    #[serde(default)]
    pub order_only: bool,
}

impl Edge {
    /// Create a normal prerequisite edge.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            order_only: false,
        }
    }

    /// Create an order-only prerequisite edge.
    #[must_use]
    pub fn order_only(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            order_only: true,
        }
    }
}

/// A target in the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Output path identifying this node.
    pub output: String,
    /// Recipe lines in execution order.
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Prerequisites in declaration order.
    #[serde(default)]
    pub deps: Vec<Edge>,
    /// Synthetic target with no file product.
    #[serde(default)]
    pub phony: bool,
}

impl DependencyNode {
    /// Return `true` for a node that is merely referenced and has nothing to
    /// build: no commands, no prerequisites and not phony.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.commands.is_empty() && self.deps.is_empty() && !self.phony
    }

    /// Outputs of the normal (non order-only) prerequisites.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.deps
            .iter()
            .filter(|edge| !edge.order_only)
            .map(|edge| edge.output.as_str())
    }

    /// Outputs of the order-only prerequisites.
    pub fn order_only_inputs(&self) -> impl Iterator<Item = &str> {
        self.deps
            .iter()
            .filter(|edge| edge.order_only)
            .map(|edge| edge.output.as_str())
    }
}

/// The complete input to a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawGraph", into = "RawGraph")]
pub struct DepGraph {
    nodes: IndexMap<String, DependencyNode>,
    roots: Vec<String>,
    /// Variables visible to the evaluator.
    pub vars: Vars,
    /// Variables to export or unset in the launcher script.
    pub exports: Exports,
}

impl DepGraph {
    /// Add or replace a node, keyed by its output path.
    pub fn insert(&mut self, node: DependencyNode) {
        self.nodes.insert(node.output.clone(), node);
    }

    /// Declare an explicit traversal root.
    ///
    /// Without explicit roots every node is treated as a root, in insertion
    /// order.
    pub fn add_root(&mut self, output: impl Into<String>) {
        self.roots.push(output.into());
    }

    /// Look up a node by output path.
    #[must_use]
    pub fn get(&self, output: &str) -> Option<&DependencyNode> {
        self.nodes.get(output)
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.values()
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` when the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Output paths the traversal starts from.
    pub fn roots(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        if self.roots.is_empty() {
            Box::new(self.nodes.keys().map(String::as_str))
        } else {
            Box::new(self.roots.iter().map(String::as_str))
        }
    }
}

/// On-disk shape of a [`DepGraph`]: nodes as a list rather than a map.
#[derive(Serialize, Deserialize)]
struct RawGraph {
    nodes: Vec<DependencyNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    roots: Vec<String>,
    #[serde(default)]
    vars: Vars,
    #[serde(default)]
    exports: Exports,
}

impl From<RawGraph> for DepGraph {
    fn from(raw: RawGraph) -> Self {
        let mut graph = Self {
            roots: raw.roots,
            vars: raw.vars,
            exports: raw.exports,
            ..Self::default()
        };
        for node in raw.nodes {
            graph.insert(node);
        }
        graph
    }
}

impl From<DepGraph> for RawGraph {
    fn from(graph: DepGraph) -> Self {
        Self {
            nodes: graph.nodes.into_values().collect(),
            roots: graph.roots,
            vars: graph.vars,
            exports: graph.exports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DependencyNode { output: "x".into(), commands: vec![], deps: vec![], phony: false }, true)]
    #[case(DependencyNode { output: "x".into(), commands: vec![], deps: vec![], phony: true }, false)]
    #[case(DependencyNode { output: "x".into(), commands: vec![Command::new("true")], deps: vec![], phony: false }, false)]
    #[case(DependencyNode { output: "x".into(), commands: vec![], deps: vec![Edge::new("y")], phony: false }, false)]
    fn dangling_detection(#[case] node: DependencyNode, #[case] expected: bool) {
        assert_eq!(node.is_dangling(), expected);
    }

    #[test]
    fn roots_default_to_all_nodes_in_order() {
        let mut graph = DepGraph::default();
        graph.insert(DependencyNode {
            output: "b".into(),
            commands: Vec::new(),
            deps: Vec::new(),
            phony: true,
        });
        graph.insert(DependencyNode {
            output: "a".into(),
            commands: Vec::new(),
            deps: Vec::new(),
            phony: true,
        });
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec!["b", "a"]);

        graph.add_root("a");
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn deserialises_json_graph() {
        let json = r#"{
            "nodes": [
                {
                    "output": "all",
                    "deps": [{"output": "a.o"}, {"output": "gen", "order_only": true}],
                    "phony": true
                },
                {
                    "output": "a.o",
                    "commands": [{"text": "cc -c a.c -o a.o"}, {"text": "rm -f junk", "ignore_error": true}]
                }
            ],
            "exports": {"PATH": true, "CDPATH": false}
        }"#;
        let graph: DepGraph = serde_json::from_str(json).expect("parse graph");
        assert_eq!(graph.len(), 2);
        let all = graph.get("all").expect("all node");
        assert_eq!(all.inputs().collect::<Vec<_>>(), vec!["a.o"]);
        assert_eq!(all.order_only_inputs().collect::<Vec<_>>(), vec!["gen"]);
        let obj = graph.get("a.o").expect("a.o node");
        assert_eq!(
            obj.commands,
            vec![
                Command::new("cc -c a.c -o a.o"),
                Command::ignoring_error("rm -f junk")
            ]
        );
        assert_eq!(graph.exports.get("CDPATH"), Some(&false));
    }
}
