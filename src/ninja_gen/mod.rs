//! Ninja file generator.
//!
//! This module converts a [`DepGraph`] into the textual representation
//! expected by the Ninja build system. Every reachable node produces one
//! `rule` block (when it has commands) and one `build` statement, in the
//! pre-order of a depth-first walk from the graph roots. Rule names are
//! allocated sequentially, so output is deterministic for a given graph.

mod traverse;

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use tracing::debug;

use crate::chain::ChainBuilder;
use crate::config::GenConfig;
use crate::depfile;
use crate::error::GenError;
use crate::executor::Executor;
use crate::graph::{DepGraph, DependencyNode};

/// Built-in Ninja rule used by nodes without commands.
pub const PHONY_RULE: &str = "phony";

/// Pool bounding commands that cannot be dispatched to the accelerator.
pub const LOCAL_POOL: &str = "local_pool";

/// Command that runs a response file in place of a long inline command.
pub const RSP_COMMAND: &str = "sh $out.rsp";

/// Generate a Ninja build file as a string.
///
/// # Errors
///
/// Returns [`GenError`] when a command's depfile cannot be determined
/// unambiguously or the graph contains a cycle.
///
/// # Examples
///
/// ```
/// use mkninja::config::GenConfig;
/// use mkninja::executor::RecipeExecutor;
/// use mkninja::graph::{Command, DepGraph, DependencyNode};
/// use mkninja::ninja_gen::generate;
///
/// let mut graph = DepGraph::default();
/// graph.insert(DependencyNode {
///     output: "hello".into(),
///     commands: vec![Command::new("echo hi > $@")],
///     deps: Vec::new(),
///     phony: false,
/// });
/// let executor = RecipeExecutor::new(&graph.vars);
/// let ninja = generate(&graph, &executor, &GenConfig::default()).unwrap();
/// assert!(ninja.contains("build hello: rule0\n"));
/// ```
pub fn generate(
    graph: &DepGraph,
    executor: &dyn Executor,
    config: &GenConfig,
) -> Result<String, GenError> {
    let mut generator = NinjaGenerator::new(executor, config);
    generator.write_header();
    traverse::walk(graph, |node| generator.emit_node(node))?;
    Ok(generator.out)
}

struct NinjaGenerator<'a> {
    executor: &'a dyn Executor,
    config: &'a GenConfig,
    chain: ChainBuilder<'a>,
    next_rule: usize,
    out: String,
}

impl<'a> NinjaGenerator<'a> {
    fn new(executor: &'a dyn Executor, config: &'a GenConfig) -> Self {
        Self {
            executor,
            config,
            chain: ChainBuilder::new(config),
            next_rule: 0,
            out: String::new(),
        }
    }

    fn write_header(&mut self) {
        self.out.push_str("# Generated by mkninja\n\n");
        if self.config.accelerated() {
            self.out.push_str(&format!(
                "pool {LOCAL_POOL}\n depth = {}\n",
                self.config.pool_depth
            ));
        }
    }

    fn rule_name(&mut self) -> String {
        let name = format!("rule{}", self.next_rule);
        self.next_rule += 1;
        name
    }

    fn emit_node(&mut self, node: &DependencyNode) -> Result<(), GenError> {
        if node.is_dangling() {
            debug!(output = %node.output, "skipping node with nothing to build");
            return Ok(());
        }

        let runners = self.executor.create_runners(node, true);
        let mut rule = String::from(PHONY_RULE);
        let mut local_pool = false;
        if !runners.is_empty() {
            let chain = self.chain.build(&runners);
            let depfile = depfile::resolve(&chain.text)?;
            rule = self.rule_name();
            let block = RuleBlock {
                name: &rule,
                depfile: depfile.as_deref(),
                command: &chain.text,
                arg_len_limit: self.config.arg_len_limit,
            };
            self.out.push_str(&block.to_string());
            local_pool = chain.needs_local_pool;
            debug!(output = %node.output, rule = %rule, "emitted rule");
        }

        self.out.push_str(
            &BuildLine {
                node,
                rule: &rule,
                local_pool,
            }
            .to_string(),
        );
        Ok(())
    }
}

/// A `rule` block for one target's command chain.
struct RuleBlock<'a> {
    name: &'a str,
    depfile: Option<&'a str>,
    command: &'a str,
    arg_len_limit: usize,
}

impl Display for RuleBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "rule {}", self.name)?;
        writeln!(f, " description = build $out")?;
        if let Some(depfile) = self.depfile {
            writeln!(f, " depfile = {depfile}")?;
        }
        if self.command.len() > self.arg_len_limit {
            writeln!(f, " rspfile = $out.rsp")?;
            writeln!(f, " rspfile_content = {}", self.command)?;
            writeln!(f, " command = {RSP_COMMAND}")
        } else {
            writeln!(f, " command = {}", self.command)
        }
    }
}

/// A `build` statement binding a node's output to its rule.
struct BuildLine<'a> {
    node: &'a DependencyNode,
    rule: &'a str,
    local_pool: bool,
}

impl Display for BuildLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "build {}: {}", self.node.output, self.rule)?;
        let mut inputs = self.node.inputs().peekable();
        if inputs.peek().is_some() {
            write!(f, " {}", inputs.join(" "))?;
        }
        let mut order_only = self.node.order_only_inputs().peekable();
        if order_only.peek().is_some() {
            write!(f, " || {}", order_only.join(" "))?;
        }
        writeln!(f)?;
        if self.local_pool {
            writeln!(f, " pool = {LOCAL_POOL}")?;
        }
        Ok(())
    }
}
