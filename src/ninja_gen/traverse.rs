//! Iterative depth-first walk over the dependency graph.
//!
//! Nodes are handed to the visitor in the same pre-order a recursive
//! "visit, then recurse into each prerequisite" walk would produce, but the
//! walk runs on an explicit stack so graph depth never grows the call stack.
//! Each node is visited at most once; reaching a node that is still on the
//! current path is reported as a cycle.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::debug;

use crate::error::GenError;
use crate::graph::{DepGraph, DependencyNode};

/// Tracks the visitation state of a node during the walk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

#[derive(Clone, Copy, Debug)]
enum Frame<'g> {
    Enter(&'g str),
    Exit(&'g str),
}

/// Walk every node reachable from the graph roots, calling `visit` once per
/// node before any of its prerequisites.
///
/// Prerequisites missing from the graph are plain files with nothing to
/// build; they are skipped.
pub(super) fn walk<'g, F>(graph: &'g DepGraph, mut visit: F) -> Result<(), GenError>
where
    F: FnMut(&'g DependencyNode) -> Result<(), GenError>,
{
    let mut walker = Walker::new(graph);
    for root in graph.roots() {
        walker.stack.push(Frame::Enter(root));
        walker.drain(&mut visit)?;
    }
    Ok(())
}

struct Walker<'g> {
    graph: &'g DepGraph,
    stack: Vec<Frame<'g>>,
    path: Vec<&'g str>,
    states: HashMap<&'g str, VisitState>,
}

impl<'g> Walker<'g> {
    fn new(graph: &'g DepGraph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
            path: Vec::new(),
            states: HashMap::with_capacity(graph.len()),
        }
    }

    fn drain<F>(&mut self, visit: &mut F) -> Result<(), GenError>
    where
        F: FnMut(&'g DependencyNode) -> Result<(), GenError>,
    {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Enter(output) => self.enter(output, visit)?,
                Frame::Exit(output) => {
                    self.path.pop();
                    self.states.insert(output, VisitState::Visited);
                }
            }
        }
        Ok(())
    }

    fn enter<F>(&mut self, output: &'g str, visit: &mut F) -> Result<(), GenError>
    where
        F: FnMut(&'g DependencyNode) -> Result<(), GenError>,
    {
        match self.states.get(output) {
            Some(VisitState::Visited) => return Ok(()),
            Some(VisitState::Visiting) => {
                return Err(GenError::CircularDependency {
                    cycle: self.cycle_through(output),
                });
            }
            None => {}
        }

        let Some(node) = self.graph.get(output) else {
            debug!(missing = output, "skipping prerequisite without a graph node");
            self.states.insert(output, VisitState::Visited);
            return Ok(());
        };

        self.states.insert(output, VisitState::Visiting);
        self.path.push(output);
        visit(node)?;
        self.stack.push(Frame::Exit(output));
        for edge in node.deps.iter().rev() {
            self.stack.push(Frame::Enter(&edge.output));
        }
        Ok(())
    }

    fn cycle_through(&self, output: &str) -> Vec<String> {
        let start = self
            .path
            .iter()
            .position(|n| *n == output)
            .unwrap_or_else(|| {
                debug_assert!(false, "visiting node must be on the path");
                0
            });
        let mut cycle: Vec<String> = self
            .path
            .iter()
            .skip(start)
            .map(|n| (*n).to_owned())
            .collect();
        cycle.push(output.to_owned());
        canonicalize_cycle(cycle)
    }
}

/// Rotate a closed cycle so it starts, and ends, at its smallest node.
fn canonicalize_cycle(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.pop().is_none() {
        return cycle;
    }
    if let Some(start) = cycle.iter().position_min() {
        cycle.rotate_left(start);
    }
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    cycle
}
