//! Incremental timeline builder.

use sc_core::NodeIndex;

use crate::graph::{self, TimelineGraph};
use crate::node::TimelineNode;
use crate::validate::{self, ValidationError};

/// Builder for assembling a timeline node by node.
///
/// Use `add` / `add_next` to collect nodes, then call `build()` to validate
/// them and freeze them into a `TimelineGraph`.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    nodes: Vec<TimelineNode>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully described node and return its index.
    pub fn add(&mut self, node: TimelineNode) -> NodeIndex {
        let index = node.index;
        self.nodes.push(node);
        index
    }

    /// Add an empty node at the next free index and return a handle to it.
    pub fn add_next(&mut self) -> Result<&mut TimelineNode, ValidationError> {
        let index = self.next_index()?;
        self.nodes.push(TimelineNode::new(index));
        let last = self.nodes.len() - 1;
        Ok(&mut self.nodes[last])
    }

    /// First index greater than every index added so far.
    pub fn next_index(&self) -> Result<NodeIndex, ValidationError> {
        graph::index_after(&self.nodes)
    }

    /// Mutable access to an already added node.
    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut TimelineNode> {
        self.nodes.iter_mut().find(|n| n.index == index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validate every node and return the graph ordered by index.
    ///
    /// Fails on the first duplicate index or rule violation.
    pub fn build(self) -> Result<TimelineGraph, ValidationError> {
        let graph = TimelineGraph::from_stored(self.nodes);
        validate::validate_graph(&graph)?;
        Ok(graph)
    }
}

impl FromIterator<TimelineNode> for TimelineBuilder {
    fn from_iter<I: IntoIterator<Item = TimelineNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
