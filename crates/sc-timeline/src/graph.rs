//! The in-memory timeline graph.

use sc_core::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::node::TimelineNode;
use crate::validate::{Field, Rule, ValidationError};

/// All nodes of one scenario's timeline, ordered by node index.
///
/// Successor references are authored content: the graph stores them as given
/// and does not require them to point at existing nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineGraph {
    #[serde(default)]
    pub(crate) nodes: Vec<TimelineNode>,
}

impl TimelineGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a graph from nodes read back from storage.
    ///
    /// Nodes are sorted by index; no validation is performed.
    pub fn from_stored(mut nodes: Vec<TimelineNode>) -> Self {
        nodes.sort_by_key(|n| n.index);
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TimelineNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<TimelineNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index (returns None if absent).
    pub fn node(&self, index: NodeIndex) -> Option<&TimelineNode> {
        self.nodes.iter().find(|n| n.index == index)
    }

    pub fn root(&self) -> Option<&TimelineNode> {
        self.node(NodeIndex::ROOT)
    }

    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().map(|n| n.index)
    }

    /// Total number of additional parameters across all nodes.
    pub fn parameter_count(&self) -> usize {
        self.nodes.iter().map(|n| n.parameters.len()).sum()
    }

    /// Successor references that point at indices with no node.
    ///
    /// Informational only: dangling transitions are allowed.
    pub fn dangling_successors(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let mut dangling = Vec::new();
        for node in &self.nodes {
            for target in [node.done_successor(), node.not_done_successor()]
                .into_iter()
                .flatten()
            {
                if self.node(target).is_none() && !dangling.contains(&(node.index, target)) {
                    dangling.push((node.index, target));
                }
            }
        }
        dangling
    }

    /// Smallest index greater than every existing node index.
    ///
    /// Fails with [`Rule::IndexLimit`] when a node already uses `u32::MAX`.
    pub fn next_index(&self) -> Result<NodeIndex, ValidationError> {
        index_after(&self.nodes)
    }
}

pub(crate) fn index_after<'a>(
    nodes: impl IntoIterator<Item = &'a TimelineNode>,
) -> Result<NodeIndex, ValidationError> {
    let Some(last) = nodes.into_iter().map(|n| n.index).max() else {
        return Ok(NodeIndex::ROOT);
    };
    last.get()
        .checked_add(1)
        .map(NodeIndex::new)
        .ok_or_else(|| ValidationError::new(Field::NodeIndex, Rule::IndexLimit, last).at(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_stored_sorts_by_index() {
        let graph = TimelineGraph::from_stored(vec![
            TimelineNode::new(NodeIndex::new(2)),
            TimelineNode::new(NodeIndex::ROOT),
            TimelineNode::new(NodeIndex::new(1)),
        ]);
        let indices: Vec<u32> = graph.indices().map(NodeIndex::get).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(graph.root().is_some());
    }

    #[test]
    fn dangling_successors_are_reported_not_rejected() {
        let graph = TimelineGraph::from_stored(vec![
            TimelineNode::new(NodeIndex::ROOT).with_branches("a", 1, 0),
            TimelineNode::new(NodeIndex::new(1)).with_branches("b", 5, 0),
        ]);
        assert_eq!(
            graph.dangling_successors(),
            vec![(NodeIndex::new(1), NodeIndex::new(5))]
        );
    }

    #[test]
    fn next_index_of_empty_graph_is_root() {
        assert_eq!(TimelineGraph::empty().next_index(), Ok(NodeIndex::ROOT));
        let graph = TimelineGraph::from_stored(vec![
            TimelineNode::new(NodeIndex::ROOT),
            TimelineNode::new(NodeIndex::new(4)),
        ]);
        assert_eq!(graph.next_index(), Ok(NodeIndex::new(5)));
    }

    #[test]
    fn next_index_after_largest_index_is_an_error() {
        let graph = TimelineGraph::from_stored(vec![TimelineNode::new(NodeIndex::new(u32::MAX))]);
        let err = graph.next_index().unwrap_err();
        assert_eq!(err.rule, Rule::IndexLimit);
        assert_eq!(err.node, Some(NodeIndex::new(u32::MAX)));
    }
}
