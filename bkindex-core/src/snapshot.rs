//! Serializable snapshots of a built tree.
//!
//! A snapshot records the metric name and the node arena only. Depths and the
//! label index are derived again on restore, and every structural invariant is
//! re-checked so a tampered or truncated snapshot cannot yield a tree that
//! answers searches incorrectly.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    Result,
    error::BkTreeError,
    metric::MetricRegistry,
    node::{Node, ROOT},
    tree::BkTree,
    validate::word_defect,
};

/// Format version written by [`BkTree::snapshot`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable form of a [`BkTree`]. Node `0` is the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Format version; must equal [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// Registry name of the metric the tree was built with.
    pub metric: String,
    /// Node arena.
    pub nodes: Vec<SnapshotNode>,
}

/// One node of a [`TreeSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Word stored at the node.
    pub label: String,
    /// Outgoing edges in ascending distance.
    pub children: Vec<SnapshotEdge>,
}

/// One edge of a [`SnapshotNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    /// Distance between the parent label and the child label.
    pub distance: usize,
    /// Position of the child in [`TreeSnapshot::nodes`].
    pub node: usize,
}

impl BkTree {
    /// Captures the tree in serializable form.
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::BkTree;
    ///
    /// let tree = BkTree::new(["cat", "cats", "cost"], "lcs_distance")?;
    /// let snapshot = tree.snapshot();
    /// assert_eq!(snapshot.metric, "lcs_distance");
    /// assert_eq!(snapshot.nodes.len(), 3);
    ///
    /// let restored = BkTree::restore(snapshot)?;
    /// assert_eq!(restored.root(), tree.root());
    /// assert_eq!(restored.tree_depth(), tree.tree_depth());
    /// # Ok::<(), bkindex_core::BkTreeError>(())
    /// ```
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            version: SNAPSHOT_VERSION,
            metric: self.metric.name().to_owned(),
            nodes: self
                .nodes
                .iter()
                .map(|node| SnapshotNode {
                    label: node.label().to_owned(),
                    children: node
                        .children()
                        .map(|(distance, node)| SnapshotEdge { distance, node })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds a tree from `snapshot`, resolving the metric against the
    /// built-in registry.
    ///
    /// # Errors
    /// See [`Self::restore_with_registry`].
    pub fn restore(snapshot: TreeSnapshot) -> Result<Self> {
        Self::restore_with_registry(snapshot, &MetricRegistry::builtin())
    }

    /// Rebuilds a tree from `snapshot`, resolving the metric in `registry`.
    ///
    /// # Errors
    /// - [`BkTreeError::UnknownMetric`] when the snapshot's metric is not
    ///   registered.
    /// - [`BkTreeError::CorruptSnapshot`] when the version is unsupported or
    ///   the arena is not a valid BK-tree for that metric.
    #[instrument(
        name = "core.restore",
        err,
        skip(snapshot, registry),
        fields(metric = %snapshot.metric, nodes = snapshot.nodes.len()),
    )]
    pub fn restore_with_registry(snapshot: TreeSnapshot, registry: &MetricRegistry) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(BkTreeError::corrupt(format!(
                "unsupported version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        let metric = registry.resolve(&snapshot.metric)?;
        let count = snapshot.nodes.len();

        let mut nodes: Vec<Node> = Vec::with_capacity(count);
        for (id, raw) in snapshot.nodes.iter().enumerate() {
            if let Some(defect) = word_defect(&raw.label) {
                return Err(BkTreeError::corrupt(format!(
                    "node {id} label `{}` {defect}",
                    raw.label
                )));
            }
            nodes.push(Node::new(raw.label.clone()));
        }

        let mut has_parent = vec![false; count];
        for (parent, raw) in snapshot.nodes.iter().enumerate() {
            for edge in &raw.children {
                let Some(child) = snapshot.nodes.get(edge.node) else {
                    return Err(BkTreeError::corrupt(format!(
                        "node {parent} links to missing node {}",
                        edge.node
                    )));
                };
                if edge.node == ROOT || has_parent[edge.node] {
                    return Err(BkTreeError::corrupt(format!(
                        "node {} has more than one parent",
                        edge.node
                    )));
                }
                has_parent[edge.node] = true;

                let expected = metric.distance(&raw.label, &child.label);
                if expected != edge.distance {
                    return Err(BkTreeError::corrupt(format!(
                        "edge {parent}->{} is keyed {} but the distance is {expected}",
                        edge.node, edge.distance
                    )));
                }
                if !nodes[parent].attach(edge.distance, edge.node) {
                    return Err(BkTreeError::corrupt(format!(
                        "node {parent} has two children at distance {}",
                        edge.distance
                    )));
                }
            }
        }

        let tree = Self::assemble(metric, nodes)?;
        info!(
            root = tree.root(),
            words = tree.num_of_words(),
            depth = tree.tree_depth(),
            "tree restored"
        );
        Ok(tree)
    }
}
