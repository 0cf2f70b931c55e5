//! Node storage for the BK-tree arena.
//!
//! Nodes live in a flat vector owned by the tree and refer to their children
//! by position. Node `0` is always the root. Each child is keyed by its
//! distance to the parent label, so a node has at most one child per
//! distance.

use std::collections::BTreeMap;

pub(crate) const ROOT: usize = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    label: String,
    children: BTreeMap<usize, usize>,
}

impl Node {
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn child(&self, distance: usize) -> Option<usize> {
        self.children.get(&distance).copied()
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.children.iter().map(|(&distance, &id)| (distance, id))
    }

    /// Children whose edge distance lies in `low..=high`.
    pub(crate) fn children_within(
        &self,
        low: usize,
        high: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.children
            .range(low..=high)
            .map(|(&distance, &id)| (distance, id))
    }

    /// Records `id` as the child at `distance`; returns `false` when the slot
    /// is already taken.
    pub(crate) fn attach(&mut self, distance: usize, id: usize) -> bool {
        match self.children.entry(distance) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(id);
                true
            }
        }
    }
}

/// Computes the depth of every node reachable from the root.
///
/// Nodes that are unreachable keep `None`.
pub(crate) fn node_depths(nodes: &[Node]) -> Vec<Option<usize>> {
    let mut depths = vec![None; nodes.len()];
    if nodes.is_empty() {
        return depths;
    }
    depths[ROOT] = Some(0);
    let mut stack = vec![(ROOT, 0_usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = nodes.get(id) else {
            continue;
        };
        for (_, child) in node.children() {
            if let Some(slot) = depths.get_mut(child) {
                if slot.is_none() {
                    *slot = Some(depth + 1);
                    stack.push((child, depth + 1));
                }
            }
        }
    }
    depths
}

/// Read-only view of one node of a [`crate::BkTree`].
///
/// # Examples
/// ```
/// use bkindex_core::BkTree;
///
/// let tree = BkTree::new(["cat", "cats", "cost"], "levenshtein")?;
/// let root = tree.root_node();
/// assert_eq!(root.label(), "cat");
/// assert_eq!(root.depth(), 0);
/// let children: Vec<_> = root
///     .children()
///     .map(|(distance, child)| (distance, child.label()))
///     .collect();
/// assert_eq!(children, [(1, "cats"), (2, "cost")]);
/// # Ok::<(), bkindex_core::BkTreeError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'tree> {
    nodes: &'tree [Node],
    depths: &'tree [usize],
    id: usize,
}

impl<'tree> NodeRef<'tree> {
    pub(crate) fn new(nodes: &'tree [Node], depths: &'tree [usize], id: usize) -> Self {
        Self { nodes, depths, id }
    }

    fn node(&self) -> &'tree Node {
        &self.nodes[self.id]
    }

    /// Returns the word stored at this node.
    #[must_use]
    pub fn label(&self) -> &'tree str {
        self.node().label()
    }

    /// Returns the number of edges between the root and this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depths[self.id]
    }

    /// Returns `true` when the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node().children.is_empty()
    }

    /// Iterates over `(distance, child)` pairs in ascending distance.
    pub fn children(&self) -> impl Iterator<Item = (usize, NodeRef<'tree>)> + 'tree {
        let nodes = self.nodes;
        let depths = self.depths;
        self.node()
            .children()
            .map(move |(distance, id)| (distance, NodeRef::new(nodes, depths, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(labels: &[&str]) -> Vec<Node> {
        let mut nodes: Vec<Node> = labels.iter().map(|l| Node::new((*l).to_owned())).collect();
        for id in 1..nodes.len() {
            assert!(nodes[id - 1].attach(1, id));
        }
        nodes
    }

    #[test]
    fn attach_refuses_occupied_slots() {
        let mut node = Node::new("cat".into());
        assert!(node.attach(1, 1));
        assert!(!node.attach(1, 2));
        assert_eq!(node.child(1), Some(1));
        assert_eq!(node.child(2), None);
    }

    #[test]
    fn children_within_is_inclusive() {
        let mut node = Node::new("cat".into());
        for distance in 1..=5 {
            node.attach(distance, distance);
        }
        let picked: Vec<_> = node.children_within(2, 4).map(|(d, _)| d).collect();
        assert_eq!(picked, [2, 3, 4]);
    }

    #[test]
    fn depths_follow_parent_links() {
        let nodes = chain(&["a", "b", "c", "d"]);
        assert_eq!(node_depths(&nodes), [Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn unreachable_nodes_have_no_depth() {
        let mut nodes = chain(&["a", "b"]);
        nodes.push(Node::new("orphan".into()));
        assert_eq!(node_depths(&nodes), [Some(0), Some(1), None]);
    }
}
