//! Edge listing for external graph renderers.

use std::collections::VecDeque;

use crate::{node::ROOT, tree::BkTree};

/// A parent-to-child edge labelled with the metric distance between the two
/// words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge<'tree> {
    /// Label of the parent node.
    pub parent: &'tree str,
    /// Label of the child node.
    pub child: &'tree str,
    /// Distance between `parent` and `child`, which is also the edge key.
    pub distance: usize,
}

impl BkTree {
    /// Lists every edge in breadth-first order from the root.
    ///
    /// A tree of `n` words yields exactly `n - 1` edges.
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::{BkTree, Edge};
    ///
    /// let tree = BkTree::new(["cat", "cats", "cast"], "levenshtein")?;
    /// let edges: Vec<Edge<'_>> = tree.edges().collect();
    /// assert_eq!(
    ///     edges,
    ///     [
    ///         Edge { parent: "cat", child: "cats", distance: 1 },
    ///         Edge { parent: "cats", child: "cast", distance: 2 },
    ///     ]
    /// );
    /// # Ok::<(), bkindex_core::BkTreeError>(())
    /// ```
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        let mut queue = VecDeque::from([ROOT]);
        let mut pending: VecDeque<Edge<'_>> = VecDeque::new();
        std::iter::from_fn(move || {
            loop {
                if let Some(edge) = pending.pop_front() {
                    return Some(edge);
                }
                let id = queue.pop_front()?;
                let Some(node) = self.nodes.get(id) else {
                    continue;
                };
                for (distance, child) in node.children() {
                    if let Some(child_node) = self.nodes.get(child) {
                        pending.push_back(Edge {
                            parent: node.label(),
                            child: child_node.label(),
                            distance,
                        });
                        queue.push_back(child);
                    }
                }
            }
        })
    }
}
