//! The [`BkTree`] facade.
//!
//! Owns the bound metric, the node arena and the derived depth data. A tree is
//! immutable once built; the only ways to obtain one are the builder and
//! snapshot restore.

use std::collections::HashMap;

use crate::{
    Result,
    builder::BkTreeBuilder,
    error::BkTreeError,
    metric::Metric,
    node::{Node, NodeRef, ROOT, node_depths},
};

/// Burkhard-Keller tree over a set of distinct words.
///
/// # Examples
/// ```
/// use bkindex_core::BkTree;
///
/// let tree = BkTree::new(["cat", "cats", "cast", "cost"], "levenshtein")?;
/// assert_eq!(tree.num_of_words(), 4);
///
/// let mut hits = tree.search("cat", 1)?;
/// hits.sort_unstable();
/// assert_eq!(hits, ["cast", "cat", "cats"]);
/// # Ok::<(), bkindex_core::BkTreeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BkTree {
    pub(crate) metric: Metric,
    pub(crate) nodes: Vec<Node>,
    depths: Vec<usize>,
    positions: HashMap<String, usize>,
    tree_depth: usize,
}

impl BkTree {
    /// Builds a tree from `words` using the metric registered under `metric`
    /// and the default builder settings.
    ///
    /// # Errors
    /// See [`BkTreeBuilder::build`].
    pub fn new<I>(words: I, metric: &str) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        BkTreeBuilder::new().with_metric(metric).build(words)
    }

    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> BkTreeBuilder {
        BkTreeBuilder::new()
    }

    /// Finalises an arena, deriving depths and the label index.
    ///
    /// Fails when a node is unreachable from the root or a label repeats.
    pub(crate) fn assemble(metric: Metric, nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(BkTreeError::corrupt("tree has no nodes"));
        }
        let depths = node_depths(&nodes)
            .into_iter()
            .enumerate()
            .map(|(id, depth)| {
                depth.ok_or_else(|| {
                    BkTreeError::corrupt(format!("node {id} is not reachable from the root"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut positions = HashMap::with_capacity(nodes.len());
        for (id, node) in nodes.iter().enumerate() {
            if positions.insert(node.label().to_owned(), id).is_some() {
                return Err(BkTreeError::corrupt(format!(
                    "label `{}` occurs more than once",
                    node.label()
                )));
            }
        }

        let tree_depth = depths.iter().copied().max().unwrap_or(0);
        Ok(Self {
            metric,
            nodes,
            depths,
            positions,
            tree_depth,
        })
    }

    /// Returns the word stored at the root.
    #[must_use]
    pub fn root(&self) -> &str {
        self.nodes[ROOT].label()
    }

    /// Returns a view of the root node for structural traversal.
    #[must_use]
    pub fn root_node(&self) -> NodeRef<'_> {
        NodeRef::new(&self.nodes, &self.depths, ROOT)
    }

    /// Returns the number of distinct words, which equals the number of
    /// nodes.
    #[must_use]
    pub fn num_of_words(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the length, in edges, of the longest root-to-leaf path.
    #[must_use]
    pub fn tree_depth(&self) -> usize {
        self.tree_depth
    }

    /// Returns the depth of `word`, or `None` when it is not indexed.
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::BkTree;
    ///
    /// let tree = BkTree::new(["cat", "cats", "cast"], "levenshtein")?;
    /// assert_eq!(tree.depth_of("cat"), Some(0));
    /// assert_eq!(tree.depth_of("cast"), Some(2));
    /// assert_eq!(tree.depth_of("dog"), None);
    /// # Ok::<(), bkindex_core::BkTreeError>(())
    /// ```
    #[must_use]
    pub fn depth_of(&self, word: &str) -> Option<usize> {
        self.positions.get(word).map(|&id| self.depths[id])
    }

    /// Returns `true` when `word` is indexed.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.positions.contains_key(word)
    }

    /// Iterates over the indexed words in insertion order, root first.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(Node::label)
    }

    /// Iterates over `(word, depth)` pairs in insertion order.
    pub fn node_depths(&self) -> impl Iterator<Item = (&str, usize)> {
        self.nodes
            .iter()
            .zip(&self.depths)
            .map(|(node, &depth)| (node.label(), depth))
    }

    /// Returns the metric bound at construction.
    #[must_use]
    pub fn metric(&self) -> &Metric {
        &self.metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::metric::levenshtein;

    fn metric() -> Metric {
        Metric::new("levenshtein", levenshtein)
    }

    #[test]
    fn assemble_rejects_duplicate_labels() {
        let mut nodes = vec![Node::new("cat".into()), Node::new("cat".into())];
        nodes[0].attach(0, 1);
        let err = BkTree::assemble(metric(), nodes).expect_err("labels repeat");
        assert!(matches!(err, BkTreeError::CorruptSnapshot { .. }));
    }

    #[test]
    fn assemble_rejects_orphans() {
        let nodes = vec![Node::new("cat".into()), Node::new("dog".into())];
        let err = BkTree::assemble(metric(), nodes).expect_err("dog is unreachable");
        assert_eq!(
            err,
            BkTreeError::corrupt("node 1 is not reachable from the root")
        );
    }

    #[test]
    fn single_word_tree_has_zero_depth() {
        let tree = BkTree::new(["solo"], "levenshtein").expect("word list is valid");
        assert_eq!(tree.root(), "solo");
        assert_eq!(tree.tree_depth(), 0);
        assert_eq!(tree.num_of_words(), 1);
        assert!(tree.root_node().is_leaf());
    }

    #[test]
    fn depth_map_covers_every_word() {
        let tree = BkTree::new(["cat", "cats", "cast", "cost"], "levenshtein")
            .expect("word list is valid");
        let depths: HashMap<_, _> = tree.node_depths().collect();
        assert_eq!(depths.len(), tree.num_of_words());
        assert_eq!(depths.get("cat"), Some(&0));
        assert_eq!(
            depths.values().copied().max(),
            Some(tree.tree_depth())
        );
        assert!(tree.words().all(|word| tree.contains(word)));
    }

    #[test]
    fn tree_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BkTree>();
    }
}
