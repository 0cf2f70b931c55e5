//! Range search over a built [`BkTree`].
//!
//! A node whose label lies at distance `dr` from the query can only lead to
//! matches through children whose edge distance `d` satisfies
//! `dr - max <= d <= dr + max`; every other subtree is skipped. The root is
//! handled like any other node, so it can be excluded from the result while
//! its children are still explored.

use std::collections::VecDeque;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::instrument;

use crate::{Result, error::BkTreeError, node::ROOT, tree::BkTree};

/// A word found by a search together with its distance to the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Match<'tree> {
    /// Indexed word.
    pub word: &'tree str,
    /// Metric distance between the query and `word`.
    pub distance: usize,
}

fn validate_query(query: &str, max_distance: i64) -> Result<usize> {
    if query.is_empty() {
        return Err(BkTreeError::InvalidSearchWord);
    }
    if max_distance < 0 {
        return Err(BkTreeError::InvalidSearchDistance { got: max_distance });
    }
    Ok(usize::try_from(max_distance).unwrap_or(usize::MAX))
}

impl BkTree {
    /// Returns every indexed word within `max_distance` of `query`.
    ///
    /// Results are returned in traversal order, which carries no meaning.
    ///
    /// # Errors
    /// - [`BkTreeError::InvalidSearchWord`] when `query` is empty.
    /// - [`BkTreeError::InvalidSearchDistance`] when `max_distance` is
    ///   negative.
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::{BkTree, BkTreeError};
    ///
    /// let tree = BkTree::new(["cat", "cats", "cast", "cost"], "levenshtein")?;
    /// assert_eq!(tree.search("cat", 0)?, ["cat"]);
    /// assert!(tree.search("dog", 0)?.is_empty());
    /// assert_eq!(tree.search("", 1), Err(BkTreeError::InvalidSearchWord));
    /// # Ok::<(), BkTreeError>(())
    /// ```
    pub fn search(&self, query: &str, max_distance: i64) -> Result<Vec<&str>> {
        Ok(self
            .search_with_distances(query, max_distance)?
            .into_iter()
            .map(|found| found.word)
            .collect())
    }

    /// Like [`Self::search`], but also reports each match's distance.
    ///
    /// # Errors
    /// See [`Self::search`].
    #[instrument(
        name = "core.search",
        level = "trace",
        err,
        skip(self),
        fields(metric = %self.metric.name()),
    )]
    pub fn search_with_distances(&self, query: &str, max_distance: i64) -> Result<Vec<Match<'_>>> {
        let max_distance = validate_query(query, max_distance)?;
        Ok(self.collect_matches(query, max_distance))
    }

    fn collect_matches(&self, query: &str, max_distance: usize) -> Vec<Match<'_>> {
        let mut matches = Vec::new();
        let mut queue = VecDeque::from([ROOT]);

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let distance = self.metric.distance(query, node.label());
            if distance <= max_distance {
                matches.push(Match {
                    word: node.label(),
                    distance,
                });
            }
            let low = distance.saturating_sub(max_distance);
            let high = distance.saturating_add(max_distance);
            queue.extend(node.children_within(low, high).map(|(_, child)| child));
        }

        matches
    }

    /// Runs [`Self::search`] for each query with a shared distance bound.
    ///
    /// With the `parallel` feature the queries are spread across the rayon
    /// thread pool; the tree is only read, so no locking is involved.
    ///
    /// # Errors
    /// Returns the error of an invalid query; see [`Self::search`].
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::BkTree;
    ///
    /// let tree = BkTree::new(["cat", "cats", "dog"], "levenshtein")?;
    /// let results = tree.search_many(&["dog", "cow"], 0)?;
    /// assert_eq!(results, [vec!["dog"], vec![]]);
    /// # Ok::<(), bkindex_core::BkTreeError>(())
    /// ```
    #[cfg(feature = "parallel")]
    pub fn search_many<S>(&self, queries: &[S], max_distance: i64) -> Result<Vec<Vec<&str>>>
    where
        S: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|query| self.search(query.as_ref(), max_distance))
            .collect()
    }

    /// Runs [`Self::search`] for each query with a shared distance bound.
    ///
    /// # Errors
    /// Returns the error of the first invalid query; see [`Self::search`].
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::BkTree;
    ///
    /// let tree = BkTree::new(["cat", "cats", "dog"], "levenshtein")?;
    /// let results = tree.search_many(&["dog", "cow"], 0)?;
    /// assert_eq!(results, [vec!["dog"], vec![]]);
    /// # Ok::<(), bkindex_core::BkTreeError>(())
    /// ```
    #[cfg(not(feature = "parallel"))]
    pub fn search_many<S>(&self, queries: &[S], max_distance: i64) -> Result<Vec<Vec<&str>>>
    where
        S: AsRef<str> + Sync,
    {
        queries
            .iter()
            .map(|query| self.search(query.as_ref(), max_distance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use rstest::{fixture, rstest};

    use crate::{BkTreeBuilder, RootSelection};

    #[fixture]
    fn animals() -> BkTree {
        BkTree::new(
            ["cat", "cats", "cast", "cost", "coat", "dog", "dot", "bat"],
            "levenshtein",
        )
        .expect("word list is valid")
    }

    fn sorted(words: Vec<&str>) -> BTreeSet<&str> {
        words.into_iter().collect()
    }

    #[rstest]
    #[case("cat", 0, &["cat"])]
    #[case("cat", 1, &["cat", "cats", "cast", "coat", "bat"])]
    #[case("dog", 1, &["dog", "dot"])]
    #[case("cog", 0, &[])]
    fn finds_expected_words(
        animals: BkTree,
        #[case] query: &str,
        #[case] max_distance: i64,
        #[case] expected: &[&str],
    ) {
        let found = animals.search(query, max_distance).expect("query is valid");
        assert_eq!(sorted(found), expected.iter().copied().collect());
    }

    #[rstest]
    fn large_distance_returns_every_word(animals: BkTree) {
        let found = animals.search("x", i64::MAX).expect("query is valid");
        assert_eq!(found.len(), animals.num_of_words());
    }

    #[rstest]
    fn rejects_invalid_queries(animals: BkTree) {
        assert_eq!(animals.search("", 1), Err(BkTreeError::InvalidSearchWord));
        assert_eq!(
            animals.search("cat", -1),
            Err(BkTreeError::InvalidSearchDistance { got: -1 })
        );
    }

    #[test]
    fn excluded_root_still_explores_children() {
        let tree = BkTreeBuilder::new()
            .with_root_selection(RootSelection::First)
            .build(["abcdef", "abcdeg", "xyz", "xyw"])
            .expect("word list is valid");
        assert_eq!(tree.root(), "abcdef");
        let found = tree.search("xyz", 1).expect("query is valid");
        assert_eq!(sorted(found), BTreeSet::from(["xyz", "xyw"]));
    }

    #[rstest]
    fn reports_distances(animals: BkTree) {
        let mut found = animals
            .search_with_distances("cat", 1)
            .expect("query is valid");
        found.sort_unstable_by_key(|hit| (hit.distance, hit.word));
        assert_eq!(
            found.first(),
            Some(&Match {
                word: "cat",
                distance: 0
            })
        );
        assert!(found.iter().skip(1).all(|hit| hit.distance == 1));
    }

    #[rstest]
    fn search_many_preserves_query_order(animals: BkTree) {
        let results = animals
            .search_many(&["dog", "bat", "zzz"], 0)
            .expect("queries are valid");
        assert_eq!(results, [vec!["dog"], vec!["bat"], vec![]]);
    }

    #[rstest]
    fn search_many_fails_on_invalid_query(animals: BkTree) {
        let err = animals
            .search_many(&["dog", ""], 0)
            .expect_err("empty query is invalid");
        assert_eq!(err, BkTreeError::InvalidSearchWord);
    }
}
