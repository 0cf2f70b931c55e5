//! Builder utilities for constructing [`BkTree`] instances.
//!
//! Exposes the root selection policy and the validation performed before any
//! node is inserted. Construction is atomic: either the whole tree is built or
//! an error is returned and nothing escapes.

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{Span, debug, field, info, instrument};

use crate::{
    Result,
    error::BkTreeError,
    metric::{DEFAULT_METRIC, Metric, MetricRegistry},
    node::{Node, ROOT},
    tree::BkTree,
    validate::validate_words,
};

/// Chooses which distinct word becomes the root of the tree.
///
/// The root only affects the shape of the tree, never search results.
/// `First` keeps shapes reproducible, `Seeded` gives a reproducible uniform
/// choice and `Random` draws from the thread RNG on every build.
///
/// # Examples
/// ```
/// use bkindex_core::{BkTreeBuilder, RootSelection};
///
/// let tree = BkTreeBuilder::new()
///     .with_root_selection(RootSelection::First)
///     .build(["cost", "cat"])?;
/// assert_eq!(tree.root(), "cost");
/// # Ok::<(), bkindex_core::BkTreeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootSelection {
    /// Use the first distinct word in input order.
    #[default]
    First,
    /// Pick uniformly with a [`SmallRng`] seeded from the given value.
    Seeded(u64),
    /// Pick uniformly with the thread-local RNG.
    Random,
}

impl RootSelection {
    fn pick(self, len: usize) -> usize {
        debug_assert!(len > 0, "root selection requires at least one word");
        match self {
            Self::First => 0,
            Self::Seeded(seed) => SmallRng::seed_from_u64(seed).gen_range(0..len),
            Self::Random => rand::thread_rng().gen_range(0..len),
        }
    }
}

/// Configures and constructs [`BkTree`] instances.
///
/// # Examples
/// ```
/// use bkindex_core::{BkTreeBuilder, RootSelection};
///
/// let tree = BkTreeBuilder::new()
///     .with_metric("lcs_distance")
///     .with_root_selection(RootSelection::Seeded(7))
///     .build(["cat", "cats", "cast", "cost", "cat"])
///     .expect("word list is valid");
/// assert_eq!(tree.num_of_words(), 4);
/// assert_eq!(tree.metric().name(), "lcs_distance");
/// ```
#[derive(Debug, Clone)]
pub struct BkTreeBuilder {
    metric: String,
    root_selection: RootSelection,
    registry: MetricRegistry,
}

impl Default for BkTreeBuilder {
    fn default() -> Self {
        Self {
            metric: DEFAULT_METRIC.to_owned(),
            root_selection: RootSelection::default(),
            registry: MetricRegistry::builtin(),
        }
    }
}

impl BkTreeBuilder {
    /// Creates a builder using the Levenshtein metric and the first word as
    /// root.
    ///
    /// # Examples
    /// ```
    /// use bkindex_core::{BkTreeBuilder, RootSelection};
    ///
    /// let builder = BkTreeBuilder::new();
    /// assert_eq!(builder.metric(), "levenshtein");
    /// assert_eq!(builder.root_selection(), RootSelection::First);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the metric by registry name. The name is resolved by
    /// [`Self::build`].
    #[must_use]
    pub fn with_metric(mut self, name: impl Into<String>) -> Self {
        self.metric = name.into();
        self
    }

    /// Returns the configured metric name.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Sets the root selection policy.
    #[must_use]
    pub fn with_root_selection(mut self, selection: RootSelection) -> Self {
        self.root_selection = selection;
        self
    }

    /// Returns the configured root selection policy.
    #[must_use]
    pub fn root_selection(&self) -> RootSelection {
        self.root_selection
    }

    /// Replaces the registry used to resolve the metric name.
    #[must_use]
    pub fn with_registry(mut self, registry: MetricRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Validates `words` and builds the tree.
    ///
    /// Duplicates are collapsed, keeping first occurrences in input order.
    ///
    /// # Errors
    /// - [`BkTreeError::ListIntegrity`] when an element is blank, contains
    ///   interior whitespace or is purely numeric.
    /// - [`BkTreeError::UnknownMetric`] when the metric name is not registered.
    /// - [`BkTreeError::EmptyWordList`] when `words` yields nothing.
    #[instrument(
        name = "core.build",
        err,
        skip(self, words),
        fields(
            metric = %self.metric,
            root_selection = ?self.root_selection,
            words = field::Empty,
        ),
    )]
    pub fn build<I>(self, words: I) -> Result<BkTree>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        Span::current().record("words", words.len());

        validate_words(&words)?;
        let metric = self.registry.resolve(&self.metric)?;

        let mut distinct = dedup(words);
        if distinct.is_empty() {
            return Err(BkTreeError::EmptyWordList);
        }
        let root = distinct.remove(self.root_selection.pick(distinct.len()));
        debug!(distinct = distinct.len() + 1, root = %root, "word list prepared");

        let mut nodes = Vec::with_capacity(distinct.len() + 1);
        nodes.push(Node::new(root));
        for word in distinct {
            insert(&mut nodes, &metric, word);
        }

        let tree = BkTree::assemble(metric, nodes)?;
        info!(
            root = tree.root(),
            words = tree.num_of_words(),
            depth = tree.tree_depth(),
            "tree built"
        );
        Ok(tree)
    }
}

fn dedup(words: Vec<String>) -> Vec<String> {
    let mut first = vec![false; words.len()];
    let mut seen = HashSet::with_capacity(words.len());
    for (keep, word) in first.iter_mut().zip(&words) {
        *keep = seen.insert(word.as_str());
    }

    words
        .into_iter()
        .zip(first)
        .filter_map(|(word, keep)| keep.then_some(word))
        .collect()
}

/// Descends from the root following edges keyed by the distance to each
/// visited label until a free slot is found.
fn insert(nodes: &mut Vec<Node>, metric: &Metric, word: String) {
    let mut current = ROOT;
    loop {
        let distance = metric.distance(nodes[current].label(), &word);
        if let Some(next) = nodes[current].child(distance) {
            current = next;
            continue;
        }
        let id = nodes.len();
        let attached = nodes[current].attach(distance, id);
        debug_assert!(attached, "slot {distance} of node {current} was occupied");
        nodes.push(Node::new(word));
        return;
    }
}
