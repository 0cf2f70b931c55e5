//! String metrics usable by the index.
//!
//! Both built-in distances are proper metrics over finite strings: they are
//! non-negative, zero only for identical inputs, symmetric, and satisfy the
//! triangle inequality. Search pruning relies on the last property, so any
//! metric registered at runtime must uphold it too.
//!
//! Strings are compared by Unicode scalar value, never by byte.

use std::{fmt, mem, sync::Arc};

use crate::error::{BkTreeError, Result};

/// Name of the metric used when the caller does not choose one.
pub const DEFAULT_METRIC: &str = "levenshtein";

/// Signature shared by all distance functions.
pub type DistanceFn = fn(&str, &str) -> usize;

/// Computes the Levenshtein distance between two strings.
///
/// Insertions, deletions and substitutions each cost one. The recurrence is
/// evaluated row by row, keeping only the previous row of the table.
///
/// # Examples
/// ```
/// use bkindex_core::levenshtein;
///
/// assert_eq!(levenshtein("absantse", "absence"), 3);
/// assert_eq!(levenshtein("Test", "test"), 1);
/// assert_eq!(levenshtein("", "hallo"), 5);
/// ```
#[must_use]
pub fn levenshtein(left: &str, right: &str) -> usize {
    let right: Vec<char> = right.chars().collect();
    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (row, lc) in left.chars().enumerate() {
        current[0] = row + 1;
        for (col, &rc) in right.iter().enumerate() {
            let substitution = previous[col] + usize::from(lc != rc);
            let deletion = previous[col + 1] + 1;
            let insertion = current[col] + 1;
            current[col + 1] = substitution.min(deletion).min(insertion);
        }
        mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}

/// Returns the length of the longest common subsequence of two strings.
///
/// # Examples
/// ```
/// use bkindex_core::longest_common_subsequence;
///
/// assert_eq!(longest_common_subsequence("Test", "test"), 3);
/// assert_eq!(longest_common_subsequence("abc", ""), 0);
/// ```
#[must_use]
pub fn longest_common_subsequence(left: &str, right: &str) -> usize {
    let right: Vec<char> = right.chars().collect();
    let mut previous = vec![0_usize; right.len() + 1];
    let mut current = vec![0_usize; right.len() + 1];

    for lc in left.chars() {
        for (col, &rc) in right.iter().enumerate() {
            current[col + 1] = if lc == rc {
                previous[col] + 1
            } else {
                previous[col + 1].max(current[col])
            };
        }
        mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}

/// Computes the edit distance restricted to insertions and deletions.
///
/// The result is the number of characters that must be deleted from `left`
/// plus the number that must be inserted to reach `right`, derived from the
/// longest common subsequence.
///
/// # Examples
/// ```
/// use bkindex_core::lcs_distance;
///
/// assert_eq!(lcs_distance("Test", "test"), 2);
/// assert_eq!(lcs_distance("", "hallo"), 5);
/// ```
#[must_use]
pub fn lcs_distance(left: &str, right: &str) -> usize {
    let common = longest_common_subsequence(left, right);
    (left.chars().count() - common) + (right.chars().count() - common)
}

/// A named distance function bound to an index.
///
/// # Examples
/// ```
/// use bkindex_core::MetricRegistry;
///
/// let metric = MetricRegistry::builtin().resolve("lcs_distance")?;
/// assert_eq!(metric.name(), "lcs_distance");
/// assert_eq!(metric.distance("cat", "cast"), 1);
/// # Ok::<(), bkindex_core::BkTreeError>(())
/// ```
#[derive(Clone)]
pub struct Metric {
    name: Arc<str>,
    distance: DistanceFn,
}

impl Metric {
    /// Wraps `distance` under `name`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, distance: DistanceFn) -> Self {
        Self {
            name: name.into(),
            distance,
        }
    }

    /// Returns the registered name of the metric.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the metric.
    #[must_use]
    pub fn distance(&self, left: &str, right: &str) -> usize {
        (self.distance)(left, right)
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric").field("name", &self.name).finish()
    }
}

/// Lookup table from metric names to distance functions.
///
/// Builders and restore resolve metric names here, so additional metrics can
/// be plugged in without touching construction or search.
///
/// # Examples
/// ```
/// use bkindex_core::{BkTreeError, MetricRegistry};
///
/// fn length_gap(a: &str, b: &str) -> usize {
///     a.chars().count().abs_diff(b.chars().count())
/// }
///
/// let mut registry = MetricRegistry::builtin();
/// registry.register("length_gap", length_gap);
/// assert_eq!(registry.resolve("length_gap")?.distance("ab", "abcd"), 2);
///
/// let err = registry.resolve("hamming").expect_err("hamming is not registered");
/// assert!(matches!(err, BkTreeError::UnknownMetric { .. }));
/// # Ok::<(), BkTreeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MetricRegistry {
    entries: Vec<Metric>,
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MetricRegistry {
    /// Creates a registry without any metrics.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a registry holding the built-in `levenshtein` and
    /// `lcs_distance` metrics.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("levenshtein", levenshtein);
        registry.register("lcs_distance", lcs_distance);
        registry
    }

    /// Adds `distance` under `name`, replacing any metric already registered
    /// with that name.
    pub fn register(&mut self, name: impl Into<Arc<str>>, distance: DistanceFn) -> &mut Self {
        let metric = Metric::new(name, distance);
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.name() == metric.name())
        {
            Some(existing) => *existing = metric,
            None => self.entries.push(metric),
        }
        self
    }

    /// Looks up the metric registered under `name`.
    ///
    /// # Errors
    /// Returns [`BkTreeError::UnknownMetric`] listing the registered names when
    /// `name` is not registered.
    pub fn resolve(&self, name: &str) -> Result<Metric> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .cloned()
            .ok_or_else(|| BkTreeError::UnknownMetric {
                requested: name.to_owned(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })
    }

    /// Iterates over registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Metric::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("hallo", "hallo", 0)]
    #[case("Test", "test", 1)]
    #[case("absantse", "absence", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("", "", 0)]
    #[case("", "hallo", 5)]
    #[case("hallo", "", 5)]
    #[case("straße", "strasse", 2)]
    fn levenshtein_matches_known_values(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: usize,
    ) {
        assert_eq!(levenshtein(left, right), expected);
    }

    #[rstest]
    #[case("Test", "test", 2)]
    #[case("", "hallo", 5)]
    #[case("hallo", "hallo", 0)]
    #[case("cat", "cut", 2)]
    #[case("abc", "cab", 2)]
    fn lcs_distance_matches_known_values(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: usize,
    ) {
        assert_eq!(lcs_distance(left, right), expected);
    }

    #[test]
    fn registry_reports_available_names_in_order() {
        let err = MetricRegistry::builtin()
            .resolve("hamming")
            .expect_err("hamming is not registered");
        assert_eq!(
            err,
            BkTreeError::UnknownMetric {
                requested: "hamming".into(),
                available: "levenshtein, lcs_distance".into(),
            }
        );
    }

    #[test]
    fn register_replaces_existing_entry() {
        fn zero(_: &str, _: &str) -> usize {
            0
        }
        let mut registry = MetricRegistry::builtin();
        registry.register("levenshtein", zero);
        assert_eq!(registry.names().count(), 2);
        let metric = registry.resolve("levenshtein").expect("metric registered");
        assert_eq!(metric.distance("a", "b"), 0);
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let err = MetricRegistry::empty()
            .resolve("levenshtein")
            .expect_err("registry is empty");
        assert!(matches!(
            err,
            BkTreeError::UnknownMetric { ref available, .. } if available.is_empty()
        ));
    }

    fn word() -> impl Strategy<Value = String> {
        "[a-dA-Dé]{0,8}"
    }

    proptest! {
        #[test]
        fn levenshtein_agrees_with_strsim(a in word(), b in word()) {
            prop_assert_eq!(levenshtein(&a, &b), strsim::levenshtein(&a, &b));
        }

        #[test]
        fn metrics_are_symmetric_with_zero_self_distance(a in word(), b in word()) {
            for metric in [levenshtein as DistanceFn, lcs_distance] {
                prop_assert_eq!(metric(&a, &b), metric(&b, &a));
                prop_assert_eq!(metric(&a, &a), 0);
                prop_assert_eq!(metric("", &a), a.chars().count());
                prop_assert_eq!(metric(&a, &b) == 0, a == b);
            }
        }

        #[test]
        fn metrics_satisfy_triangle_inequality(x in word(), y in word(), z in word()) {
            for metric in [levenshtein as DistanceFn, lcs_distance] {
                prop_assert!(metric(&x, &z) <= metric(&x, &y) + metric(&y, &z));
            }
        }

        #[test]
        fn lcs_distance_bounds_levenshtein(a in word(), b in word()) {
            prop_assert!(levenshtein(&a, &b) <= lcs_distance(&a, &b));
        }
    }
}
