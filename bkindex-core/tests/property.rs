//! Property-based checks for tree invariants and search correctness.

mod common;

use bkindex_core::{BkTree, BkTreeBuilder, RootSelection, lcs_distance, levenshtein};
use bkindex_test_support::property_profile;
use common::{brute_force, check_invariants};
use proptest::{prelude::*, test_runner::Config};

const METRICS: [&str; 2] = ["levenshtein", "lcs_distance"];

fn config() -> Config {
    Config {
        cases: property_profile::cases(64),
        ..Config::default()
    }
}

fn word() -> impl Strategy<Value = String> {
    "[a-e]{1,7}"
}

fn word_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word(), 1..40)
}

fn build(words: &[String], metric: &str, seed: u64) -> BkTree {
    BkTreeBuilder::new()
        .with_metric(metric)
        .with_root_selection(RootSelection::Seeded(seed))
        .build(words.iter().cloned())
        .expect("generated words are valid")
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn triangle_inequality_holds(x in word(), y in word(), z in word()) {
        prop_assert!(levenshtein(&x, &z) <= levenshtein(&x, &y) + levenshtein(&y, &z));
        prop_assert!(lcs_distance(&x, &z) <= lcs_distance(&x, &y) + lcs_distance(&y, &z));
    }

    #[test]
    fn built_trees_uphold_invariants(
        words in word_list(),
        seed in any::<u64>(),
        metric in prop::sample::select(METRICS.to_vec()),
    ) {
        let tree = build(&words, metric, seed);
        let distinct: std::collections::BTreeSet<_> = words.iter().collect();
        prop_assert_eq!(tree.num_of_words(), distinct.len());
        prop_assert!(words.iter().all(|word| tree.contains(word)));
        if let Err(violation) = check_invariants(&tree) {
            return Err(TestCaseError::fail(violation));
        }
    }

    #[test]
    fn search_equals_linear_scan(
        words in word_list(),
        seed in any::<u64>(),
        metric in prop::sample::select(METRICS.to_vec()),
        query in word(),
        max_distance in 0_usize..6,
    ) {
        let tree = build(&words, metric, seed);
        let found: std::collections::BTreeSet<_> = tree
            .search(&query, i64::try_from(max_distance).unwrap_or(i64::MAX))
            .expect("query is valid")
            .into_iter()
            .collect();
        prop_assert_eq!(found, brute_force(&tree, &query, max_distance));
    }

    #[test]
    fn zero_distance_finds_only_exact_matches(
        words in word_list(),
        seed in any::<u64>(),
        query in word(),
    ) {
        let tree = build(&words, "levenshtein", seed);
        let found = tree.search(&query, 0).expect("query is valid");
        let expected: Vec<&str> = if words.contains(&query) { vec![query.as_str()] } else { vec![] };
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn snapshot_round_trip_is_lossless(words in word_list(), seed in any::<u64>()) {
        let tree = build(&words, "lcs_distance", seed);
        let restored = BkTree::restore(tree.snapshot()).expect("snapshot is valid");
        prop_assert_eq!(restored.root(), tree.root());
        prop_assert_eq!(restored.num_of_words(), tree.num_of_words());
        prop_assert_eq!(restored.tree_depth(), tree.tree_depth());
        prop_assert_eq!(restored.snapshot(), tree.snapshot());
    }
}
