//! bkindex core library.
//!
//! A Burkhard-Keller tree indexes a set of words under a string metric and
//! answers "every word within distance `d` of `q`" without scanning the whole
//! set, pruning subtrees with the triangle inequality.
//!
//! ```
//! use bkindex_core::{BkTreeBuilder, RootSelection};
//!
//! let tree = BkTreeBuilder::new()
//!     .with_metric("levenshtein")
//!     .with_root_selection(RootSelection::Seeded(3))
//!     .build(["cat", "cats", "cast", "cost"])?;
//!
//! let mut hits = tree.search("cat", 1)?;
//! hits.sort_unstable();
//! assert_eq!(hits, ["cast", "cat", "cats"]);
//! # Ok::<(), bkindex_core::BkTreeError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod export;
mod metric;
mod node;
mod search;
mod snapshot;
mod tree;
mod validate;

pub use crate::{
    builder::{BkTreeBuilder, RootSelection},
    error::{BkTreeError, BkTreeErrorCode, Result, WordDefect},
    export::Edge,
    metric::{
        DEFAULT_METRIC, DistanceFn, Metric, MetricRegistry, lcs_distance, levenshtein,
        longest_common_subsequence,
    },
    node::NodeRef,
    search::Match,
    snapshot::{SNAPSHOT_VERSION, SnapshotEdge, SnapshotNode, TreeSnapshot},
    tree::BkTree,
    validate::word_defect,
};
