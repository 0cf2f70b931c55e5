//! Plain-text and DOT rendering of trees and search results.

use std::io::{self, Write};

use bkindex_core::{BkTree, Match};

/// Shape of a loaded tree as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    /// Root word.
    pub root: String,
    /// Number of distinct words.
    pub words: usize,
    /// Largest node depth.
    pub depth: usize,
    /// Metric the tree was built with.
    pub metric: String,
}

impl TreeSummary {
    /// Captures the summary of `tree`.
    #[must_use]
    pub fn of(tree: &BkTree) -> Self {
        Self {
            root: tree.root().to_owned(),
            words: tree.num_of_words(),
            depth: tree.tree_depth(),
            metric: tree.metric().name().to_owned(),
        }
    }
}

/// An owned search match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchHit {
    /// Distance to the query. Compared first so sorting groups by distance.
    pub distance: usize,
    /// Matching word.
    pub word: String,
}

impl SearchHit {
    /// Converts borrowed matches into owned hits sorted by distance, then word.
    #[must_use]
    pub fn collect(matches: Vec<Match<'_>>) -> Vec<Self> {
        let mut hits: Vec<Self> = matches
            .into_iter()
            .map(|hit| Self {
                distance: hit.distance,
                word: hit.word.to_owned(),
            })
            .collect();
        hits.sort_unstable();
        hits
    }
}

/// Writes the tree summary as `key: value` lines.
///
/// # Errors
/// Returns any error raised by `writer`.
pub fn render_summary(summary: &TreeSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "metric: {}", summary.metric)?;
    writeln!(writer, "root: {}", summary.root)?;
    writeln!(writer, "words: {}", summary.words)?;
    writeln!(writer, "depth: {}", summary.depth)
}

/// Writes one `word<TAB>distance` line per hit, or `no matches`.
///
/// # Errors
/// Returns any error raised by `writer`.
pub fn render_matches(hits: &[SearchHit], mut writer: impl Write) -> io::Result<()> {
    if hits.is_empty() {
        return writeln!(writer, "no matches");
    }
    for hit in hits {
        writeln!(writer, "{}\t{}", hit.word, hit.distance)?;
    }
    Ok(())
}

/// Writes `tree` as a Graphviz digraph with one labelled edge per
/// parent/child pair. The root is always declared so single-word trees still
/// render a node.
///
/// # Errors
/// Returns any error raised by `writer`.
pub fn write_dot(tree: &BkTree, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "digraph bktree {{")?;
    writeln!(writer, "    \"{}\";", escape(tree.root()))?;
    for edge in tree.edges() {
        writeln!(
            writer,
            "    \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(edge.parent),
            escape(edge.child),
            edge.distance
        )?;
    }
    writeln!(writer, "}}")
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
