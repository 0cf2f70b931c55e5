//! Command-line interface for building and querying BK-tree indexes.
//!
//! `build` loads a word list or snapshot and can persist the tree as JSON or
//! Graphviz DOT, `search` answers one query, and `interactive` keeps the tree
//! in memory and prompts for queries.

mod commands;
mod interactive;
mod render;

pub use commands::{
    BuildCommand, Cli, CliError, Command, ExecutionSummary, InteractiveCommand, SearchCommand,
    SourceArgs, TreeOptions, run_cli,
};
pub use render::{SearchHit, TreeSummary, render_matches, render_summary, write_dot};

#[cfg(test)]
mod test_helpers;
