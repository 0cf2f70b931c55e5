//! Command implementations and argument parsing for the bkindex CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use bkindex_core::{BkTree, BkTreeBuilder, BkTreeError, DEFAULT_METRIC, RootSelection, TreeSnapshot};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::interactive::run_session;
use super::render::{SearchHit, TreeSummary, render_matches, render_summary, write_dot};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "bkindex",
    about = "Build Burkhard-Keller trees over word lists and search them for near matches."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a tree, print its summary and optionally persist it.
    Build(BuildCommand),
    /// Run a single query and print the matches.
    Search(SearchCommand),
    /// Prompt for queries until a blank line is entered.
    Interactive(InteractiveCommand),
}

/// Where the tree comes from. Exactly one source must be given.
#[derive(Debug, Args, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// UTF-8 word list with one word per line.
    #[arg(long)]
    pub words: Option<PathBuf>,

    /// JSON snapshot previously written by `build --save-snapshot`.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

/// Construction settings; ignored when restoring a snapshot.
#[derive(Debug, Args, Clone)]
pub struct TreeOptions {
    /// Registered metric name.
    #[arg(long, default_value = DEFAULT_METRIC)]
    pub metric: String,

    /// Choose the root uniformly with this seed.
    #[arg(long, conflicts_with = "random_root")]
    pub seed: Option<u64>,

    /// Choose the root uniformly at random on every run.
    #[arg(long)]
    pub random_root: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            metric: DEFAULT_METRIC.to_owned(),
            seed: None,
            random_root: false,
        }
    }
}

impl TreeOptions {
    fn root_selection(&self) -> RootSelection {
        match (self.seed, self.random_root) {
            (Some(seed), _) => RootSelection::Seeded(seed),
            (None, true) => RootSelection::Random,
            (None, false) => RootSelection::First,
        }
    }
}

/// Options accepted by the `build` command.
#[derive(Debug, Args, Clone)]
pub struct BuildCommand {
    /// Tree source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Construction settings.
    #[command(flatten)]
    pub options: TreeOptions,

    /// Write a JSON snapshot of the tree to this path.
    #[arg(long)]
    pub save_snapshot: Option<PathBuf>,

    /// Write a Graphviz DOT rendering of the tree to this path.
    #[arg(long)]
    pub save_dot: Option<PathBuf>,
}

/// Options accepted by the `search` command.
#[derive(Debug, Args, Clone)]
pub struct SearchCommand {
    /// Tree source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Construction settings.
    #[command(flatten)]
    pub options: TreeOptions,

    /// Word to look up.
    pub query: String,

    /// Maximum distance between the query and a match.
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub distance: i64,
}

/// Options accepted by the `interactive` command.
#[derive(Debug, Args, Clone)]
pub struct InteractiveCommand {
    /// Tree source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Construction settings.
    #[command(flatten)]
    pub options: TreeOptions,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be opened, created or read.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading prompts or writing results failed.
    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] io::Error),
    /// A snapshot file could not be encoded or decoded.
    #[error("snapshot `{path}` is not valid JSON: {source}")]
    Snapshot {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// Neither a word list nor a snapshot was supplied.
    #[error("either --words or --snapshot must be given")]
    MissingSource,
    /// Tree construction, search or restore failed.
    #[error(transparent)]
    Core(#[from] BkTreeError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Shape of the tree the command worked on.
    pub tree: TreeSummary,
    /// Matches of the `search` command, ordered by distance then word.
    pub matches: Vec<SearchHit>,
    /// Number of queries answered.
    pub queries: usize,
}

/// Executes the CLI command represented by `cli`, writing its report to
/// `output` and reading interactive input from `input`.
///
/// # Errors
/// Returns [`CliError`] when loading, persisting or querying fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use bkindex_cli::cli::{Cli, Command, SearchCommand, SourceArgs, TreeOptions, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "cat\ncats\ncast\ncost\n")?;
/// let cli = Cli {
///     command: Command::Search(SearchCommand {
///         source: SourceArgs { words: Some(file.path().to_path_buf()), snapshot: None },
///         options: TreeOptions::default(),
///         query: "cat".into(),
///         distance: 1,
///     }),
/// };
/// let mut output = Vec::new();
/// let summary = run_cli(cli, std::io::empty(), &mut output)?;
/// assert_eq!(summary.matches.len(), 3);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli, input, output),
    fields(command = field::Empty),
)]
pub fn run_cli<R: BufRead, W: Write>(
    cli: Cli,
    input: R,
    mut output: W,
) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Build(command) => {
            span.record("command", "build");
            run_build(command, &mut output)
        }
        Command::Search(command) => {
            span.record("command", "search");
            run_search(command, &mut output)
        }
        Command::Interactive(command) => {
            span.record("command", "interactive");
            let tree = load_tree(&command.source, &command.options)?;
            let summary = TreeSummary::of(&tree);
            render_summary(&summary, &mut output)?;
            let queries = run_session(&tree, input, &mut output)?;
            info!(queries, "interactive session ended");
            Ok(ExecutionSummary {
                tree: summary,
                matches: Vec::new(),
                queries,
            })
        }
    }
}

#[instrument(name = "cli.build", err, skip(command, output))]
pub(super) fn run_build<W: Write>(
    command: BuildCommand,
    mut output: W,
) -> Result<ExecutionSummary, CliError> {
    let tree = load_tree(&command.source, &command.options)?;
    if let Some(path) = &command.save_snapshot {
        save_snapshot(&tree, path)?;
    }
    if let Some(path) = &command.save_dot {
        save_dot(&tree, path)?;
    }

    let summary = TreeSummary::of(&tree);
    render_summary(&summary, &mut output)?;
    Ok(ExecutionSummary {
        tree: summary,
        matches: Vec::new(),
        queries: 0,
    })
}

#[instrument(
    name = "cli.search",
    err,
    skip(command, output),
    fields(query = %command.query, distance = command.distance, matches = field::Empty),
)]
pub(super) fn run_search<W: Write>(
    command: SearchCommand,
    mut output: W,
) -> Result<ExecutionSummary, CliError> {
    let tree = load_tree(&command.source, &command.options)?;
    let matches = SearchHit::collect(tree.search_with_distances(&command.query, command.distance)?);
    Span::current().record("matches", matches.len());

    let summary = TreeSummary::of(&tree);
    render_summary(&summary, &mut output)?;
    render_matches(&matches, &mut output)?;
    Ok(ExecutionSummary {
        tree: summary,
        matches,
        queries: 1,
    })
}

/// Builds the tree from a word list or restores it from a snapshot.
#[instrument(
    name = "cli.load_tree",
    err,
    skip(source, options),
    fields(source = field::Empty, path = field::Empty, metric = field::Empty),
)]
pub(super) fn load_tree(source: &SourceArgs, options: &TreeOptions) -> Result<BkTree, CliError> {
    let span = Span::current();
    match (&source.words, &source.snapshot) {
        (Some(path), _) => {
            span.record("source", "words");
            span.record("path", field::display(path.display()));
            span.record("metric", options.metric.as_str());
            let words = read_words(BufReader::new(open(path)?)).map_err(|source| {
                CliError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            info!(words = words.len(), "word list loaded");
            Ok(BkTreeBuilder::new()
                .with_metric(options.metric.as_str())
                .with_root_selection(options.root_selection())
                .build(words)?)
        }
        (None, Some(path)) => {
            span.record("source", "snapshot");
            span.record("path", field::display(path.display()));
            let snapshot = load_snapshot(path)?;
            span.record("metric", snapshot.metric.as_str());
            Ok(BkTree::restore(snapshot)?)
        }
        (None, None) => Err(CliError::MissingSource),
    }
}

/// Reads one word per line, dropping line endings and skipping blank lines.
///
/// Everything else is passed through untouched so the core validation can
/// reject malformed entries.
pub(super) fn read_words<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    reader
        .lines()
        .filter(|line| line.as_ref().map_or(true, |text| !text.trim().is_empty()))
        .collect()
}

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[instrument(name = "cli.save_snapshot", err, skip(tree), fields(path = %path.display()))]
pub(super) fn save_snapshot(tree: &BkTree, path: &Path) -> Result<(), CliError> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, &tree.snapshot()).map_err(|source| {
        CliError::Snapshot {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn load_snapshot(path: &Path) -> Result<TreeSnapshot, CliError> {
    serde_json::from_reader(BufReader::new(open(path)?)).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}

#[instrument(name = "cli.save_dot", err, skip(tree), fields(path = %path.display()))]
pub(super) fn save_dot(tree: &BkTree, path: &Path) -> Result<(), CliError> {
    let mut writer = create(path)?;
    write_dot(tree, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}
