//! Prompt loop for the `interactive` command.

use std::io::{self, BufRead, Write};

use bkindex_core::BkTree;
use tracing::{debug, instrument};

use super::commands::CliError;
use super::render::{SearchHit, render_matches};

const QUERY_PROMPT: &str = "query (blank line to quit): ";
const DISTANCE_PROMPT: &str = "max distance: ";

enum Reply {
    Line(String),
    Finished,
}

/// Answers queries read from `input` until a blank line or end of input.
///
/// Queries must consist of letters only and distances of ASCII digits only;
/// anything else is reported and prompted for again. A blank answer to either
/// prompt ends the session. Returns the number of queries answered.
///
/// # Errors
/// Returns [`CliError::Terminal`] when reading or writing fails and
/// [`CliError::Core`] if the tree rejects a query that passed the prompts.
#[instrument(name = "cli.interactive", err, skip_all, fields(words = tree.num_of_words()))]
pub(super) fn run_session<R: BufRead, W: Write>(
    tree: &BkTree,
    mut input: R,
    mut output: W,
) -> Result<usize, CliError> {
    let mut answered = 0;
    loop {
        let query = match prompt(&mut input, &mut output, QUERY_PROMPT)? {
            Reply::Line(line) if line.is_empty() => break,
            Reply::Line(line) => line,
            Reply::Finished => break,
        };
        if !query.chars().all(char::is_alphabetic) {
            writeln!(output, "query must contain letters only")?;
            continue;
        }

        let Some(max_distance) = read_distance(&mut input, &mut output)? else {
            break;
        };
        let matches = tree.search_with_distances(&query, max_distance)?;
        render_matches(&SearchHit::collect(matches), &mut output)?;
        answered += 1;
        debug!(query = %query, max_distance, "query answered");
    }
    Ok(answered)
}

fn read_distance<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<i64>> {
    loop {
        let line = match prompt(input, output, DISTANCE_PROMPT)? {
            Reply::Line(line) if line.is_empty() => return Ok(None),
            Reply::Line(line) => line,
            Reply::Finished => return Ok(None),
        };
        match parse_distance(&line) {
            Some(distance) => return Ok(Some(distance)),
            None => writeln!(output, "distance must be a non-negative whole number")?,
        }
    }
}

fn parse_distance(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> io::Result<Reply> {
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Reply::Finished);
    }
    Ok(Reply::Line(line.trim().to_owned()))
}
