//! Small helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, ExecutionSummary, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Runs `cli` without interactive input and returns the summary and the
/// captured standard output.
pub(super) fn run_captured(cli: Cli) -> Result<(ExecutionSummary, String), CliError> {
    run_scripted(cli, "")
}

pub(super) fn run_scripted(cli: Cli, script: &str) -> Result<(ExecutionSummary, String), CliError> {
    let mut output = Vec::new();
    let summary = run_cli(cli, script.as_bytes(), &mut output)?;
    Ok((summary, String::from_utf8_lossy(&output).into_owned()))
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_captured(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
