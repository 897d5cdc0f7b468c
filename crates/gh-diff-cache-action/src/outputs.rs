//! Step outputs
//!
//! Appended to the file named by `GITHUB_OUTPUT` so later steps can lint
//! only the files of this run.

use anyhow::{Context, Result};
use gh_diff_cache::RunOutcome;
use log::debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

fn format_outputs(outcome: &RunOutcome) -> String {
    format!(
        "files={}\ncached={}\n",
        outcome.changed.join(" "),
        outcome.written.join(" ")
    )
}

/// Append the outputs of `outcome` to `path`
pub fn append_outputs(path: &Path, outcome: &RunOutcome) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    file.write_all(format_outputs(outcome).as_bytes())
        .with_context(|| format!("Failed to write output file {}", path.display()))
}

/// Publish outputs if the runner provides an output file
pub fn write_outputs(outcome: &RunOutcome) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => append_outputs(Path::new(&path), outcome),
        None => {
            debug!("GITHUB_OUTPUT not set, skipping step outputs");
            Ok(())
        }
    }
}
