pub mod client;
pub mod prompt;

pub use client::{completions_endpoint, parse_completion, AiRequestError, ChatCompletion, HttpChatClient};
pub use prompt::{build_prompt, build_summary_document, issue_table};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::github::types::Issue;
use crate::output::write_atomic;
use crate::repo::RepoCoordinate;

/// Ask the model for a summary of all issues and write it to `output_dir/summary_file`.
///
/// The document is built completely in memory first, so a failed request
/// never leaves a partial summary behind.
pub async fn generate_summary<C: ChatCompletion>(
    client: &C,
    repo: &RepoCoordinate,
    issues: &[Issue],
    output_dir: &Path,
    summary_file: &str,
) -> Result<PathBuf> {
    let prompt = build_prompt(repo, issues);
    debug!("Summary prompt is {} bytes for {} issues", prompt.len(), issues.len());

    info!("Requesting AI summary of {} issues", issues.len());
    let analysis = client
        .complete(&prompt)
        .await
        .context("Failed to generate AI summary")?;

    let path = output_dir.join(summary_file);
    write_atomic(&path, &build_summary_document(&analysis, issues))
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;

    Ok(path)
}
