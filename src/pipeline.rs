use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::charts::generate_charts;
use crate::config::Settings;
use crate::github::types::Issue;
use crate::github::IssueSource;
use crate::output;
use crate::render::save_issues;
use crate::repo::RepoCoordinate;
use crate::summary::{generate_summary, ChatCompletion, HttpChatClient};

/// An error that ends the run
#[derive(Debug)]
pub enum FatalError {
    /// Listing the issues failed
    Fetch(anyhow::Error),
    /// The output directory could not be created
    OutputDir(anyhow::Error),
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::Fetch(e) | FatalError::OutputDir(e) => write!(f, "{:#}", e),
        }
    }
}

impl std::error::Error for FatalError {}

/// What a completed run produced
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub output_dir: PathBuf,
    pub total: usize,
    pub saved: usize,
    pub failed: Vec<u64>,
    pub summary: Option<PathBuf>,
    pub charts_index: Option<PathBuf>,
}

/// Fetch every issue of the repository
pub async fn fetch_issues<S: IssueSource>(source: &S, repo: &RepoCoordinate) -> Result<Vec<Issue>> {
    source
        .list_issues(repo)
        .await
        .with_context(|| format!("Failed to fetch issues of {}", repo))
}

pub fn prepare_output_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory {}", path.display()))
}

/// Chat client for the summary stage, or `None` when the summary cannot run.
///
/// A missing AI token and a client that fails to build are logged separately.
pub fn build_chat_client(settings: &Settings) -> Option<HttpChatClient> {
    if !settings.ai_summary {
        return None;
    }

    let Some(token) = settings.ai_token.as_deref() else {
        warn!("AI summary enabled but no AI token provided, skipping summary");
        return None;
    };

    match HttpChatClient::new(&settings.ai_base_url, token, &settings.ai_model, settings.ai_timeout) {
        Ok(chat) => {
            debug!("AI endpoint: {}", chat.endpoint());
            Some(chat)
        }
        Err(e) => {
            error!("Failed to create AI client: {}", e);
            None
        }
    }
}

/// Run the AI summary stage. Failures are logged and yield `None`.
pub async fn summary_stage<C: ChatCompletion>(
    chat: Option<&C>,
    repo: &RepoCoordinate,
    issues: &[Issue],
    output_dir: &Path,
    summary_file: &str,
) -> Option<PathBuf> {
    let Some(chat) = chat else {
        debug!("No AI client available, summary skipped");
        return None;
    };

    match generate_summary(chat, repo, issues, output_dir, summary_file).await {
        Ok(path) => Some(path),
        Err(e) => {
            error!("AI summary failed: {:#}", e);
            None
        }
    }
}

/// Run the chart stage. Failures are logged and yield `None`.
pub fn charts_stage(repo: &RepoCoordinate, issues: &[Issue], output_dir: &Path) -> Option<PathBuf> {
    match generate_charts(repo, issues, output_dir) {
        Ok(index) => Some(index),
        Err(e) => {
            error!("Chart generation failed: {:#}", e);
            None
        }
    }
}

/// Fetch, write one Markdown file per issue, then run the enabled optional stages.
///
/// `chat` is only used when the summary is enabled; see [`build_chat_client`].
pub async fn run<S: IssueSource, C: ChatCompletion>(
    source: &S,
    chat: Option<&C>,
    repo: &RepoCoordinate,
    settings: &Settings,
    use_colors: bool,
) -> Result<RunOutcome, FatalError> {
    println!("{}", output::format_fetching(repo, use_colors));

    let issues = fetch_issues(source, repo).await.map_err(FatalError::Fetch)?;
    info!("Fetched {} issues of {}", issues.len(), repo);

    let output_dir = settings.output_dir_for(repo);
    prepare_output_dir(&output_dir).map_err(FatalError::OutputDir)?;

    let report = save_issues(source, repo, &issues, &output_dir, settings.with_comments, |issue| {
        println!("{}", output::format_saved(issue, use_colors));
    })
    .await;

    println!(
        "{}",
        output::format_done(report.saved, report.failed.len(), &output_dir, use_colors)
    );

    let summary = if settings.ai_summary {
        let path = summary_stage(chat, repo, &issues, &output_dir, &settings.summary_file).await;
        if let Some(path) = &path {
            println!("AI summary saved to {}", path.display());
        }
        path
    } else {
        None
    };

    let charts_index = if settings.charts {
        let index = charts_stage(repo, &issues, &output_dir);
        if let Some(index) = &index {
            println!("Charts saved to {}", index.display());
        }
        index
    } else {
        None
    };

    Ok(RunOutcome {
        output_dir,
        total: issues.len(),
        saved: report.saved,
        failed: report.failed,
        summary,
        charts_index,
    })
}
