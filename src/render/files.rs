use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::github::types::{Comment, Issue};
use crate::github::IssueSource;
use crate::output::write_atomic;
use crate::render::markdown::{issue_filename, render_issue};
use crate::repo::RepoCoordinate;

/// Outcome of writing the per-issue Markdown files
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: usize,
    pub failed: Vec<u64>, // issue numbers that could not be written
}

/// Render and write one issue into `output_dir`, returning the written path
pub fn write_issue_file(issue: &Issue, comments: &[Comment], output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(issue_filename(issue));
    write_atomic(&path, &render_issue(issue, comments))
        .with_context(|| format!("Failed to save issue #{}", issue.number))?;
    Ok(path)
}

/// Write one Markdown file per issue.
///
/// Comments are fetched per issue when `with_comments` is set. A failure for
/// one issue (comment fetch or write) is logged and the loop moves on.
/// `on_saved` is called after every successful write.
pub async fn save_issues<S: IssueSource>(
    source: &S,
    repo: &RepoCoordinate,
    issues: &[Issue],
    output_dir: &Path,
    with_comments: bool,
    mut on_saved: impl FnMut(&Issue),
) -> SaveReport {
    let mut report = SaveReport::default();

    for issue in issues {
        let result = async {
            let comments = if with_comments {
                source
                    .list_comments(repo, issue.number)
                    .await
                    .with_context(|| format!("Failed to fetch comments of issue #{}", issue.number))?
            } else {
                Vec::new()
            };
            write_issue_file(issue, &comments, output_dir)
        }
        .await;

        match result {
            Ok(path) => {
                debug!("Wrote {}", path.display());
                report.saved += 1;
                on_saved(issue);
            }
            Err(e) => {
                error!("Failed to save issue #{}: {:#}", issue.number, e);
                report.failed.push(issue.number);
            }
        }
    }

    report
}
