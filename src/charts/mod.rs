pub mod aggregate;
pub mod page;

pub use aggregate::{label_counts, monthly_counts, status_counts, Bucket, ChartAggregate, MAX_LABEL_BUCKETS, NO_LABEL};
pub use page::{INDEX_FILE, LABELS_CHART_FILE, STATUS_CHART_FILE, TIMELINE_CHART_FILE};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::github::types::Issue;
use crate::output::write_atomic;
use crate::repo::RepoCoordinate;

/// Subdirectory of the output directory holding the chart pages
pub const CHARTS_DIR: &str = "charts";

/// Render the status, label and timeline charts plus an index page into
/// `output_dir/charts`. Returns the path of the index page.
pub fn generate_charts(repo: &RepoCoordinate, issues: &[Issue], output_dir: &Path) -> Result<PathBuf> {
    let charts_dir = output_dir.join(CHARTS_DIR);
    fs::create_dir_all(&charts_dir)
        .with_context(|| format!("Failed to create charts directory {}", charts_dir.display()))?;

    let aggregate = ChartAggregate::from_issues(issues);
    debug!(
        "Chart aggregates: {} states, {} labels, {} months",
        aggregate.status.len(),
        aggregate.labels.len(),
        aggregate.monthly.len()
    );

    let pages = [
        (STATUS_CHART_FILE, "Issue status", page::status_option(&aggregate), "800px", "600px"),
        (LABELS_CHART_FILE, "Issue labels", page::labels_option(&aggregate), "900px", "500px"),
        (TIMELINE_CHART_FILE, "Issue timeline", page::timeline_option(&aggregate), "1000px", "500px"),
    ];

    for (file, title, option, width, height) in &pages {
        let path = charts_dir.join(file);
        write_atomic(&path, &page::render_chart_page(title, option, width, height))
            .with_context(|| format!("Failed to generate chart {}", file))?;
    }

    let index = charts_dir.join(INDEX_FILE);
    write_atomic(&index, &page::render_index(&repo.to_string()))
        .context("Failed to generate charts index")?;

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{fixtures, IssueState};

    #[test]
    fn test_generate_charts_writes_four_pages() {
        let dir = tempfile::tempdir().unwrap();
        let issues = vec![
            fixtures::issue(1, IssueState::Open, &["bug"], (2024, 1, 5)),
            fixtures::issue(2, IssueState::Closed, &[], (2024, 2, 5)),
        ];

        let index = generate_charts(&RepoCoordinate::new("octo", "repo"), &issues, dir.path()).unwrap();

        assert_eq!(index, dir.path().join("charts").join("index.html"));
        for file in [STATUS_CHART_FILE, LABELS_CHART_FILE, TIMELINE_CHART_FILE, INDEX_FILE] {
            assert!(dir.path().join("charts").join(file).is_file(), "missing {}", file);
        }
    }

    #[test]
    fn test_generate_charts_with_no_issues() {
        let dir = tempfile::tempdir().unwrap();
        let index = generate_charts(&RepoCoordinate::new("octo", "repo"), &[], dir.path()).unwrap();
        assert!(index.is_file());
    }

    #[test]
    fn test_unusable_output_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the charts directory should go
        let blocker = dir.path().join("out");
        fs::write(&blocker, "x").unwrap();

        let err = generate_charts(&RepoCoordinate::new("octo", "repo"), &[], &blocker).unwrap_err();
        assert!(err.to_string().contains("Failed to create charts directory"));
    }
}
