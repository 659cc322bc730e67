use chrono::Datelike;
use std::collections::HashMap;

use crate::github::types::Issue;

/// Bucket name for issues without any label
pub const NO_LABEL: &str = "no label";

/// Maximum number of bars in the label chart
pub const MAX_LABEL_BUCKETS: usize = 10;

/// One named count in a chart series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    pub count: usize,
}

impl Bucket {
    fn new(name: impl Into<String>, count: usize) -> Self {
        Self { name: name.into(), count }
    }
}

/// The three views drawn by the chart pages, recomputed on every run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartAggregate {
    pub total: usize,
    pub status: Vec<Bucket>,
    pub labels: Vec<Bucket>,
    pub monthly: Vec<Bucket>,
}

impl ChartAggregate {
    pub fn from_issues(issues: &[Issue]) -> Self {
        Self {
            total: issues.len(),
            status: status_counts(issues),
            labels: label_counts(issues),
            monthly: monthly_counts(issues),
        }
    }
}

// Count descending, then name ascending so equal counts are stable
fn sorted_buckets(counts: HashMap<String, usize>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = counts.into_iter().map(|(name, count)| Bucket::new(name, count)).collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    buckets
}

/// Number of issues per state
pub fn status_counts(issues: &[Issue]) -> Vec<Bucket> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for issue in issues {
        *counts.entry(issue.state.to_string()).or_default() += 1;
    }
    sorted_buckets(counts)
}

/// Number of issues per label, top [`MAX_LABEL_BUCKETS`] only.
///
/// Unlabeled issues are counted under [`NO_LABEL`].
pub fn label_counts(issues: &[Issue]) -> Vec<Bucket> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for issue in issues {
        if issue.labels.is_empty() {
            *counts.entry(NO_LABEL.to_string()).or_default() += 1;
            continue;
        }
        for label in &issue.labels {
            *counts.entry(label.clone()).or_default() += 1;
        }
    }

    let mut buckets = sorted_buckets(counts);
    buckets.truncate(MAX_LABEL_BUCKETS);
    buckets
}

/// Issues created per calendar month (`YYYY-MM`).
///
/// Covers every month from the earliest to the latest creation date, months
/// without issues included with a zero count.
pub fn monthly_counts(issues: &[Issue]) -> Vec<Bucket> {
    let (Some(earliest), Some(latest)) = (
        issues.iter().map(|i| i.created_at).min(),
        issues.iter().map(|i| i.created_at).max(),
    ) else {
        return Vec::new();
    };

    let month_index = |year: i32, month: u32| year as i64 * 12 + (month as i64 - 1);
    let first = month_index(earliest.year(), earliest.month());
    let last = month_index(latest.year(), latest.month());

    let mut buckets: Vec<Bucket> = (first..=last)
        .map(|index| {
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) + 1;
            Bucket::new(format!("{:04}-{:02}", year, month), 0)
        })
        .collect();

    for issue in issues {
        let offset = month_index(issue.created_at.year(), issue.created_at.month()) - first;
        buckets[offset as usize].count += 1;
    }

    buckets
}
