use chrono::{DateTime, Utc};

use crate::github::types::{Comment, Issue};

/// Characters that are not allowed in file names on common platforms
const ILLEGAL_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\n', '\r'];

/// Maximum length (in characters) of the title part of a file name
const MAX_TITLE_CHARS: usize = 50;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Make a title safe to embed in a file name.
///
/// Illegal characters become `_`, the result is cut to 50 characters and
/// trimmed. Applying it twice gives the same result as applying it once.
pub fn sanitize_filename(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if ILLEGAL_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect();
    replaced.trim().to_string()
}

/// File name of the Markdown document for one issue
pub fn issue_filename(issue: &Issue) -> String {
    format!("issue_{}_{}.md", issue.number, sanitize_filename(&issue.title))
}

/// Metadata bullet list of the "Basic Info" section
fn info_lines(issue: &Issue) -> Vec<String> {
    let mut lines = vec![
        format!("- **Number**: #{}", issue.number),
        format!("- **State**: {}", issue.state),
        format!("- **Author**: @{}", issue.author),
        format!("- **Created**: {}", format_timestamp(&issue.created_at)),
        format!("- **Updated**: {}", format_timestamp(&issue.updated_at)),
    ];
    if let Some(closed_at) = &issue.closed_at {
        lines.push(format!("- **Closed**: {}", format_timestamp(closed_at)));
    }

    if !issue.labels.is_empty() {
        let labels: Vec<String> = issue.labels.iter().map(|l| format!("`{}`", l)).collect();
        lines.push(format!("- **Labels**: {}", labels.join(", ")));
    }

    if !issue.assignees.is_empty() {
        let assignees: Vec<String> = issue.assignees.iter().map(|a| format!("@{}", a)).collect();
        lines.push(format!("- **Assignees**: {}", assignees.join(", ")));
    }

    if let Some(milestone) = &issue.milestone {
        lines.push(format!("- **Milestone**: {}", milestone));
    }

    lines.push(format!("- **URL**: {}", issue.url));
    lines
}

/// Render one issue, and its comment thread if any, as Markdown
pub fn render_issue(issue: &Issue, comments: &[Comment]) -> String {
    let mut md = format!("# Issue #{}: {}\n\n", issue.number, issue.title);

    md.push_str("## Basic Info\n\n");
    md.push_str(&info_lines(issue).join("\n"));
    md.push_str("\n\n");

    if !issue.body.is_empty() {
        md.push_str("## Description\n\n");
        md.push_str(&issue.body);
        md.push_str("\n\n");
    }

    if !comments.is_empty() {
        md.push_str("---\n\n");
        md.push_str("## Comments\n\n");

        for comment in comments {
            md.push_str(&format!(
                "### @{} commented at {}\n\n",
                comment.author,
                format_timestamp(&comment.created_at)
            ));
            md.push_str(&comment.body);
            md.push_str("\n\n---\n\n");
        }
    }

    md
}
